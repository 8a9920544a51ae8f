//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint, the error schema wrappers and the
//! bearer token scheme. Swagger UI serves it in debug builds and the
//! `openapi-dump` binary exports it for tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Register the session token as an HTTP bearer scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token issued by POST /api/login. May also be sent as `token` in the body.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Schedule viewer API",
        description = "Token-gated schedule views, account management and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::verify_token,
        crate::inbound::http::schedules::current_schedule,
        crate::inbound::http::schedules::all_resource_schedules,
        crate::inbound::http::schedules::save_schedule,
        crate::inbound::http::schedules::create_schedule_options,
        crate::inbound::http::users::list_users,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Registration, login and token checks"),
        (name = "schedules", description = "Per-resource schedule views"),
        (name = "users", description = "Account listing"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    #[test]
    fn error_schema_carries_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(ERROR_SCHEMA_NAME).expect("Error schema") {
            RefOr::T(Schema::Object(obj)) => {
                assert!(obj.properties.contains_key("error"));
                assert!(obj.properties.contains_key("code"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/register",
            "/api/login",
            "/api/verify-token",
            "/api/current-schedule",
            "/api/all-resource-schedules",
            "/api/save-schedule",
            "/api/schedule",
            "/api/users",
            "/health",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn error_responses_reference_error_schema() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("document serialises");
        let expected = format!("#/components/schemas/{ERROR_SCHEMA_NAME}");
        for (path, method, status) in [
            ("/api/register", "post", "400"),
            ("/api/login", "post", "401"),
            ("/api/current-schedule", "post", "401"),
            ("/api/users", "get", "503"),
        ] {
            let pointer = format!(
                "/paths/{}/{method}/responses/{status}/content/application~1json/schema/$ref",
                path.replace('/', "~1")
            );
            assert_eq!(
                doc.pointer(&pointer).and_then(serde_json::Value::as_str),
                Some(expected.as_str()),
                "{method} {path} {status}"
            );
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionToken"));
    }
}
