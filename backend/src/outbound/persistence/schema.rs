//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly.

diesel::table! {
    /// Registered and provisioned accounts.
    users (id) {
        id -> Uuid,
        /// Unique, case-sensitive login name.
        username -> Varchar,
        password_digest -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded scheduling problems keyed by name.
    scenarios (name) {
        name -> Varchar,
        request_description -> Jsonb,
        travel_matrix -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only per-resource schedule snapshots.
    resource_schedules (id) {
        id -> Uuid,
        /// Insertion sequence; defines store order for tie-breaking.
        seq -> Int8,
        scenario_name -> Varchar,
        resource_name -> Varchar,
        /// Ordered array of task objects.
        tasks -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Schedules users chose to keep.
    saved_schedules (id) {
        id -> Uuid,
        username -> Varchar,
        schedule -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    scenarios,
    resource_schedules,
    saved_schedules,
);
