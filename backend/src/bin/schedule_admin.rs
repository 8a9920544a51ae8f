//! Administrative commands: scenario upload, engine runs (full or one added
//! task), ingestion and resource account provisioning.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use schedule_backend::domain::ports::{
    AccountProvisioning, IngestionReport, ResourceOutcome, ScheduleIngestion, ScheduleQuery,
};
use schedule_backend::domain::{
    AccountService, ScenarioService, ScheduleIngestionService, ScheduleQueryService,
    ScheduleRunner, SessionTokenService, TaskRecord, TokenSigningKey, UploadOutcome,
};
use schedule_backend::outbound::persistence::{
    DbPool, DieselResourceScheduleRepository, DieselScenarioRepository, DieselUserRepository,
    PoolConfig, run_pending_migrations,
};
use schedule_backend::outbound::{Argon2PasswordHasher, CommandSchedulingEngine};

const DATABASE_URL_ENV: &str = "SCHEDULE_DATABASE_URL";
const DEFAULT_RESOURCE_PASSWORD: &str = "tester";

/// `schedule-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "schedule-admin",
    about = "Manage scenarios, scheduler runs and resource accounts",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `SCHEDULE_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum AdminCommand {
    /// Store a scenario's request description and travel matrix.
    UploadScenario {
        #[arg(long, value_name = "name")]
        name: String,
        #[arg(long = "request-file", value_name = "path")]
        request_file: PathBuf,
        #[arg(long = "travel-matrix-file", value_name = "path")]
        travel_matrix_file: PathBuf,
        /// Overwrite an existing scenario with the same name.
        #[arg(long)]
        replace: bool,
    },
    /// Run the scheduling engine on a stored scenario and ingest the result.
    RunSchedule {
        #[arg(long, value_name = "name")]
        scenario: String,
        /// Engine program; receives the scenario as JSON on stdin.
        #[arg(long, value_name = "program")]
        engine: PathBuf,
        /// Extra argument passed to the engine. Repeatable.
        #[arg(long = "engine-arg", value_name = "arg", allow_hyphen_values = true)]
        engine_args: Vec<String>,
    },
    /// Ask the engine to fit one more task into a scenario's stored
    /// schedule and print the result without storing it.
    AddTask {
        #[arg(long, value_name = "name")]
        scenario: String,
        /// JSON object describing the new task.
        #[arg(long = "task-file", value_name = "path")]
        task_file: PathBuf,
        #[arg(long, value_name = "program")]
        engine: PathBuf,
        #[arg(long = "engine-arg", value_name = "arg", allow_hyphen_values = true)]
        engine_args: Vec<String>,
    },
    /// Ingest a precomputed JSON array of tasks for a scenario.
    IngestTasks {
        #[arg(long, value_name = "name")]
        scenario: String,
        #[arg(long = "tasks-file", value_name = "path")]
        tasks_file: PathBuf,
    },
    /// Create one account per scenario resource with a shared password.
    ProvisionAccounts {
        #[arg(long, value_name = "name")]
        scenario: String,
        #[arg(long, value_name = "password", default_value = DEFAULT_RESOURCE_PASSWORD)]
        password: String,
    },
    /// Print the normalised tasks stored for a scenario.
    ShowScenario {
        #[arg(long, value_name = "name")]
        scenario: String,
    },
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt().with_env_filter(EnvFilter::from_default_env()).try_init() {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let scenarios = ScenarioService::new(
        Arc::new(DieselScenarioRepository::new(pool.clone())),
        clock.clone(),
    );
    let snapshots = Arc::new(DieselResourceScheduleRepository::new(pool.clone()));

    match args.command {
        AdminCommand::UploadScenario {
            name,
            request_file,
            travel_matrix_file,
            replace,
        } => {
            let request = read_json_file(&request_file)?;
            let travel_matrix = read_json_file(&travel_matrix_file)?;
            let outcome = scenarios
                .upload(&name, request, travel_matrix, replace)
                .await
                .map_err(domain_failure)?;
            match outcome {
                UploadOutcome::Created => println!("created scenario '{name}'"),
                UploadOutcome::Replaced => println!("replaced scenario '{name}'"),
            }
        }
        AdminCommand::RunSchedule {
            scenario,
            engine,
            engine_args,
        } => {
            let stored = scenarios.find(&scenario).await.map_err(domain_failure)?;
            let runner = ScheduleRunner::new(Arc::new(CommandSchedulingEngine::new(
                engine.into_os_string(),
                engine_args,
            )));
            let tasks = runner.run(&stored).await.map_err(domain_failure)?;
            let report = ScheduleIngestionService::new(snapshots, clock)
                .ingest(&scenario, tasks)
                .await
                .map_err(domain_failure)?;
            print_report(&report);
            ensure_complete(&report)?;
        }
        AdminCommand::AddTask {
            scenario,
            task_file,
            engine,
            engine_args,
        } => {
            let new_task = read_json_file(&task_file)?;
            let stored = scenarios.find(&scenario).await.map_err(domain_failure)?;
            let current = ScheduleQueryService::new(snapshots)
                .scenario_tasks(&scenario)
                .await
                .map_err(domain_failure)?;
            let runner = ScheduleRunner::new(Arc::new(CommandSchedulingEngine::new(
                engine.into_os_string(),
                engine_args,
            )));
            let tasks = runner
                .add_task(&stored, &current, new_task)
                .await
                .map_err(domain_failure)?;
            let rendered = serde_json::to_string_pretty(&tasks).map_err(io::Error::other)?;
            println!("{rendered}");
        }
        AdminCommand::IngestTasks {
            scenario,
            tasks_file,
        } => {
            let tasks = parse_tasks(read_json_file(&tasks_file)?)?;
            let report = ScheduleIngestionService::new(snapshots, clock)
                .ingest(&scenario, tasks)
                .await
                .map_err(domain_failure)?;
            print_report(&report);
            ensure_complete(&report)?;
        }
        AdminCommand::ProvisionAccounts { scenario, password } => {
            let usernames = scenarios
                .resource_usernames(&scenario)
                .await
                .map_err(domain_failure)?;
            // Provisioning never issues tokens, so any key will do.
            let tokens = SessionTokenService::new(&TokenSigningKey::generate(), clock.clone());
            let accounts = AccountService::new(
                Arc::new(DieselUserRepository::new(pool)),
                Arc::new(Argon2PasswordHasher::new()),
                tokens,
                clock,
            );
            let report = accounts
                .provision(usernames, Zeroizing::new(password))
                .await
                .map_err(domain_failure)?;
            for username in &report.created {
                println!("created user '{username}'");
            }
            for username in &report.recreated {
                println!("recreated user '{username}'");
            }
        }
        AdminCommand::ShowScenario { scenario } => {
            let tasks = ScheduleQueryService::new(snapshots)
                .scenario_tasks(&scenario)
                .await
                .map_err(domain_failure)?;
            let rendered = serde_json::to_string_pretty(&tasks).map_err(io::Error::other)?;
            println!("{rendered}");
        }
    }

    Ok(())
}

fn domain_failure(error: schedule_backend::domain::Error) -> io::Error {
    io::Error::other(format!("{:?}: {}", error.code(), error.message()))
}

fn print_report(report: &IngestionReport) {
    println!(
        "scenario={} replaced_snapshots={} unassigned_tasks={}",
        report.scenario_name, report.replaced_snapshots, report.unassigned_tasks
    );
    for resource in &report.resources {
        match &resource.outcome {
            ResourceOutcome::Written => println!(
                "  {}: {} tasks written",
                resource.resource_name, resource.task_count
            ),
            ResourceOutcome::Failed { message } => {
                println!("  {}: failed: {message}", resource.resource_name);
            }
        }
    }
}

fn ensure_complete(report: &IngestionReport) -> io::Result<()> {
    let failed = report.failed_resources().count();
    if failed == 0 {
        return Ok(());
    }
    Err(io::Error::other(format!(
        "{failed} resource snapshot(s) could not be stored"
    )))
}

fn parse_tasks(value: Value) -> io::Result<Vec<TaskRecord>> {
    let Value::Array(items) = value else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "tasks file must hold a JSON array",
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            TaskRecord::try_from(item).map_err(|error| {
                io::Error::new(io::ErrorKind::InvalidData, format!("task {index}: {error}"))
            })
        })
        .collect()
}

fn read_json_file(path: &Path) -> io::Result<Value> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "input path must be a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
        io::Error::other(format!(
            "open input parent directory '{}': {error}",
            parent.display()
        ))
    })?;
    let mut file = directory.open(Path::new(file_name)).map_err(|error| {
        io::Error::other(format!("open input file '{}': {error}", path.display()))
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|error| {
        io::Error::other(format!("read input file '{}': {error}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|error| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("parse JSON in '{}': {error}", path.display()),
        )
    })
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    match from_env {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "SCHEDULE_DATABASE_URL must not be empty",
        )),
        None => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or SCHEDULE_DATABASE_URL",
        )),
    }
}
