//! Operator CLI that invokes the civic core entry points against PostgreSQL.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use civic_backend::CoreSettings;
use civic_backend::domain::ports::{
    AddCommentRequest, CommentCommand, DashboardQuery, DisabledIdentityClaims,
    RoleAssignmentCommand, SetUserRoleRequest, ToggleVoteRequest, VoteCommand,
};
use civic_backend::domain::{AdminService, CallContext, CommentService, Error, UserId, VoteService};
use civic_backend::outbound::identity::HttpIdentityClaims;
use civic_backend::outbound::persistence::{
    DbPool, DieselCommentRepository, DieselComplaintRepository, DieselUpvoteLedger,
    DieselUserProfileRepository, PoolConfig, run_pending_migrations,
};
use civic_backend::telemetry::init_tracing;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig as _;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::info;
use url::Url;

/// `civic-admin` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "civic-admin",
    about = "Run civic complaint operations directly against the document store",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Print complaint counts by status and category.
    Stats {
        /// Caller uid; must hold the government role.
        #[arg(long = "as", value_name = "uid")]
        caller: String,
    },
    /// Assign a role to a user.
    SetRole {
        /// Caller uid; must hold the government role.
        #[arg(long = "as", value_name = "uid")]
        caller: String,
        /// User whose role changes.
        target_uid: String,
        /// `citizen` or `government`.
        role: String,
    },
    /// Toggle the caller's upvote on a complaint.
    ToggleVote {
        /// Caller uid.
        #[arg(long = "as", value_name = "uid")]
        caller: String,
        complaint_id: String,
    },
    /// Add a comment to a complaint.
    Comment {
        /// Caller uid.
        #[arg(long = "as", value_name = "uid")]
        caller: String,
        complaint_id: String,
        text: String,
    },
}

/// JSON envelope printed for every core operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Envelope<T> {
    Result(T),
    Error(Error),
}

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> color_eyre::Result<ExitCode> {
    let args = CliArgs::parse();
    let settings = load_settings()?;
    init_tracing(settings.log_json());

    if matches!(args.command, Command::Migrate) {
        return migrate(&settings).await;
    }

    let pool = DbPool::new(PoolConfig::from_settings(&settings)?)
        .await
        .wrap_err("create database pool")?;
    let clock = Arc::new(DefaultClock);
    let complaints = Arc::new(DieselComplaintRepository::new(pool.clone()));
    let profiles = Arc::new(DieselUserProfileRepository::new(pool.clone()));

    match args.command {
        Command::Migrate => Ok(ExitCode::SUCCESS),
        Command::Stats { caller } => {
            let admin = AdminService::new(complaints, profiles, Arc::new(DisabledIdentityClaims));
            print_envelope(admin.dashboard_stats(&context(&caller)).await)
        }
        Command::SetRole {
            caller,
            target_uid,
            role,
        } => {
            let request = SetUserRoleRequest { target_uid, role };
            match identity_claims(&settings)? {
                Some(claims) => {
                    let admin = AdminService::new(complaints, profiles, Arc::new(claims));
                    print_envelope(admin.set_user_role(&context(&caller), request).await)
                }
                None => {
                    let admin =
                        AdminService::new(complaints, profiles, Arc::new(DisabledIdentityClaims));
                    print_envelope(admin.set_user_role(&context(&caller), request).await)
                }
            }
        }
        Command::ToggleVote {
            caller,
            complaint_id,
        } => {
            let ledger = Arc::new(DieselUpvoteLedger::new(
                pool,
                settings.transaction_attempts(),
            ));
            let votes = VoteService::new(ledger, clock);
            print_envelope(
                votes
                    .toggle_vote(&context(&caller), ToggleVoteRequest { complaint_id })
                    .await,
            )
        }
        Command::Comment {
            caller,
            complaint_id,
            text,
        } => {
            let comments = Arc::new(DieselCommentRepository::new(pool));
            let service = CommentService::new(comments, complaints, profiles, clock);
            print_envelope(
                service
                    .add_comment(&context(&caller), AddCommentRequest { complaint_id, text })
                    .await,
            )
        }
    }
}

/// Settings come from `CIVIC_*` variables only; CLI arguments belong to
/// the subcommands.
fn load_settings() -> color_eyre::Result<CoreSettings> {
    CoreSettings::load_from_iter([OsString::from("civic-admin")])
        .map_err(|error| eyre!("load configuration: {error}"))
}

async fn migrate(settings: &CoreSettings) -> color_eyre::Result<ExitCode> {
    let database_url = settings
        .database_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| eyre!("CIVIC_DATABASE_URL is not set"))?;
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .wrap_err("join migration task")??;
    info!(applied, "migrations complete");
    println!("applied={applied}");
    Ok(ExitCode::SUCCESS)
}

fn identity_claims(settings: &CoreSettings) -> color_eyre::Result<Option<HttpIdentityClaims>> {
    let Some(raw) = settings.identity_admin_url.as_deref() else {
        return Ok(None);
    };
    let base = Url::parse(raw).wrap_err("parse CIVIC_IDENTITY_ADMIN_URL")?;
    let claims = HttpIdentityClaims::new(
        base,
        settings.identity_admin_token.clone(),
        settings.http_timeout(),
    )
    .wrap_err("build identity provider client")?;
    Ok(Some(claims))
}

/// Blank or malformed uids run as an anonymous caller so the core reports
/// `unauthenticated` itself.
fn context(raw: &str) -> CallContext {
    UserId::new(raw).map_or_else(|_| CallContext::anonymous(), CallContext::authenticated)
}

fn print_envelope<T: Serialize>(outcome: Result<T, Error>) -> color_eyre::Result<ExitCode> {
    let (envelope, code) = match outcome {
        Ok(value) => (Envelope::Result(value), ExitCode::SUCCESS),
        Err(error) => (Envelope::Error(error), ExitCode::FAILURE),
    };
    let rendered = serde_json::to_string_pretty(&envelope).wrap_err("render result")?;
    println!("{rendered}");
    Ok(code)
}
