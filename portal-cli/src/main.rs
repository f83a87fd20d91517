use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_core::auth::{GuardDecision, Route};
use portal_core::config::Config;
use portal_core::logging::{init_logging_with_config, LogConfig};
use portal_core::metrics::init_metrics;
use portal_core::view::{self, NO_ANNOUNCEMENTS, NO_INVITE_CODES};
use portal_core::{Portal, PortalError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

mod render;

use render::Output;

#[derive(Parser, Debug)]
#[command(name = "portal")]
#[command(author, version, about = "Community portal accounts, invites and announcements", long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding the stored collections
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long, global = true)]
    json_logs: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create a regular account
    Register {
        username: String,

        #[arg(short, long)]
        password: String,

        /// Invite code to redeem
        #[arg(short, long)]
        invite: Option<String>,
    },

    /// Clear the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Render the home page: login button and latest announcements
    Home,

    /// Show what opening a page would do with the current session
    Guard {
        /// home, login, register or admin
        route: String,
    },

    /// Manage invite codes (admin)
    #[command(subcommand)]
    Invites(InviteCommand),

    /// Publish and list announcements
    #[command(subcommand)]
    Announce(AnnounceCommand),

    /// Probe the game server
    Status,
}

#[derive(Subcommand, Debug)]
enum InviteCommand {
    /// Generate sequential codes
    Generate {
        #[arg(default_value_t = 1)]
        count: usize,
    },

    /// List all codes, newest first
    List,

    /// Delete an unused code
    Delete { code: String },
}

#[derive(Subcommand, Debug)]
enum AnnounceCommand {
    /// Publish an announcement (admin)
    Publish {
        #[arg(short, long)]
        title: String,

        #[arg(short = 'b', long)]
        content: String,
    },

    /// List announcements as shown on the admin page
    List,
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(expand_path(path))
            .with_context(|| format!("loading config from {}", path))?,
        None => Config::default(),
    };
    config.apply_env()?;

    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = expand_path(dir);
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }

    config.validate()?;
    Ok(config)
}

/// Apply the page guard for `route`. Returns false, after rendering the
/// decision, when the page may not be shown.
fn enter(portal: &Portal, out: &Output, route: Route) -> Result<bool> {
    let decision = portal.auth().guard(route)?;
    if decision == GuardDecision::Allow {
        return Ok(true);
    }
    out.guard(route, &decision);
    Ok(false)
}

async fn run(portal: &Portal, out: &Output, command: Command) -> Result<ExitCode> {
    match command {
        Command::Login { username, password } => {
            if !enter(portal, out, Route::Login)? {
                return Ok(ExitCode::FAILURE);
            }
            let outcome = portal.auth().login(&username, &password)?;
            out.login(&outcome);
        }
        Command::Register {
            username,
            password,
            invite,
        } => {
            if !enter(portal, out, Route::Register)? {
                return Ok(ExitCode::FAILURE);
            }
            let outcome = portal
                .auth()
                .register(&username, &password, invite.as_deref())?;
            out.notice(&portal.success_notice(outcome.message.clone()));
            out.redirect(&outcome.redirect);
        }
        Command::Logout => {
            let redirect = portal.auth().logout()?;
            out.redirect(&redirect);
        }
        Command::Whoami => {
            let session = portal.auth().current_session()?;
            out.whoami(session.as_ref());
        }
        Command::Home => {
            let session = portal.auth().current_session()?;
            let button = view::taskbar_button(session.as_ref());
            let cards = portal.home_announcements()?;
            out.home(&button, &cards, NO_ANNOUNCEMENTS);
        }
        Command::Guard { route } => {
            let route: Route = route.parse().map_err(anyhow::Error::msg)?;
            let decision = portal.auth().guard(route)?;
            out.guard(route, &decision);
        }
        Command::Invites(sub) => {
            if !enter(portal, out, Route::Admin)? {
                return Ok(ExitCode::FAILURE);
            }
            match sub {
                InviteCommand::Generate { count } => {
                    let codes = portal.admin().generate_invite_codes(count)?;
                    out.notice(&portal.success_notice(format!(
                        "Generated {} invite code(s): {}",
                        codes.len(),
                        codes.join(", ")
                    )));
                }
                InviteCommand::List => {
                    let session = portal.auth().current_session()?;
                    if let Some(welcome) = view::admin_welcome(session.as_ref()) {
                        out.line(&welcome);
                    }
                    out.invite_rows(&portal.invite_rows()?, NO_INVITE_CODES);
                }
                InviteCommand::Delete { code } => {
                    portal.admin().delete_invite_code(&code)?;
                    out.notice(&portal.success_notice(format!("Invite code {} deleted", code)));
                }
            }
        }
        Command::Announce(sub) => {
            if !enter(portal, out, Route::Admin)? {
                return Ok(ExitCode::FAILURE);
            }
            match sub {
                AnnounceCommand::Publish { title, content } => {
                    portal.admin().publish_announcement(&title, &content)?;
                    out.notice(&portal.success_notice("Announcement published!"));
                }
                AnnounceCommand::List => {
                    out.announcements(&portal.admin_announcements()?, NO_ANNOUNCEMENTS);
                }
            }
        }
        Command::Status => {
            let probe = portal.status_probe();
            let status = probe.probe().await;
            out.status(&probe, &status);
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_config(&args)?;

    init_logging_with_config(LogConfig::try_from(&config.logging)?)?;
    init_metrics();
    debug!(data_dir = %config.storage.data_dir.display(), "portal CLI started");

    let out = Output::new(args.json);
    let portal = Portal::open(config)?;

    match run(&portal, &out, args.command).await {
        Ok(code) => Ok(code),
        Err(e) => match e.downcast_ref::<PortalError>() {
            Some(err) if !err.is_fatal() => {
                out.notice(&portal.error_notice(err));
                Ok(ExitCode::FAILURE)
            }
            Some(err) => {
                error!(error = %err, "operation aborted");
                Err(e)
            }
            None => Err(e),
        },
    }
}
