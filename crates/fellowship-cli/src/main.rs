//! Fellowship portal access CLI.
//!
//! Answers "what would this person see, and what may they do?" against the
//! portal's role model without running the portal.
//!
//! # Quick Start
//!
//! ```bash
//! # Menu for a student
//! fellowship nav --roles student
//!
//! # Menu an admin sees while previewing the member view
//! fellowship nav --roles admin --view member
//!
//! # Views a multi-role subject may switch into
//! fellowship views --roles instructor,staff
//!
//! # Evaluate a gate (exit code 0 = allow, 1 = deny, 2 = error)
//! fellowship check lms-write --roles mentor --path /portal/pathways
//! ```

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::config::Format;
use style::colors::SemanticStyle;

/// Exit code for invalid arguments and configuration errors.
const ERROR_EXIT_CODE: u8 = 2;

/// Fellowship - role-based access and view authorization for the portal.
#[derive(Parser)]
#[command(name = "fellowship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Print the navigation menu a subject sees.
    Nav {
        /// Comma-separated real roles (e.g. "admin" or "instructor,staff").
        #[arg(short, long, default_value = "")]
        roles: String,

        /// Preview the menu as this view.
        #[arg(long)]
        view: Option<String>,

        /// JSON or TOML tree file (default: configured tree or the built-in menu).
        #[arg(long)]
        tree: Option<PathBuf>,

        /// Use the footer menu instead of the main menu.
        #[arg(long, conflicts_with = "tree")]
        footer: bool,

        /// Print the filtered tree as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the views a subject may switch into.
    Views {
        /// Comma-separated real roles.
        #[arg(short, long)]
        roles: String,

        /// Currently active view override.
        #[arg(long)]
        active: Option<String>,
    },

    /// Evaluate an access gate.
    Check {
        /// Gate name (public-read, logged-in, admin-only, staff-only,
        /// instructors-only, mentors-only, lms-read, lms-write).
        gate: String,

        /// Comma-separated real roles.
        #[arg(short, long, default_value = "")]
        roles: String,

        /// Path being requested.
        #[arg(short, long)]
        path: Option<String>,

        /// Evaluate for a visitor with no session.
        #[arg(long, conflicts_with = "roles")]
        anonymous: bool,
    },

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the merged configuration.
    Show {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate configuration.
    Validate {
        /// Project directory.
        #[arg(short, long, default_value = ".")]
        project: PathBuf,

        /// Validate a single file instead of the merged sources.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    style::init(cli.no_color);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".error());
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Nav {
            roles,
            view,
            tree,
            footer,
            json,
        } => {
            let source = match (tree, footer) {
                (Some(path), _) => commands::nav::TreeSource::File(path),
                (None, true) => commands::nav::TreeSource::Footer,
                (None, false) => commands::nav::TreeSource::Main,
            };
            commands::nav::run(&roles, view.as_deref(), source, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Views { roles, active } => {
            commands::views::run(&roles, active.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            gate,
            roles,
            path,
            anonymous,
        } => commands::check::run(&gate, &roles, path.as_deref(), anonymous),
        Commands::Config(cmd) => {
            match cmd {
                ConfigCommands::Show { project, format } => {
                    commands::config::show(&project, format)?;
                }
                ConfigCommands::Validate { project, file } => {
                    commands::config::validate(&project, file.as_deref())?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
