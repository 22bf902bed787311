//! dbsession CLI entry point
//!
//! Runs raw SQL through one session. Sessions are dry runs unless
//! `--production` is given (or the selected profile says so): nothing is
//! committed and every write is rolled back on exit.

use clap::{Parser, Subcommand, ValueEnum};
use rust_db_session::core::config::DEFAULT_PRODUCTION_COOLDOWN;
use rust_db_session::core::cooldown::{CountdownCooldown, NoCooldown};
use rust_db_session::{
    ConnectionMode, DatabaseError, DatabaseInfo, SessionManager, SessionSettings,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

mod output;

#[derive(Parser, Debug)]
#[command(name = "dbsession", about = "Run SQL through a production or dry-run session")]
struct Cli {
    /// Path to a TOML settings file with connection profiles
    #[arg(short = 'c', long, global = true, env = "DBSESSION_CONFIG")]
    config: Option<PathBuf>,

    /// Profile to use from the settings file
    #[arg(short = 'p', long, global = true, env = "DBSESSION_PROFILE")]
    profile: Option<String>,

    /// Endpoint URL (overrides the profile)
    #[arg(long, global = true, env = "DBSESSION_URL")]
    url: Option<String>,

    /// User name (overrides the profile)
    #[arg(long, global = true, env = "DBSESSION_USER")]
    user: Option<String>,

    /// Credential (overrides the profile)
    #[arg(long, global = true, env = "DBSESSION_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Commit for real instead of a dry run
    #[arg(long, global = true)]
    production: bool,

    /// Seconds to wait before a production session proceeds
    #[arg(long, global = true)]
    cooldown: Option<u64>,

    /// Skip the production cooldown
    #[arg(long, global = true)]
    no_cooldown: bool,

    /// Output format for query results
    #[arg(short = 'f', long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Emit debug diagnostics (statement text, row counts) to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a SELECT and print the rows
    Query {
        /// SQL text
        sql: String,
    },
    /// Print the number of rows a SELECT returns
    Count {
        /// SQL text, usable as a subquery
        sql: String,
    },
    /// Run write statements in one transaction
    Execute {
        /// SQL statements, run in order
        #[arg(required = true)]
        sql: Vec<String>,

        /// Commit at the end (suppressed in test mode)
        #[arg(long)]
        commit: bool,
    },
    /// Show the resolved connection settings
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn resolve_info(cli: &Cli) -> Result<DatabaseInfo, DatabaseError> {
    let mut info = match &cli.config {
        Some(path) => {
            let settings = SessionSettings::load(path)?;
            match &cli.profile {
                Some(name) => settings.profile(name)?,
                None => settings.default_profile()?,
            }
        }
        None => DatabaseInfo::new(),
    };

    if let Some(url) = &cli.url {
        info = info.url(url.clone());
    }
    if let Some(user) = &cli.user {
        info = info.user(user.clone());
    }
    if let Some(password) = &cli.password {
        info = info.password(password.clone());
    }
    if cli.production {
        info = info.mode(ConnectionMode::Production);
    }
    match cli.cooldown {
        Some(secs) => info = info.cooldown(Duration::from_secs(secs)),
        None if cli.production && info.get_cooldown().is_zero() => {
            info = info.cooldown(DEFAULT_PRODUCTION_COOLDOWN);
        }
        None => {}
    }
    Ok(info)
}

fn run_command(session: &mut SessionManager, cli: &Cli) -> Result<(), DatabaseError> {
    match &cli.command {
        Command::Query { sql } => {
            let table = session.query(sql)?;
            print!("{}", output::render(&table, cli.format));
        }
        Command::Count { sql } => {
            println!("{}", session.query_count(sql)?);
        }
        Command::Execute { sql, commit } => {
            let mut total = 0;
            for statement in sql {
                total += session.execute(statement)?;
            }
            if *commit {
                session.commit()?;
            }
            eprintln!("{} row(s) affected", total);
        }
        Command::Settings => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let info = match resolve_info(&cli) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Command::Settings = cli.command {
        println!("{}", output::describe(&info));
        return ExitCode::SUCCESS;
    }

    let mut session = if cli.no_cooldown {
        SessionManager::new().with_cooldown(NoCooldown)
    } else {
        SessionManager::new().with_cooldown(CountdownCooldown)
    };

    if let Err(e) = session.configure(&info) {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    if !session.open() {
        eprintln!("error: could not open {}", info.get_url());
        return ExitCode::FAILURE;
    }

    let outcome = run_command(&mut session, &cli);
    session.close();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
