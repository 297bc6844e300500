//! eBank CLI - your bank accounts in the terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{accounts, auth, clients, config, operations, stats};

/// eBank - banking portal in your terminal
#[derive(Parser)]
#[command(name = "ebank", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session
    Login {
        /// Username (prompted if omitted)
        username: Option<String>,
    },

    /// Forget the current session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Ask the backend whether the token is still valid
        #[arg(long)]
        check: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a client portal account
    Register,

    /// Change your password
    Passwd,

    /// Renew the session token
    Refresh,

    /// Show or change the backend URL
    Config {
        #[command(subcommand)]
        command: Option<config::ConfigCommands>,
    },

    /// Bank accounts
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountCommands,
    },

    /// Credit an account
    Deposit {
        /// Account ID
        account_id: i64,
        /// Amount in MAD
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Debit an account
    Withdraw {
        /// Account ID
        account_id: i64,
        /// Amount in MAD
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer money to another account by its number
    Transfer {
        /// Source account ID
        from: i64,
        /// Destination account number
        to: String,
        /// Amount in MAD
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Operation history of an account
    History {
        /// Account ID
        account_id: i64,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// DEPOT, RETRAIT or VIREMENT
        #[arg(long = "type")]
        kind: Option<String>,
        /// Page number, starting at 0
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        size: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one operation
    Operation {
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download a PDF statement
    Statement {
        /// Account ID
        account_id: i64,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export operation history
    Export {
        /// Account ID
        account_id: i64,
        /// CSV or EXCEL
        #[arg(long, default_value = "CSV")]
        format: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage clients (staff)
    Clients {
        #[command(subcommand)]
        command: clients::ClientCommands,
    },

    /// Bank-wide or per-client statistics (staff)
    Stats {
        /// Client ID
        #[arg(long)]
        client: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Accounts and monthly figures at a glance
    Dashboard {
        /// Client ID (staff)
        #[arg(long)]
        client: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log to stderr, filtered by `EBANK_LOG` (warnings only by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_env("EBANK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            let expired = e
                .downcast_ref::<ebank_core::Error>()
                .is_some_and(|err| err.is_auth());
            if expired {
                eprintln!("Reconnectez-vous avec `ebank login`.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { username } => auth::login(username).await,
        Commands::Logout => auth::logout(),
        Commands::Whoami { check, json } => auth::whoami(check, json).await,
        Commands::Register => auth::register().await,
        Commands::Passwd => auth::change_password().await,
        Commands::Refresh => auth::refresh().await,
        Commands::Config { command } => config::run(command),
        Commands::Accounts { command } => accounts::run(command).await,
        Commands::Deposit { account_id, amount, description, json } => {
            operations::deposit(account_id, &amount, description, json).await
        }
        Commands::Withdraw { account_id, amount, description, json } => {
            operations::withdraw(account_id, &amount, description, json).await
        }
        Commands::Transfer { from, to, amount, description, yes, json } => {
            operations::transfer(from, &to, &amount, description, yes, json).await
        }
        Commands::History { account_id, from, to, kind, page, size, json } => {
            operations::history(operations::HistoryArgs {
                account_id,
                from,
                to,
                kind,
                page,
                size,
                json,
            })
            .await
        }
        Commands::Operation { id, json } => operations::show(id, json).await,
        Commands::Statement { account_id, from, to, output } => {
            operations::statement(account_id, &from, &to, output).await
        }
        Commands::Export { account_id, format, from, to, output } => {
            operations::export(account_id, &format, from, to, output).await
        }
        Commands::Clients { command } => clients::run(command).await,
        Commands::Stats { client, json } => stats::run(client, json).await,
        Commands::Dashboard { client, json } => stats::dashboard(client, json).await,
    }
}
