mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "malsim",
    about = "Sandboxed malware-behavior simulator for security teaching — every effect is confined to one directory tree and reversible",
    version,
    propagate_version = true
)]
struct Cli {
    /// Sandbox root (default: ./demo_data)
    #[arg(long, global = true, env = "MALSIM_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision the sandbox directories and seed documents
    Init,

    /// Write a fictitious autostart entry into system_boot/
    Persistence,

    /// Copy a harmless payload stub into strategic_locations/
    Duplicate {
        /// Number of copies (default: config default_copies)
        #[arg(long)]
        copies: Option<usize>,
    },

    /// Enumerate and log every file under user_files/
    Scan,

    /// Fake ransomware: drop a note and rename files with a .locked marker
    Lock,

    /// Reverse the lock; name collisions go to quarantine/, never deleted
    Unlock,

    /// Walk the propagation state machine (log trace only)
    Propagate,

    /// Run the full scenario: persistence, duplication, scan, lock, propagation
    Run,

    /// Show the last events from the sandbox log
    Log {
        /// Number of trailing events to show
        #[arg(long, default_value = "20")]
        tail: usize,
    },

    /// Evaluate an arithmetic expression (+ - * / % and parentheses)
    Calc { expr: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::action::init(&root, cli.json),
        Commands::Persistence => cmd::action::persistence(&root, cli.json),
        Commands::Duplicate { copies } => cmd::action::duplicate(&root, copies, cli.json),
        Commands::Scan => cmd::action::scan(&root, cli.json),
        Commands::Lock => cmd::action::lock(&root, cli.json),
        Commands::Unlock => cmd::action::unlock(&root, cli.json),
        Commands::Propagate => cmd::action::propagate(&root, cli.json),
        Commands::Run => cmd::action::run_full(&root, cli.json),
        Commands::Log { tail } => cmd::log::run(&root, tail, cli.json),
        Commands::Calc { expr } => cmd::calc::run(&expr, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
