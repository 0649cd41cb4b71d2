use clap::{Parser, Subcommand};

mod commands;
mod output;
mod tty;

use commands::{annotate, audit, cleanup, fetch, GlobalArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "tracklint")]
#[command(version = VERSION)]
#[command(about = "Governance audit and cleanup for tracking-plan catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the catalog to a local JSON snapshot
    Fetch(fetch::FetchArgs),
    /// Classify the catalog and write a governance report
    Audit(audit::AuditArgs),
    /// Remove flagged entries (dry run unless --execute)
    Cleanup(cleanup::CleanupArgs),
    /// Send flagged names to an LLM for a taxonomy review
    Annotate(annotate::AnnotateArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let global = GlobalArgs {};

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
