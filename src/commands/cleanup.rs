use clap::Args;

use tracklint::catalog::DEFAULT_PAGE_SIZE;
use tracklint::cleanup::{plan, run as run_cleanup, CleanupOptions, CleanupOutcome};
use tracklint::config::ApiConfig;
use tracklint::http::CatalogClient;
use tracklint::log_status;

use super::{classify_catalog, CmdResult, GlobalArgs, KindArg};

#[derive(Args)]
pub struct CleanupArgs {
    /// Catalog resource to clean up
    kind: KindArg,

    /// Entries requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Actually delete. Without this flag the run stops after the review
    /// listing.
    #[arg(long)]
    execute: bool,
}

pub fn run(args: CleanupArgs, _global: &GlobalArgs) -> CmdResult<CleanupOutcome> {
    let kind = args.kind.entry_kind();
    let config = ApiConfig::from_env()?;
    let client = CatalogClient::new(&config);

    let (_, classified) = classify_catalog(&client, kind, args.page_size);
    let candidates = plan(&classified);

    let count = candidates.len();
    let mut confirm = || {
        if !crate::tty::is_stdin_tty() {
            log_status!("cleanup", "No terminal to confirm on; aborting");
            return false;
        }
        crate::tty::confirm_with_token(&format!("{} {}", count, kind.plural()))
    };

    let options = CleanupOptions {
        execute: args.execute,
        ..CleanupOptions::default()
    };
    let outcome = run_cleanup(&client, kind, candidates, &mut confirm, &options);

    // Individual delete failures are reported in the outcome, not the exit
    // code.
    Ok((outcome, 0))
}
