use clap::ValueEnum;

use tracklint::catalog::{fetch_all, EntryKind, FetchOutcome};
use tracklint::classify::Classifier;
use tracklint::http::CatalogApi;
use tracklint::report::ClassifiedEntry;

pub type CmdResult<T> = tracklint::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

/// Catalog resource selector shared by every subcommand.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Events,
    Properties,
}

impl KindArg {
    pub fn entry_kind(self) -> EntryKind {
        match self {
            KindArg::Events => EntryKind::Event,
            KindArg::Properties => EntryKind::Property,
        }
    }
}

/// Fetch the full catalog and classify every entry in fetch order.
pub(crate) fn classify_catalog(
    api: &dyn CatalogApi,
    kind: EntryKind,
    page_size: u32,
) -> (FetchOutcome, Vec<ClassifiedEntry>) {
    let outcome = fetch_all(api, kind, page_size);
    let classifier = Classifier::with_defaults();
    let classified = outcome
        .entries
        .iter()
        .map(|entry| ClassifiedEntry {
            entry: entry.clone(),
            classification: classifier.classify(entry, kind),
        })
        .collect();
    (outcome, classified)
}

pub mod annotate;
pub mod audit;
pub mod cleanup;
pub mod fetch;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (tracklint::Result<serde_json::Value>, i32) {
    crate::tty::status("tracklint is working...");

    match command {
        crate::Commands::Fetch(args) => dispatch!(args, global, fetch),
        crate::Commands::Audit(args) => dispatch!(args, global, audit),
        crate::Commands::Cleanup(args) => dispatch!(args, global, cleanup),
        crate::Commands::Annotate(args) => dispatch!(args, global, annotate),
    }
}
