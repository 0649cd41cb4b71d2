use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use tracklint::annotate::Annotator;
use tracklint::catalog::DEFAULT_PAGE_SIZE;
use tracklint::cleanup::plan;
use tracklint::config::{AnnotateConfig, ApiConfig};
use tracklint::http::CatalogClient;
use tracklint::utils::io::write_json;

use super::{classify_catalog, CmdResult, GlobalArgs, KindArg};

#[derive(Args)]
pub struct AnnotateArgs {
    /// Catalog resource whose flagged entries get reviewed
    kind: KindArg,

    /// Entries requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Chat model to use instead of the default
    #[arg(long)]
    model: Option<String>,

    /// Annotation dump path (defaults to annotations.json)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
pub struct AnnotateOutput {
    kind: String,
    flagged: usize,
    batches: usize,
    path: String,
}

pub fn run(args: AnnotateArgs, _global: &GlobalArgs) -> CmdResult<AnnotateOutput> {
    let kind = args.kind.entry_kind();
    let api_config = ApiConfig::from_env()?;
    let mut annotate_config = AnnotateConfig::from_env()?;
    if let Some(model) = args.model {
        annotate_config.model = model;
    }

    let client = CatalogClient::new(&api_config);
    let (_, classified) = classify_catalog(&client, kind, args.page_size);
    let candidates = plan(&classified);

    let annotator = Annotator::new(annotate_config);
    let annotations = annotator.annotate(&candidates);

    let path = args.out.unwrap_or_else(|| PathBuf::from("annotations.json"));
    write_json(&path, &annotations, "write annotations")?;

    Ok((
        AnnotateOutput {
            kind: kind.plural().to_string(),
            flagged: candidates.len(),
            batches: annotations.len(),
            path: path.display().to_string(),
        },
        0,
    ))
}
