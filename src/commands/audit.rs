use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use tracklint::annotate::Annotator;
use tracklint::catalog::DEFAULT_PAGE_SIZE;
use tracklint::cleanup::plan;
use tracklint::config::{AnnotateConfig, ApiConfig};
use tracklint::http::CatalogClient;
use tracklint::report::{aggregate, ReportSummary};
use tracklint::utils::io::write_json;

use super::{classify_catalog, CmdResult, GlobalArgs, KindArg};

#[derive(Args)]
pub struct AuditArgs {
    /// Catalog resource to audit
    kind: KindArg,

    /// Entries requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Report path (defaults to governance_report.json)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Flagged-entry dump path (defaults to flagged_events.json /
    /// flagged_properties.json)
    #[arg(long)]
    flagged: Option<PathBuf>,

    /// Also send flagged names to the LLM annotator (needs OPENAI_API_KEY)
    #[arg(long)]
    annotate: bool,
}

#[derive(Serialize)]
pub struct AuditOutput {
    kind: String,
    complete: bool,
    summary: ReportSummary,
    report_path: String,
    flagged_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotations_path: Option<String>,
}

pub fn run(args: AuditArgs, _global: &GlobalArgs) -> CmdResult<AuditOutput> {
    let kind = args.kind.entry_kind();
    let config = ApiConfig::from_env()?;
    let client = CatalogClient::new(&config);

    let (outcome, classified) = classify_catalog(&client, kind, args.page_size);
    let report = aggregate(&classified);
    report.log_summary();

    let report_path = args
        .report
        .unwrap_or_else(|| PathBuf::from("governance_report.json"));
    write_json(&report_path, &report, "write governance report")?;

    let flagged_path = args
        .flagged
        .unwrap_or_else(|| PathBuf::from(format!("flagged_{}.json", kind.plural())));
    write_json(&flagged_path, &report.flagged, "write flagged entries")?;

    let annotations_path = if args.annotate {
        let annotate_config = AnnotateConfig::from_env()?;
        let candidates = plan(&classified);
        let annotations = Annotator::new(annotate_config).annotate(&candidates);
        let path = PathBuf::from("annotations.json");
        write_json(&path, &annotations, "write annotations")?;
        Some(path.display().to_string())
    } else {
        None
    };

    let exit_code = if report.summary.total_flagged > 0 { 1 } else { 0 };

    Ok((
        AuditOutput {
            kind: kind.plural().to_string(),
            complete: outcome.complete,
            summary: report.summary,
            report_path: report_path.display().to_string(),
            flagged_path: flagged_path.display().to_string(),
            annotations_path,
        },
        exit_code,
    ))
}
