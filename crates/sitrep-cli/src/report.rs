//! `sitrep report`: digest file in, situation report out.

use std::path::Path;

use sitrep_core::{AppConfig, ClassifierKind};
use sitrep_intel::{embedder_from_config, generator_from_config, ReportMode, ReportOptions};

/// Command-line overrides for the configured report options.
#[derive(Debug, Default)]
pub(crate) struct ReportArgs {
    pub classifier: Option<ClassifierKind>,
    pub top_per_category: Option<usize>,
    pub intel_limit: Option<usize>,
    pub direct: bool,
}

impl ReportArgs {
    pub(crate) fn apply(&self, mut options: ReportOptions) -> ReportOptions {
        if let Some(classifier) = self.classifier {
            options.classifier = classifier;
        }
        if let Some(n) = self.top_per_category {
            options.top_per_category = n;
        }
        if let Some(limit) = self.intel_limit {
            options.intel_limit = limit;
        }
        if self.direct {
            options.mode = ReportMode::Direct;
        }
        options
    }
}

/// # Errors
///
/// Returns an error if the digest cannot be read or a backend client cannot
/// be built. Generation failures do not error; they appear in the report.
pub(crate) async fn run(
    config: &AppConfig,
    digest: &Path,
    args: &ReportArgs,
) -> anyhow::Result<String> {
    let digest = crate::read_file(digest)?;
    let options = args.apply(ReportOptions::from_config(config));
    let generator = generator_from_config(config)?;
    let embedder = embedder_from_config(config)?;

    tracing::info!(
        backend = %config.backend,
        model = config.generation_model(),
        classifier = %options.classifier,
        mode = ?options.mode,
        "starting report"
    );
    let report =
        sitrep_intel::run_report(&digest, &options, generator.as_ref(), &embedder).await;
    tracing::info!(chars = report.len(), "report complete");
    Ok(report)
}
