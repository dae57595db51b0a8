//! Classification and situation-report synthesis over daily post digests.
//!
//! A run parses a digest into [`Post`](sitrep_core::Post)s, classifies them
//! into the fixed taxonomy, keeps the most engaging posts per category, writes
//! one section per category and reduces those into an executive summary.

pub mod backend;
pub mod classify;
pub mod digest;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod section;
pub mod select;

#[cfg(test)]
mod testing;

pub use backend::{
    attribution, embedder_from_config, generator_from_config, Embedder, GeminiGenerator,
    OllamaEmbedder, OllamaGenerator, RetryPolicy, TextGenerator,
};
pub use digest::{extract_posts, render_digest, truncate_digest};
pub use error::IntelError;
pub use pipeline::{classify, run_report, ReportMode, ReportOptions};
pub use report::{
    assemble_report, generate_direct_report, generate_executive_summary, generate_sections,
};
pub use section::{generate_section, sanitize_section_body, Section};
pub use select::{select_top_per_category, CategorySelection};
