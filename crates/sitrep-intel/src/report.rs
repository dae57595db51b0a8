//! Report assembly: map over categories, reduce to an executive summary,
//! then lay out the final document.

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use sitrep_core::Category;

use crate::backend::TextGenerator;
use crate::section::{generate_section, Section, NO_DEVELOPMENTS};
use crate::select::CategorySelection;

const TITLE_PREFIX: &str = "Global Situation Report";

/// Generate one section per selected category, in taxonomy order.
///
/// Up to `concurrency` generator calls are in flight at once; output order
/// does not depend on completion order.
pub async fn generate_sections(
    selection: &CategorySelection,
    generator: &dyn TextGenerator,
    concurrency: usize,
) -> Vec<Section> {
    stream::iter(selection.iter())
        .map(|(category, posts)| generate_section(*category, posts, generator))
        .buffered(concurrency.max(1))
        .collect()
        .await
}

fn summary_prompt(sections: &[Section]) -> String {
    let drafted = sections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "You are a Strategic Intelligence Analyst.\n\
         Read the following drafted sections of a Global Situation Report.\n\
         Write a SINGLE PARAGRAPH (max 4-5 sentences) \"Executive Summary\" that highlights \
         the most critical developments from these sections.\n\
         Do not use bullet points. Do not invent facts.\n\n\
         DRAFTED SECTIONS:\n{drafted}\n"
    )
}

/// Reduce the drafted sections to a single-paragraph summary.
///
/// Only the sections are shown to the generator, never the raw posts.
pub async fn generate_executive_summary(
    sections: &[Section],
    generator: &dyn TextGenerator,
) -> String {
    tracing::info!(sections = sections.len(), "generating executive summary");
    generator
        .generate(&summary_prompt(sections))
        .await
        .trim()
        .to_owned()
}

fn title(date: NaiveDate, attribution: &str) -> String {
    format!(
        "# {TITLE_PREFIX}: {}\n*{attribution}*\n\n",
        date.format("%B %d, %Y")
    )
}

/// Lay out the final report.
#[must_use]
pub fn assemble_report(
    date: NaiveDate,
    attribution: &str,
    summary: &str,
    sections: &[Section],
) -> String {
    let body = sections
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n---\n\n");
    format!(
        "{}**Executive Summary:**\n{summary}\n\n---\n\n{body}",
        title(date, attribution)
    )
}

fn direct_prompt(digest: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("   - {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "You are a Senior Strategic Intelligence Analyst. Transform the following social media \
         posts into a high-level \"{TITLE_PREFIX}\".\n\n\
         STRUCTURE YOUR OUTPUT EXACTLY AS FOLLOWS:\n\
         1. Title: {TITLE_PREFIX}: [Current Date]\n\
         2. Executive Summary: One paragraph overview of the most critical global trends.\n\
         3. Thematic sections (use these EXACT categories, do not invent others):\n\
         {categories}\n\
         4. Use bullet points for specific developments within themes.\n\n\
         TONE: Professional, concise, objective. Focus on strategic significance.\n\n\
         STRICT DATA RULES:\n\
         - ONLY include information explicitly present in the RAW SUMMARY provided below.\n\
         - Do NOT use knowledge from your training data: no invented names, handles, events, \
         or figures.\n\
         - If a section has no relevant data, write \"{NO_DEVELOPMENTS}\"\n\n\
         RAW SUMMARY:\n{digest}"
    )
}

/// Single-pass report: the whole digest goes to the generator in one call.
///
/// The title block is always rebuilt here; a title line emitted by the
/// model is dropped.
pub async fn generate_direct_report(
    digest: &str,
    generator: &dyn TextGenerator,
    date: NaiveDate,
    attribution: &str,
) -> String {
    tracing::info!(chars = digest.len(), "generating direct report");
    let raw = generator.generate(&direct_prompt(digest)).await;

    let body = match raw.split_once('\n') {
        Some((first, rest)) if is_title_line(first) => rest.trim(),
        None if is_title_line(&raw) => "",
        _ => raw.as_str(),
    };

    format!("{}{body}", title(date, attribution))
}

fn is_title_line(line: &str) -> bool {
    line.starts_with('#') || line.contains(TITLE_PREFIX)
}
