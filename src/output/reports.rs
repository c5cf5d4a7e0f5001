//! Report files written at the end of a run

use crate::output::OutputResult;
use crate::pipeline::PageResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const JSONL_FILE_NAME: &str = "pages.jsonl";
pub const SUMMARY_FILE_NAME: &str = "summary.csv";

const SUMMARY_HEADER: [&str; 5] = [
    "URL",
    "SEO Score",
    "A11y Score",
    "Issues Count",
    "Has Tone Analysis",
];

/// Locations of the files produced by [`write_reports`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub jsonl: PathBuf,
    pub summary: PathBuf,
}

/// Writes one compact JSON object per result, in the order given
pub fn write_jsonl(path: &Path, results: &[PageResult]) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the flat per-page summary table
pub fn write_summary_csv(path: &Path, results: &[PageResult]) -> OutputResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SUMMARY_HEADER)?;

    for result in results {
        writer.write_record([
            result.url.clone(),
            format!("{:.1}", result.scores.seo),
            format!("{:.1}", result.scores.a11y),
            result.issues.len().to_string(),
            if result.has_tone_summary() { "Yes" } else { "No" }.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Creates `dir` if needed and writes both report files into it
pub fn write_reports(dir: &Path, results: &[PageResult]) -> OutputResult<ReportPaths> {
    fs::create_dir_all(dir)?;

    let paths = ReportPaths {
        jsonl: dir.join(JSONL_FILE_NAME),
        summary: dir.join(SUMMARY_FILE_NAME),
    };

    write_jsonl(&paths.jsonl, results)?;
    write_summary_csv(&paths.summary, results)?;

    tracing::info!(
        "Wrote {} results to {} and {}",
        results.len(),
        paths.jsonl.display(),
        paths.summary.display()
    );
    Ok(paths)
}
