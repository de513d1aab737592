/*!
 * Reporting functionality for treeprompt
 *
 * Summarizes a run using the tabled library for console tables, or as JSON
 * for scripting. Reports go to stderr so they never mix with a prompt
 * written to stdout.
 */

use std::time::Duration;

use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::ReportFormat;
use crate::error::Result;
use crate::types::FolderTokenSummary;
use crate::utils::format_file_size;

/// Statistics for one run
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Output destination
    pub output: String,
    /// Time taken from scan start to prompt written
    #[serde(serialize_with = "serialize_millis", rename = "duration_ms")]
    pub duration: Duration,
    /// Files that passed the pattern matcher
    pub files_matched: usize,
    /// Files rendered into the prompt
    pub files_rendered: usize,
    /// Tokens in the final prompt
    pub prompt_tokens: usize,
    /// Encoding used for counting
    pub encoding: String,
    /// Size of the prompt in bytes
    pub prompt_bytes: u64,
    /// Heaviest folders, present only when folder aggregation ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_token_folders: Option<Vec<FolderTokenSummary>>,
    /// Non-fatal warnings raised during the run
    pub warnings: Vec<String>,
}

fn serialize_millis<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}

/// Report generator for run results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ScanReport) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.generate_console_report(report)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        }
    }

    /// Print the report to stderr
    pub fn print_report(&self, report: &ScanReport) -> Result<()> {
        eprintln!("\n{}", self.generate_report(report)?);
        Ok(())
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📂 Output".to_string(),
                value: report.output.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "🔎 Files Matched".to_string(),
                value: self.format_number(report.files_matched),
            },
            SummaryRow {
                key: "📄 Files Rendered".to_string(),
                value: self.format_number(report.files_rendered),
            },
            SummaryRow {
                key: "📏 Prompt Size".to_string(),
                value: format_file_size(report.prompt_bytes),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens ({})",
                    self.format_number(report.prompt_tokens),
                    report.encoding
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Create the high-token folders table
    fn create_folders_table(&self, folders: &[FolderTokenSummary]) -> String {
        #[derive(Tabled)]
        struct FolderRow {
            #[tabled(rename = "Folder")]
            path: String,

            #[tabled(rename = "Tokens")]
            tokens: String,

            #[tabled(rename = "Files")]
            files: String,
        }

        let rows: Vec<FolderRow> = folders
            .iter()
            .map(|folder| FolderRow {
                path: folder.path.display().to_string(),
                tokens: self.format_number(folder.token_count),
                files: folder.file_count.to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ScanReport) -> String {
        let mut sections = Vec::new();

        if let Some(folders) = &report.high_token_folders {
            sections.push(format!(
                "📋  TOP {} FOLDERS BY TOKEN COUNT\n{}",
                folders.len(),
                self.create_folders_table(folders)
            ));
        }

        sections.push(format!(
            "✅  PROMPT COMPLETE\n{}",
            self.create_summary_table(report)
        ));

        for warning in &report.warnings {
            sections.push(format!("⚠️  {}", warning));
        }

        sections.join("\n\n")
    }
}
