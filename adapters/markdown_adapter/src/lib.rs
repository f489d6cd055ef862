use chrono::{DateTime, Local, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use wishlist_core::ports::{ReportWriter, Result};
use wishlist_core::utils::{format_generated_at, report_file_name};
use wishlist_core::{OverlapReport, ServiceOutcome};

/// Markdown writer adapter implementation
pub struct MarkdownWriterAdapter {
    output_folder: PathBuf,
}

impl MarkdownWriterAdapter {
    pub fn new(output_folder: impl Into<PathBuf>) -> Self {
        Self {
            output_folder: output_folder.into(),
        }
    }

    /// Path the report for `report` would be written to at `at`
    pub fn report_path<Tz: TimeZone>(&self, report: &OverlapReport, at: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        self.output_folder
            .join(report_file_name(report.platform.label(), at))
    }

    /// Formats the whole report: one section per service, in report order
    fn format_markdown<Tz: TimeZone>(&self, report: &OverlapReport, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let wishlist = report.platform.label();
        let mut output = String::new();
        output.push_str(&format!("# {} wishlist on subscription services\n\n", wishlist));
        output.push_str(&format!(
            "*{} wishlist games checked against {} services, generated {}*\n\n",
            report.wishlist_size,
            report.services.len(),
            format_generated_at(at)
        ));
        output.push_str("---\n\n");

        for service in &report.services {
            output.push_str(&format!("## {}\n\n", service.service_name));
            match &service.outcome {
                ServiceOutcome::Matched(result) if result.is_empty() => {
                    output.push_str(&format!(
                        "*No games in {} wishlist are on {}.*\n\n",
                        wishlist, service.service_name
                    ));
                }
                ServiceOutcome::Matched(result) => {
                    for name in result.names() {
                        output.push_str(&format!("- {}\n", name));
                    }
                    output.push('\n');
                }
                ServiceOutcome::Failed(reason) => {
                    output.push_str(&format!("*[Could not check: {}]*\n\n", reason.trim()));
                }
            }
        }

        output
    }

    fn write_at<Tz: TimeZone>(&self, report: &OverlapReport, at: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        // Create output directory if it doesn't exist
        let output_dir = Path::new(&self.output_folder);
        fs::create_dir_all(output_dir)?;

        let file_path = self.report_path(report, at);
        fs::write(&file_path, self.format_markdown(report, at))?;
        Ok(file_path)
    }
}

impl ReportWriter for MarkdownWriterAdapter {
    fn write(&self, report: &OverlapReport) -> Result<()> {
        let path = self.write_at(report, &Local::now())?;
        info!(path = %path.display(), "markdown report written");
        Ok(())
    }
}
