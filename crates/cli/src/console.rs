use std::io::{self, Write};
use wishlist_core::ports::{ReportWriter, Result};
use wishlist_core::{OverlapReport, ServiceOutcome};

/// Plain text report on stdout, one block per service
pub struct ConsoleReportWriter;

/// The serialized report on stdout
pub struct JsonReportWriter;

pub fn render_text(report: &OverlapReport) -> String {
    let wishlist = report.platform.label();
    let mut output = String::new();
    for service in &report.services {
        let name = &service.service_name;
        match &service.outcome {
            ServiceOutcome::Matched(result) if result.is_empty() => {
                output.push_str(&format!("\nNo games in {} wishlist are on {}.\n", wishlist, name));
            }
            ServiceOutcome::Matched(result) => {
                output.push_str(&format!("\n{} wishlist games on {}:\n", wishlist, name));
                for game in result.names() {
                    output.push_str(game);
                    output.push('\n');
                }
            }
            ServiceOutcome::Failed(reason) => {
                output.push_str(&format!("\nCould not check {}: {}\n", name, reason));
            }
        }
    }
    output
}

impl ReportWriter for ConsoleReportWriter {
    fn write(&self, report: &OverlapReport) -> Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(render_text(report).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

impl ReportWriter for JsonReportWriter {
    fn write(&self, report: &OverlapReport) -> Result<()> {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, report).map_err(io::Error::from)?;
        writeln!(out)?;
        Ok(())
    }
}
