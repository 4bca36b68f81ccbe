//! JSON output formatter for machine processing

use crate::output::OutputFormatter;
use crate::report::Report;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &Report, writer: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, report)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SkipReason, SkippedModule};
    use crate::reconcile::Reconciliation;

    #[test]
    fn test_json_output_schema() {
        let report = Report::assemble(
            Reconciliation {
                diagnostics: vec![],
                skipped: vec![SkippedModule::new(
                    "a-gone",
                    SkipReason::Transient("HTTP 503".to_string()),
                )],
            },
            vec![],
            true,
        );

        let mut buf = Vec::new();
        JsonFormatter::new().format(&report, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["verdict"], "pass");
        assert_eq!(value["include_info"], true);
        assert!(value["modules"].as_array().unwrap().is_empty());
        assert_eq!(value["skipped"][0]["module"], "a-gone");
        assert_eq!(value["skipped"][0]["reason"], "transient");
        assert!(value["invalid_tags"].as_array().unwrap().is_empty());
    }
}
