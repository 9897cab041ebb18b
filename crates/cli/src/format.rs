//! Output formatting for reports and case listings.

use crudcheck_conformance::{ResolvedCase, RunReport};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format a run report.
pub fn format_report(report: &RunReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => report
            .to_json()
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e)),
        OutputMode::Human => report.to_string(),
    }
}

/// Format discovered cases without running them.
pub fn format_cases(cases: &[ResolvedCase], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let listed: Vec<serde_json::Value> = cases
                .iter()
                .map(|case| {
                    serde_json::json!({
                        "filename": case.filename,
                        "description": case.description,
                        "namespace": case.namespace().to_string(),
                        "skip": case.skip.as_ref().map(|r| r.to_string()),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&listed)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => cases
            .iter()
            .map(|case| match &case.skip {
                Some(reason) => format!("SKIP  {} ({})", case.display_name(), reason),
                None => format!("RUN   {}", case.display_name()),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format a run-level error.
pub fn format_error(err: &dyn std::fmt::Display, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}
