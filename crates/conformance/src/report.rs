//! Run report: per-case records and totals.

use std::fmt;

use serde::Serialize;

use crate::runner::CaseVerdict;

/// One executed (or skipped) case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Originating fixture
    pub filename: String,
    /// Case description
    pub description: String,
    /// Outcome of the case
    pub verdict: CaseVerdict,
}

/// Verdicts of a run, in execution order, plus totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Cases that passed
    pub passed: usize,
    /// Cases with an assertion failure
    pub failed: usize,
    /// Cases not run
    pub skipped: usize,
    /// Cases whose setup failed
    pub setup_errors: usize,
    /// Every case, in execution order
    pub cases: Vec<CaseRecord>,
}

impl RunReport {
    /// Record a case and update the totals.
    pub fn push(&mut self, record: CaseRecord) {
        match record.verdict {
            CaseVerdict::Passed => self.passed += 1,
            CaseVerdict::Failed(_) => self.failed += 1,
            CaseVerdict::Skipped(_) => self.skipped += 1,
            CaseVerdict::SetupError(_) => self.setup_errors += 1,
        }
        self.cases.push(record);
    }

    /// Total number of cases
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    /// No failures and no setup errors. Skips do not count against a run.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.setup_errors == 0
    }

    /// Records that are failures or setup errors
    pub fn problems(&self) -> impl Iterator<Item = &CaseRecord> {
        self.cases
            .iter()
            .filter(|r| matches!(r.verdict, CaseVerdict::Failed(_) | CaseVerdict::SetupError(_)))
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.problems() {
            match &record.verdict {
                CaseVerdict::Failed(failure) => {
                    writeln!(f, "FAIL  {}", record.filename)?;
                    writeln!(f, "      {}", failure)?;
                }
                CaseVerdict::SetupError(reason) => {
                    writeln!(f, "ERROR {} :: {}", record.filename, record.description)?;
                    writeln!(f, "      {}", reason)?;
                }
                _ => {}
            }
        }
        write!(
            f,
            "{} cases: {} passed, {} failed, {} skipped, {} setup errors",
            self.total(),
            self.passed,
            self.failed,
            self.skipped,
            self.setup_errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::{AssertionFailure, MismatchKind};
    use crate::skip::SkipReason;
    use crudcheck_core::Value;

    fn record(description: &str, verdict: CaseVerdict) -> CaseRecord {
        CaseRecord {
            filename: "f.json".into(),
            description: description.into(),
            verdict,
        }
    }

    fn failure() -> AssertionFailure {
        AssertionFailure {
            description: "broken".into(),
            kind: MismatchKind::Result,
            expected: Value::Int(1),
            actual: Value::Int(2),
        }
    }

    #[test]
    fn test_counts_and_success() {
        let mut report = RunReport::default();
        report.push(record("a", CaseVerdict::Passed));
        report.push(record("b", CaseVerdict::Skipped(SkipReason::Declared("x".into()))));
        assert!(report.is_success());
        assert_eq!((report.passed, report.skipped, report.total()), (1, 1, 2));

        report.push(record("c", CaseVerdict::SetupError("boom".into())));
        assert!(!report.is_success());
        report.push(record("broken", CaseVerdict::Failed(failure())));
        assert_eq!((report.failed, report.setup_errors), (1, 1));
        assert_eq!(report.problems().count(), 2);
    }

    #[test]
    fn test_display_lists_problems_with_file_and_description() {
        let mut report = RunReport::default();
        report.push(record("ok", CaseVerdict::Passed));
        report.push(record("broken", CaseVerdict::Failed(failure())));
        let text = report.to_string();
        assert!(text.contains("FAIL  f.json"));
        assert!(text.contains("broken: result mismatch"));
        assert!(text.contains("expected: 1"));
        assert!(text.ends_with("2 cases: 1 passed, 1 failed, 0 skipped, 0 setup errors"));
    }

    #[test]
    fn test_json_rendering() {
        let mut report = RunReport::default();
        report.push(record("broken", CaseVerdict::Failed(failure())));
        report.push(record("skip", CaseVerdict::Skipped(SkipReason::Excluded("gap".into()))));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["cases"][0]["verdict"]["status"], "failed");
        assert_eq!(json["cases"][0]["verdict"]["detail"]["kind"], "result");
        assert_eq!(json["cases"][0]["verdict"]["detail"]["expected"], 1);
        assert_eq!(json["cases"][1]["verdict"]["detail"]["rule"], "excluded");
    }
}
