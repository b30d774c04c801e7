//! Outcome of a pipeline run.

use serde::Serialize;

/// Result of fetching one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    Fetched { cloned: bool, head: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchAttempt {
    pub name: String,
    #[serde(flatten)]
    pub status: FetchStatus,
}

impl FetchAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, FetchStatus::Fetched { .. })
    }
}

/// Render stage of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderStatus {
    Succeeded { duration_ms: u64 },
    /// The tool ran but exited non-zero or was killed on timeout.
    Failed { exit_code: i32, timed_out: bool },
    /// The tool could not be started.
    Error { error: String },
    /// The target's repository could not be fetched.
    FetchFailed { repository: String },
}

/// Extraction stage of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    Written { missing: usize, rendered: usize },
    Failed { error: String },
    Skipped,
}

/// Both stages of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetAttempt {
    pub name: String,
    pub render: RenderStatus,
    pub extraction: ExtractionStatus,
}

impl TargetAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.render, RenderStatus::Succeeded { .. })
            && matches!(self.extraction, ExtractionStatus::Written { .. })
    }
}

/// Everything one pipeline run did, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub repositories: Vec<FetchAttempt>,
    pub targets: Vec<TargetAttempt>,
}

impl PipelineReport {
    /// True when every fetch and every target succeeded.
    pub fn succeeded(&self) -> bool {
        self.repositories.iter().all(FetchAttempt::succeeded)
            && self.targets.iter().all(TargetAttempt::succeeded)
    }

    /// Names of targets with a failed stage.
    pub fn failed_targets(&self) -> Vec<&str> {
        self.targets
            .iter()
            .filter(|t| !t.succeeded())
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn target(&self, name: &str) -> Option<&TargetAttempt> {
        self.targets.iter().find(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(name: &str, render: RenderStatus) -> TargetAttempt {
        TargetAttempt {
            name: name.into(),
            render,
            extraction: ExtractionStatus::Written {
                missing: 0,
                rendered: 1,
            },
        }
    }

    #[test]
    fn test_failed_targets() {
        let report = PipelineReport {
            repositories: vec![],
            targets: vec![
                attempt("rat", RenderStatus::Succeeded { duration_ms: 5 }),
                attempt(
                    "male",
                    RenderStatus::Failed {
                        exit_code: 1,
                        timed_out: false,
                    },
                ),
            ],
        };
        assert!(!report.succeeded());
        assert_eq!(report.failed_targets(), vec!["male"]);
        assert!(report.target("rat").unwrap().succeeded());
    }

    #[test]
    fn test_failed_fetch_fails_report() {
        let report = PipelineReport {
            repositories: vec![FetchAttempt {
                name: "rat-flatmap".into(),
                status: FetchStatus::Failed {
                    error: "network".into(),
                },
            }],
            targets: vec![],
        };
        assert!(!report.succeeded());
    }

    #[test]
    fn test_empty_report_succeeds() {
        assert!(PipelineReport::default().succeeded());
    }
}
