//! Pipeline driver.

use crate::report::{
    ExtractionStatus, FetchAttempt, FetchStatus, PipelineReport, RenderStatus, TargetAttempt,
};
use crate::{PipelineError, PipelineResult};
use mapalign_common_config::{MapalignConfig, TargetConfig};
use mapalign_extract::{build_matcher, extract_to_files, LineMatcher, ReportPaths};
use mapalign_git::{FetchRequest, GitFetcher, SourceFetcher};
use mapalign_render::{LogDirectory, ProcessRenderer, RenderJob, RenderTool, Renderer};
use std::collections::HashSet;
use tracing::{error, info, instrument, warn};

/// Sequential alignment pipeline over the configured targets.
pub struct Pipeline<F, R> {
    config: MapalignConfig,
    fetcher: F,
    renderer: R,
    matcher: Box<dyn LineMatcher>,
}

impl Pipeline<GitFetcher, ProcessRenderer> {
    /// Pipeline using git2 and the configured render tool.
    pub fn from_config(config: MapalignConfig) -> PipelineResult<Self> {
        let matcher = build_matcher(&config.matcher)?;
        let renderer = ProcessRenderer::new(RenderTool::from(&config.render));
        Ok(Self::new(config, GitFetcher::new(), renderer, matcher))
    }
}

impl<F: SourceFetcher, R: Renderer> Pipeline<F, R> {
    pub fn new(
        config: MapalignConfig,
        fetcher: F,
        renderer: R,
        matcher: Box<dyn LineMatcher>,
    ) -> Self {
        Self {
            config,
            fetcher,
            renderer,
            matcher,
        }
    }

    pub fn config(&self) -> &MapalignConfig {
        &self.config
    }

    /// Run every stage.
    ///
    /// Only a log directory that cannot be reset aborts the run; every other
    /// failure is recorded in the report and the next target proceeds. A
    /// target that produces no extraction has its previous reports removed.
    #[instrument(skip(self), fields(targets = self.config.targets.len()))]
    pub async fn run(&self) -> PipelineResult<PipelineReport> {
        let mut report = PipelineReport {
            repositories: self.fetch_sources(),
            targets: Vec::with_capacity(self.config.targets.len()),
        };

        let log_dir = LogDirectory::new(&self.config.log_dir);
        let reset = log_dir
            .reset(&self.config.keep_marker)
            .map_err(|source| PipelineError::LogReset {
                path: self.config.log_dir.clone(),
                source,
            })?;
        info!(removed = reset.removed, kept = reset.kept, "log directory reset");

        let failed: HashSet<&str> = report
            .repositories
            .iter()
            .filter(|r| !r.succeeded())
            .map(|r| r.name.as_str())
            .collect();

        for target in &self.config.targets {
            let attempt = match target.repository.as_deref() {
                Some(repo) if failed.contains(repo) => {
                    warn!(target = %target.name, repository = repo, "skipping target, source unavailable");
                    discard_reports(target);
                    TargetAttempt {
                        name: target.name.clone(),
                        render: RenderStatus::FetchFailed {
                            repository: repo.to_string(),
                        },
                        extraction: ExtractionStatus::Skipped,
                    }
                }
                _ => self.process_target(target).await,
            };
            report.targets.push(attempt);
        }

        if report.succeeded() {
            info!("alignment complete");
        } else {
            warn!(failed = ?report.failed_targets(), "alignment finished with failures");
        }
        Ok(report)
    }

    /// Fetch each referenced repository once, in first-reference order.
    fn fetch_sources(&self) -> Vec<FetchAttempt> {
        let mut seen = HashSet::new();
        let names: Vec<&str> = self
            .config
            .targets
            .iter()
            .filter_map(|t| t.repository.as_deref())
            .filter(|name| seen.insert(*name))
            .collect();

        names
            .into_iter()
            .map(|name| {
                let status = match self.config.repository(name) {
                    Some(repo) => {
                        let request = FetchRequest {
                            name: repo.name.clone(),
                            url: repo.url.clone(),
                            path: repo.path.clone(),
                            branch: repo.branch.clone(),
                        };
                        match self.fetcher.fetch(&request) {
                            Ok(outcome) => FetchStatus::Fetched {
                                cloned: outcome.cloned,
                                head: outcome.head.to_hex(),
                            },
                            Err(e) => {
                                error!(repository = name, error = %e, "fetch failed");
                                FetchStatus::Failed {
                                    error: e.to_string(),
                                }
                            }
                        }
                    }
                    None => FetchStatus::Failed {
                        error: format!("repository {name} is not configured"),
                    },
                };
                FetchAttempt {
                    name: name.to_string(),
                    status,
                }
            })
            .collect()
    }

    #[instrument(skip(self, target), fields(target = %target.name))]
    async fn process_target(&self, target: &TargetConfig) -> TargetAttempt {
        let job = RenderJob::new(target.manifest.clone(), target.output_dir.clone())
            .log_file(target.log_file.clone())
            .ignore_git(self.config.render.ignore_git)
            .debug(self.config.render.debug);

        let render = match self.renderer.render(&job).await {
            Ok(outcome) if outcome.success() => RenderStatus::Succeeded {
                duration_ms: outcome.duration.as_millis() as u64,
            },
            Ok(outcome) => RenderStatus::Failed {
                exit_code: outcome.exit_code,
                timed_out: outcome.timed_out,
            },
            Err(e) => {
                error!(error = %e, "render could not start");
                RenderStatus::Error {
                    error: e.to_string(),
                }
            }
        };

        // Extraction runs on whatever log the render left behind.
        let paths = ReportPaths::from(target);
        let extraction = match extract_to_files(&target.log_file, &paths, self.matcher.as_ref()) {
            Ok(extraction) => ExtractionStatus::Written {
                missing: extraction.missing.len(),
                rendered: extraction.rendered.len(),
            },
            Err(e) => {
                error!(error = %e, "extraction failed");
                discard_reports(target);
                ExtractionStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        TargetAttempt {
            name: target.name.clone(),
            render,
            extraction,
        }
    }
}

/// Remove reports left by an earlier run so they are not read as this run's.
fn discard_reports(target: &TargetConfig) {
    if let Err(e) = ReportPaths::from(target).remove() {
        warn!(target = %target.name, error = %e, "could not remove stale reports");
    }
}
