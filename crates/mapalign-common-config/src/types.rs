//! Configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Root configuration.
///
/// Every section carries `#[serde(default)]`, so an empty file yields the
/// reference pipeline (rat, male, female).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapalignConfig {
    /// Upstream flatmap source repositories.
    pub repositories: Vec<RepositoryConfig>,
    /// Directory holding the render logs. Reset once per pipeline run.
    pub log_dir: PathBuf,
    /// File name preserved when the log directory is reset.
    pub keep_marker: String,
    /// External render tool invocation.
    pub render: RenderConfig,
    /// Log line grammar used by the extractor.
    pub matcher: MatcherConfig,
    /// Ordered alignment targets.
    pub targets: Vec<TargetConfig>,
    /// Single-manifest render used by CI.
    pub publish: PublishConfig,
}

impl Default for MapalignConfig {
    fn default() -> Self {
        Self {
            repositories: vec![
                RepositoryConfig::new(
                    "rat-flatmap",
                    "https://github.com/AnatomicMaps/rat-flatmap.git",
                    "sources/rat-flatmap",
                    "main",
                ),
                RepositoryConfig::new(
                    "human-flatmap",
                    "https://github.com/AnatomicMaps/human-flatmap.git",
                    "sources/human-flatmap",
                    "main",
                ),
            ],
            log_dir: PathBuf::from("alignment/log"),
            keep_marker: ".gitkeep".to_string(),
            render: RenderConfig::default(),
            matcher: MatcherConfig::default(),
            targets: vec![
                TargetConfig::reference("rat", "rat-flatmap", "sources/rat-flatmap/manifest.json"),
                TargetConfig::reference(
                    "male",
                    "human-flatmap",
                    "sources/human-flatmap/male.manifest.json",
                ),
                TargetConfig::reference(
                    "female",
                    "human-flatmap",
                    "sources/human-flatmap/female.manifest.json",
                ),
            ],
            publish: PublishConfig::default(),
        }
    }
}

impl MapalignConfig {
    /// Look up a repository by name.
    pub fn repository(&self, name: &str) -> Option<&RepositoryConfig> {
        self.repositories.iter().find(|r| r.name == name)
    }

    /// Look up a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Return a copy with every relative path joined onto `base`.
    ///
    /// Manifest entries that look like URLs are left untouched.
    pub fn rooted_at(&self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let mut config = self.clone();

        for repo in &mut config.repositories {
            repo.path = root(base, &repo.path);
        }
        config.log_dir = root(base, &config.log_dir);
        for target in &mut config.targets {
            target.manifest = root_manifest(base, &target.manifest);
            target.output_dir = root(base, &target.output_dir);
            target.log_file = root(base, &target.log_file);
            target.missing_report = root(base, &target.missing_report);
            target.rendered_report = root(base, &target.rendered_report);
            target.summary_report = target.summary_report.as_ref().map(|p| root(base, p));
        }
        config.publish.manifest = root_manifest(base, &config.publish.manifest);
        config.publish.output_dir = root(base, &config.publish.output_dir);
        config
    }
}

fn root(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn root_manifest(base: &Path, manifest: &str) -> String {
    if is_remote_manifest(manifest) {
        manifest.to_string()
    } else {
        root(base, Path::new(manifest)).to_string_lossy().into_owned()
    }
}

/// A manifest given as a URL with a host rather than a local path.
///
/// Drive-letter paths such as `C:/maps` parse as URLs but have no host.
pub fn is_remote_manifest(manifest: &str) -> bool {
    url::Url::parse(manifest).is_ok_and(|u| u.has_host())
}

/// An upstream source repository checked out at a fixed branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Name referenced by targets.
    pub name: String,
    /// Clone URL.
    pub url: String,
    /// Local checkout directory.
    pub path: PathBuf,
    /// Branch to check out.
    pub branch: String,
}

impl RepositoryConfig {
    /// Create a repository entry.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            path: path.into(),
            branch: branch.into(),
        }
    }
}

/// One alignment target: a manifest rendered to a log, then reduced to reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Target name (rat, male, female).
    pub name: String,
    /// Repository the manifest lives in. `None` for manifests needing no fetch.
    #[serde(default)]
    pub repository: Option<String>,
    /// Manifest path or URL.
    pub manifest: String,
    /// Render output directory.
    pub output_dir: PathBuf,
    /// Render log file.
    pub log_file: PathBuf,
    /// Missing-node report.
    pub missing_report: PathBuf,
    /// Rendered-entity report.
    pub rendered_report: PathBuf,
    /// Optional per-context summary report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_report: Option<PathBuf>,
}

impl TargetConfig {
    /// Build a target using the conventional `alignment/` layout.
    pub fn reference(name: &str, repository: &str, manifest: &str) -> Self {
        Self {
            name: name.to_string(),
            repository: Some(repository.to_string()),
            manifest: manifest.to_string(),
            output_dir: PathBuf::from("flatmaps"),
            log_file: PathBuf::from(format!("alignment/log/{name}.log")),
            missing_report: PathBuf::from(format!("alignment/output/{name}_missing.csv")),
            rendered_report: PathBuf::from(format!("alignment/output/{name}_rendered.csv")),
            summary_report: None,
        }
    }
}

/// How the external render tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Program to run.
    pub program: String,
    /// Arguments placed before any generated flag (e.g. `-m mapmaker`).
    pub args: Vec<String>,
    /// Flag preceding the manifest.
    pub manifest_flag: String,
    /// Flag preceding the output directory.
    pub output_flag: String,
    /// Flag skipping source-control metadata checks.
    pub ignore_git_flag: String,
    /// Debug verbosity flag.
    pub debug_flag: String,
    /// Force regeneration flag (publish only).
    pub force_flag: String,
    /// Flat output layout flag (publish only).
    pub flat_layout_flag: String,
    /// Background tile generation flag (publish only).
    pub background_tiles_flag: String,
    /// Flag taking the log path. When unset, stdout and stderr are redirected
    /// into the log file instead.
    pub log_flag: Option<String>,
    /// Pass the ignore-git flag to alignment renders.
    pub ignore_git: bool,
    /// Pass the debug flag to alignment renders.
    pub debug: bool,
    /// Kill a render after this many seconds. Unset means wait forever.
    pub timeout_secs: Option<u64>,
    /// Extra environment for the render process.
    pub env: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            program: "mapmaker".to_string(),
            args: Vec::new(),
            manifest_flag: "--manifest".to_string(),
            output_flag: "--output".to_string(),
            ignore_git_flag: "--ignore-git".to_string(),
            debug_flag: "--debug".to_string(),
            force_flag: "--force".to_string(),
            flat_layout_flag: "--flat".to_string(),
            background_tiles_flag: "--background-tiles".to_string(),
            log_flag: None,
            ignore_git: true,
            debug: true,
            timeout_secs: None,
            env: BTreeMap::new(),
        }
    }
}

/// Log grammar family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    /// `RESOLVED <term> -> <id>` / `MISSING <term>` markers.
    Marker,
    /// mapmaker connectivity diagnostics and path summaries.
    #[default]
    Connectivity,
    /// User-supplied regular expressions.
    Pattern,
}

/// Extractor matcher configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Grammar family.
    pub grammar: Grammar,
    /// Regexes for resolved lines (named groups `term`, `rendered`, optional `kind`, `context`).
    pub resolved: Vec<String>,
    /// Regexes for missing lines (named group `term`, optional `context`).
    pub missing: Vec<String>,
    /// Regexes for context lines (named group `context`).
    pub context: Vec<String>,
}

/// Single-manifest render performed by CI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Manifest path or URL.
    pub manifest: String,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Force regeneration.
    pub force: bool,
    /// Flat output layout.
    pub flat_layout: bool,
    /// Generate background tiles.
    pub background_tiles: bool,
    /// Environment variable holding the SciCrunch API key.
    pub api_key_env: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            manifest: "sources/rat-flatmap/manifest.json".to_string(),
            output_dir: PathBuf::from("flatmaps"),
            force: true,
            flat_layout: true,
            background_tiles: true,
            api_key_env: crate::env::vars::SCICRUNCH_API_KEY.to_string(),
        }
    }
}
