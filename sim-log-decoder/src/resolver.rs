//! Input path resolution
//!
//! Turns user-supplied paths (files and/or directories) into a deterministic,
//! deduplicated list of [`SourceFile`]s, and implements the `*_<k>_<n>*`
//! stub-pattern search.
//!
//! Directory listings are always sorted by file name before use, so the same
//! filesystem state always resolves to the same list.

use crate::config::DiscoveryConfig;
use crate::types::{ReportError, Result, SourceFile, SourceKind};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Resolves input paths against a discovery configuration
pub struct PathResolver<'a> {
    config: &'a DiscoveryConfig,
    /// (k, n) marker used to derive stub names from file stems
    marker: Option<(u64, u64)>,
}

impl<'a> PathResolver<'a> {
    pub fn new(config: &'a DiscoveryConfig) -> Self {
        Self {
            config,
            marker: None,
        }
    }

    /// Derive stub names by cutting file stems at `_<k>_<n>`
    pub fn with_marker(mut self, k: u64, n: u64) -> Self {
        self.marker = Some((k, n));
        self
    }

    /// Resolve `inputs` into source files of the requested kind
    ///
    /// An empty `inputs` list searches the current directory. Explicit files
    /// are kept as-is and must exist; directories are expanded according to
    /// `kind`:
    ///
    /// - `PerLineLog`: summary files are always included; log and
    ///   extension-less files only when a summary file with the same stem sits
    ///   next to them; excluded extensions (`.txt` by default) never are.
    /// - `Summary`: only files with the summary extension.
    ///
    /// Fails with `NoFilesFound` if nothing remains.
    pub fn resolve(&self, inputs: &[PathBuf], kind: SourceKind) -> Result<Vec<SourceFile>> {
        let cwd = [PathBuf::from(".")];
        let inputs = if inputs.is_empty() { &cwd[..] } else { inputs };

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for raw in inputs {
            let path = expand_home(raw);
            let candidates = if path.is_dir() {
                log::debug!("Expanding directory {:?} for {} files", path, kind);
                self.expand_directory(&path, kind)?
            } else if path.is_file() {
                vec![self.source_file(path)]
            } else {
                return Err(ReportError::NotFound(path));
            };

            for source in candidates {
                if seen.insert(source.path.clone()) {
                    resolved.push(source);
                } else {
                    log::debug!("Skipping duplicate input {:?}", source.path);
                }
            }
        }

        if resolved.is_empty() {
            return Err(ReportError::NoFilesFound(format!(
                "no {} files in {:?}",
                kind, inputs
            )));
        }

        log::info!("Resolved {} {} file(s)", resolved.len(), kind);
        Ok(resolved)
    }

    /// Find files named `*_<k>_<n>*` in `dir` and group them by stub
    ///
    /// The marker is matched against the whole file name, so dots in the stub
    /// part (`nms0.75_512_1024`) are allowed. Only a dot after the marker
    /// starts an extension, and that extension must be one of the configured
    /// stub-search extensions. The stub is the part of the name before
    /// `_<k>_<n>` (see [`derive_stub`]).
    pub fn find_logs_by_stub(
        &self,
        k: u64,
        n: u64,
        dir: &Path,
    ) -> Result<BTreeMap<String, Vec<SourceFile>>> {
        let dir = expand_home(dir);
        if !dir.is_dir() {
            return Err(ReportError::NotFound(dir));
        }

        let marker = stub_marker(k, n);
        let extensions = self.config.stub_search_extensions();
        let mut matches = Vec::new();

        for path in list_files(&dir)? {
            let name = file_name(&path);
            if name.starts_with('.') {
                continue;
            }
            let Some((stem, ext)) = split_marked_name(&name, &marker) else {
                continue;
            };
            if self.config.is_excluded_extension(ext)
                || !extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
            {
                continue;
            }

            let stub = derive_stub(stem, k, n);
            log::debug!("Matched {:?} to stub '{}'", path, stub);
            matches.push(SourceFile::new(path, self.kind_of(ext), stub));
        }

        if matches.is_empty() {
            return Err(ReportError::NoFilesFound(format!(
                "no files matching '*{}*' in {:?}",
                marker, dir
            )));
        }

        let groups = group_by_stub(matches);
        log::info!("Found {} stub(s) matching '*{}*'", groups.len(), marker);
        Ok(groups)
    }

    fn expand_directory(&self, dir: &Path, kind: SourceKind) -> Result<Vec<SourceFile>> {
        let files = list_files(dir)?;
        let names: HashSet<String> = files.iter().map(|p| file_name(p)).collect();

        let mut selected = Vec::new();
        for path in files {
            let ext = extension(&path);
            if self.config.is_excluded_extension(&ext) {
                log::trace!("Excluding {:?} by extension", path);
                continue;
            }

            let keep = match kind {
                SourceKind::Summary => self.config.is_summary_extension(&ext),
                SourceKind::PerLineLog => {
                    if self.config.is_summary_extension(&ext) {
                        true
                    } else if ext.is_empty() || self.config.is_log_extension(&ext) {
                        let companion = companion_name(&file_stem(&path), &self.config.summary_extension);
                        let found = names.contains(&companion);
                        if !found {
                            log::debug!("Skipping {:?}: no companion {:?}", path, companion);
                        }
                        found
                    } else {
                        false
                    }
                }
            };

            if keep {
                selected.push(self.source_file(path));
            }
        }
        Ok(selected)
    }

    fn source_file(&self, path: PathBuf) -> SourceFile {
        let ext = extension(&path);
        let stem = file_stem(&path);
        let stub = match self.marker {
            Some((k, n)) => {
                let name = file_name(&path);
                match split_marked_name(&name, &stub_marker(k, n)) {
                    Some((marked, _)) => derive_stub(marked, k, n),
                    None => stem,
                }
            }
            None => stem,
        };
        SourceFile::new(path, self.kind_of(&ext), stub)
    }

    fn kind_of(&self, ext: &str) -> SourceKind {
        if self.config.is_summary_extension(ext) {
            SourceKind::Summary
        } else {
            SourceKind::PerLineLog
        }
    }
}

/// Resolve `inputs` with the default marker-less stub derivation
pub fn resolve_sources(
    inputs: &[PathBuf],
    kind: SourceKind,
    config: &DiscoveryConfig,
) -> Result<Vec<SourceFile>> {
    PathResolver::new(config).resolve(inputs, kind)
}

/// Stub-pattern search in `dir`, grouped by stub name
pub fn find_logs_by_stub(
    k: u64,
    n: u64,
    dir: &Path,
    config: &DiscoveryConfig,
) -> Result<BTreeMap<String, Vec<SourceFile>>> {
    PathResolver::new(config).find_logs_by_stub(k, n, dir)
}

/// Stub name of a file stem under the `<stub>_<k>_<n>[suffix]` convention
///
/// Returns the part before the first `_<k>_<n>`. When the marker is absent, or
/// nothing precedes it, the whole stem is the stub.
pub fn derive_stub(stem: &str, k: u64, n: u64) -> String {
    match stem.split_once(&stub_marker(k, n)) {
        Some((prefix, _)) if !prefix.is_empty() => prefix.to_string(),
        _ => stem.to_string(),
    }
}

/// Group source files by stub, keeping each group's input order
pub fn group_by_stub(sources: Vec<SourceFile>) -> BTreeMap<String, Vec<SourceFile>> {
    let mut groups: BTreeMap<String, Vec<SourceFile>> = BTreeMap::new();
    for source in sources {
        groups.entry(source.stub.clone()).or_default().push(source);
    }
    groups
}

fn stub_marker(k: u64, n: u64) -> String {
    format!("_{}_{}", k, n)
}

/// Split a file name containing `marker` into (stem, extension)
///
/// A dot before or inside the marker belongs to the stem; the file is then
/// extension-less. Returns `None` when the name does not contain the marker.
fn split_marked_name<'n>(name: &'n str, marker: &str) -> Option<(&'n str, &'n str)> {
    let marker_end = name.find(marker)? + marker.len();
    match name.rfind('.') {
        Some(dot) if dot >= marker_end => Some((&name[..dot], &name[dot + 1..])),
        _ => Some((name, "")),
    }
}

fn companion_name(stem: &str, summary_extension: &str) -> String {
    if summary_extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, summary_extension)
    }
}

/// Regular files in `dir`, sorted by path
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ReportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
