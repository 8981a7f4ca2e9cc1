//! Decoder configuration types
//!
//! This module defines the knobs the library needs: which extensions mark
//! per-line logs and summary files, how bit errors are normalised, and what to
//! do with a stub that yields no records. Presentation settings (bins, output
//! paths) belong to the application layer.

use crate::types::{ReportError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// File discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Extension of summary files, without the dot. Empty means extension-less.
    #[serde(
        default = "default_summary_extension",
        deserialize_with = "deserialize_extension"
    )]
    pub summary_extension: String,

    /// Extension of per-line logs, without the dot
    #[serde(
        default = "default_log_extension",
        deserialize_with = "deserialize_extension"
    )]
    pub log_extension: String,

    /// Extensions never picked up by directory expansion
    #[serde(
        default = "default_excluded_extensions",
        deserialize_with = "deserialize_extensions"
    )]
    pub excluded_extensions: Vec<String>,

    /// Extensions tried by the stub-pattern search. `None` means log, summary
    /// and extension-less.
    #[serde(default, deserialize_with = "deserialize_optional_extensions")]
    pub stub_search_extensions: Option<Vec<String>>,
}

fn default_summary_extension() -> String {
    "out".to_string()
}

fn default_log_extension() -> String {
    "log".to_string()
}

fn default_excluded_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            summary_extension: default_summary_extension(),
            log_extension: default_log_extension(),
            excluded_extensions: default_excluded_extensions(),
            stub_search_extensions: None,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new discovery configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the summary extension (leading dot is stripped)
    pub fn with_summary_extension(mut self, ext: impl Into<String>) -> Self {
        self.summary_extension = normalize_extension(&ext.into());
        self
    }

    /// Builder method: set the per-line log extension (leading dot is stripped)
    pub fn with_log_extension(mut self, ext: impl Into<String>) -> Self {
        self.log_extension = normalize_extension(&ext.into());
        self
    }

    /// Builder method: add an excluded extension
    pub fn exclude_extension(mut self, ext: impl Into<String>) -> Self {
        self.excluded_extensions.push(normalize_extension(&ext.into()));
        self
    }

    /// Builder method: set the extensions tried by the stub-pattern search
    pub fn with_stub_search_extensions(mut self, exts: Vec<String>) -> Self {
        self.stub_search_extensions = Some(exts.iter().map(|e| normalize_extension(e)).collect());
        self
    }

    /// Extensions tried by the stub-pattern search, deduplicated in order
    pub fn stub_search_extensions(&self) -> Vec<String> {
        let candidates = match &self.stub_search_extensions {
            Some(exts) => exts.clone(),
            None => vec![
                self.log_extension.clone(),
                self.summary_extension.clone(),
                String::new(),
            ],
        };

        let mut unique = Vec::with_capacity(candidates.len());
        for ext in candidates {
            if !unique.contains(&ext) {
                unique.push(ext);
            }
        }
        unique
    }

    pub fn is_summary_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(&self.summary_extension)
    }

    pub fn is_log_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(&self.log_extension)
    }

    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        !ext.is_empty()
            && self
                .excluded_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Reject configurations that make the companion-file rule ambiguous
    pub fn validate(&self) -> Result<()> {
        let dotted = std::iter::once(&self.summary_extension)
            .chain(std::iter::once(&self.log_extension))
            .chain(&self.excluded_extensions)
            .chain(self.stub_search_extensions.iter().flatten())
            .find(|ext| ext.starts_with('.'));
        if let Some(ext) = dotted {
            return Err(ReportError::InvalidConfig(format!(
                "extensions are given without the leading dot (got '{}')",
                ext
            )));
        }
        if self.summary_extension.eq_ignore_ascii_case(&self.log_extension) {
            return Err(ReportError::InvalidConfig(format!(
                "summary and log extensions must differ (both '{}')",
                self.summary_extension
            )));
        }
        if self.is_excluded_extension(&self.summary_extension)
            || self.is_excluded_extension(&self.log_extension)
        {
            return Err(ReportError::InvalidConfig(
                "log and summary extensions cannot be excluded".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_string()
}

fn deserialize_extension<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|ext| normalize_extension(&ext))
}

fn deserialize_extensions<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let exts = Vec::<String>::deserialize(deserializer)?;
    Ok(exts.iter().map(|e| normalize_extension(e)).collect())
}

fn deserialize_optional_extensions<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let exts = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(exts.map(|exts| exts.iter().map(|e| normalize_extension(e)).collect()))
}

/// What the stub aggregator does with a stub whose files yield no records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyStubPolicy {
    /// Drop the stub with a warning and keep going
    #[default]
    Skip,
    /// Fail the whole aggregation
    Abort,
}

/// Parsing and aggregation parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateOptions {
    /// Bits per block used to normalise BER. Zero is treated as absent.
    #[serde(default)]
    pub bits_per_block: Option<u64>,

    #[serde(default)]
    pub empty_stub_policy: EmptyStubPolicy,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set bits per block
    pub fn with_bits_per_block(mut self, bits: Option<u64>) -> Self {
        self.bits_per_block = bits;
        self
    }

    /// Builder method: set the empty-stub policy
    pub fn with_empty_stub_policy(mut self, policy: EmptyStubPolicy) -> Self {
        self.empty_stub_policy = policy;
        self
    }
}

/// Optional (k, n) filter for summary lines and stub derivation
///
/// Each half is independent: a filter with only `k` set matches any `n`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnFilter {
    pub k: Option<u64>,
    pub n: Option<u64>,
}

impl KnFilter {
    pub fn new(k: Option<u64>, n: Option<u64>) -> Self {
        Self { k, n }
    }

    /// Filter that matches every line
    pub fn any() -> Self {
        Self::default()
    }

    pub fn matches(&self, k: u64, n: u64) -> bool {
        self.k.map_or(true, |want| want == k) && self.n.map_or(true, |want| want == n)
    }

    /// Both halves, when both are set
    pub fn pair(&self) -> Option<(u64, u64)> {
        Some((self.k?, self.n?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_config_builder() {
        let config = DiscoveryConfig::new()
            .with_summary_extension(".sum")
            .with_log_extension("LOG")
            .exclude_extension(".csv");

        assert_eq!(config.summary_extension, "sum");
        assert!(config.is_log_extension("log"));
        assert!(config.is_summary_extension("SUM"));
        assert!(config.is_excluded_extension("txt"));
        assert!(config.is_excluded_extension("csv"));
        assert!(!config.is_excluded_extension(""));
    }

    #[test]
    fn test_stub_search_extensions_default_and_dedup() {
        let config = DiscoveryConfig::new();
        assert_eq!(config.stub_search_extensions(), vec!["log", "out", ""]);

        let extensionless = DiscoveryConfig::new().with_summary_extension("");
        assert_eq!(extensionless.stub_search_extensions(), vec!["log", ""]);
    }

    #[test]
    fn test_validate_rejects_clashing_extensions() {
        assert!(DiscoveryConfig::new().validate().is_ok());
        assert!(DiscoveryConfig::new()
            .with_summary_extension("log")
            .validate()
            .is_err());
        assert!(DiscoveryConfig::new()
            .with_summary_extension("txt")
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialized_extensions_are_normalized() {
        let config: DiscoveryConfig = serde_json::from_str(
            r#"{"summary_extension": ".sum", "excluded_extensions": [".csv"], "stub_search_extensions": [".dat", ""]}"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert!(config.is_summary_extension("sum"));
        assert!(config.is_excluded_extension("csv"));
        assert_eq!(config.stub_search_extensions(), vec!["dat", ""]);
    }

    #[test]
    fn test_validate_rejects_dotted_extension() {
        let config = DiscoveryConfig {
            log_extension: ".log".to_string(),
            ..DiscoveryConfig::default()
        };
        assert!(matches!(config.validate(), Err(ReportError::InvalidConfig(_))));
    }

    #[test]
    fn test_kn_filter_logic() {
        assert!(KnFilter::any().matches(1, 2));

        let both = KnFilter::new(Some(512), Some(1024));
        assert!(both.matches(512, 1024));
        assert!(!both.matches(512, 2048));
        assert_eq!(both.pair(), Some((512, 1024)));

        let k_only = KnFilter::new(Some(512), None);
        assert!(k_only.matches(512, 7));
        assert!(!k_only.matches(256, 1024));
        assert_eq!(k_only.pair(), None);
    }

    #[test]
    fn test_aggregate_options_deserialize_defaults() {
        let opts: AggregateOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.bits_per_block, None);
        assert_eq!(opts.empty_stub_policy, EmptyStubPolicy::Skip);

        let strict: AggregateOptions =
            serde_json::from_str(r#"{"bits_per_block": 1024, "empty_stub_policy": "abort"}"#)
                .unwrap();
        assert_eq!(strict.bits_per_block, Some(1024));
        assert_eq!(strict.empty_stub_policy, EmptyStubPolicy::Abort);
    }
}
