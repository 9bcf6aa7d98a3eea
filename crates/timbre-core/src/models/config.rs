//! Configuration structures for the reconciliation pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cfdi::{CfdiParser, DocumentProcessor};
use crate::error::{CfdiError, Result};
use crate::xml::DEFAULT_NAMESPACE_PREFIXES;

/// Main configuration for timbre.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimbreConfig {
    /// Document discovery configuration.
    pub scan: ScanConfig,

    /// XML parsing configuration.
    pub parser: ParserConfig,

    /// Target UUID list configuration.
    pub targets: TargetsConfig,

    /// Exporter configuration.
    pub export: ExportConfig,
}

/// Document discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extension of candidate documents, without the dot.
    pub extension: String,

    /// Follow symbolic links while walking directories.
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "xml".to_string(),
            follow_links: false,
        }
    }
}

/// XML parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Namespace prefixes stripped from element names.
    pub namespace_prefixes: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            namespace_prefixes: DEFAULT_NAMESPACE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Target UUID list configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetsConfig {
    /// Treat the first CSV row as a header.
    pub has_header: bool,
}

/// Exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Result file used when none is given.
    pub default_output: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_output: PathBuf::from("uuids.csv"),
        }
    }
}

impl TimbreConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CfdiError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| CfdiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Document processor honoring the parser settings.
    pub fn processor(&self) -> DocumentProcessor {
        let parser =
            CfdiParser::new().with_namespace_prefixes(self.parser.namespace_prefixes.iter().cloned());
        DocumentProcessor::new().with_parser(parser)
    }
}
