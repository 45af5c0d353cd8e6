use serde::Serialize;

use crate::config::{FrontMatterFormat, MeddlerConfig, OutputFormat, SsgTarget};

/// One warning or error tied to a source file (or directory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMessage {
    pub file: String,
    pub message: String,
}

/// Config snapshot embedded in the report for reproducibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub format: FrontMatterFormat,
    pub output_format: OutputFormat,
    pub target: SsgTarget,
    pub include_drafts: bool,
    pub include_responses: bool,
}

impl From<&MeddlerConfig> for ReportConfig {
    fn from(config: &MeddlerConfig) -> Self {
        Self {
            format: config.format,
            output_format: config.output_format,
            target: config.target,
            include_drafts: config.include_drafts,
            include_responses: config.include_responses,
        }
    }
}

/// Aggregate counters for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub posts_found: usize,
    pub posts_converted: usize,
    pub drafts_converted: usize,
    pub responses_skipped: usize,
    pub responses_included: usize,
    pub images_downloaded: usize,
    pub images_failed: usize,
    pub supplementary_files: usize,
}

/// Append-only record of one conversion run, serialized once at the end as
/// `meddler-report.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub generated_at: String,
    pub tool: String,
    pub version: String,
    pub config: ReportConfig,
    pub summary: ReportSummary,
    pub warnings: Vec<ReportMessage>,
    pub errors: Vec<ReportMessage>,
}

impl ConversionReport {
    /// Creates an empty report for a run started at `generated_at`
    /// (RFC 3339; the engine stamps it so this crate stays clock-free).
    pub fn new(config: &MeddlerConfig, generated_at: String) -> Self {
        Self {
            generated_at,
            tool: "meddler".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: ReportConfig::from(config),
            summary: ReportSummary::default(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Records a recoverable problem; the run continues.
    pub fn record_warning(&mut self, file: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ReportMessage {
            file: file.into(),
            message: message.into(),
        });
    }

    /// Records a per-file failure; the run continues with the next file.
    pub fn record_error(&mut self, file: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ReportMessage {
            file: file.into(),
            message: message.into(),
        });
    }
}
