use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

pub mod csv_exporter;
pub mod json_exporter;

use crate::source::SearchResult;

/// Export manager for handling different output formats
pub struct ExportManager;

/// Export format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid export format: {}", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Export statistics
#[derive(Debug, Clone)]
pub struct ExportStats {
    pub format: ExportFormat,
    pub file_path: String,
    pub record_count: usize,
    pub file_size_bytes: u64,
}

impl ExportManager {
    /// Export a result list to the given path in the given format
    pub async fn export(
        results: &[SearchResult],
        output_path: &str,
        format: ExportFormat,
    ) -> Result<ExportStats> {
        info!("Exporting {} results to {} as {}", results.len(), output_path, format);

        let file_size_bytes = match format {
            ExportFormat::Csv => csv_exporter::export_csv(results, output_path)?,
            ExportFormat::Json => json_exporter::export_json(results, output_path)?,
        };

        let stats = ExportStats {
            format,
            file_path: output_path.to_string(),
            record_count: results.len(),
            file_size_bytes,
        };

        info!("Export completed: {} records, {} bytes", stats.record_count, stats.file_size_bytes);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
        assert_eq!(ExportFormat::Json.to_string(), "json");
    }
}
