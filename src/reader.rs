use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for CSV reading behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Abort on the first malformed row instead of skipping it
    pub fail_fast: bool,
}

/// Statistics for one CSV read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadStats {
    pub file_path: String,
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
}

/// Cell values read as missing, matching the usual dataframe NA markers
pub const MISSING_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn missing_or_value<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty() && !MISSING_MARKERS.contains(&v.as_str())))
}

/// One news article row as stored on disk
///
/// Every column is optional; empty cells and NA markers come back as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvArticle {
    #[serde(deserialize_with = "missing_or_value")]
    pub title: Option<String>,
    #[serde(deserialize_with = "missing_or_value")]
    pub text: Option<String>,
    #[serde(deserialize_with = "missing_or_value")]
    pub subject: Option<String>,
    #[serde(deserialize_with = "missing_or_value")]
    pub date: Option<String>,
}

/// Columns that must be present in the header
pub const REQUIRED_COLUMNS: &[&str] = &["title", "text"];

/// Async CSV reader: file bytes are read with tokio, rows parsed with `csv` + serde
pub struct AsyncCsvReader {
    config: ReaderConfig,
}

impl AsyncCsvReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every article row from a CSV file
    pub async fn read_articles<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> Result<(Vec<CsvArticle>, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of CSV: {}", path.display());

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

        let (articles, rows_skipped) = self
            .parse_articles(&bytes)
            .with_context(|| format!("Failed to parse CSV file {}", path.display()))?;

        let stats = ReadStats {
            file_path: path.display().to_string(),
            rows_read: articles.len() as u64,
            rows_skipped,
            bytes_read: bytes.len() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Successfully read {}: {} rows ({} skipped), {} bytes in {}ms",
            path.display(),
            stats.rows_read,
            stats.rows_skipped,
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((articles, stats))
    }

    /// Parse CSV bytes into article rows, returning the rows and the skipped-row count
    pub fn parse_articles(&self, bytes: &[u8]) -> Result<(Vec<CsvArticle>, u64)> {
        // Header names are trimmed before serde sees them, so " text" still maps to `text`
        let mut reader = csv::ReaderBuilder::new()
            .flexible(false)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let headers = reader.headers().context("Failed to read CSV header")?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == *column) {
                anyhow::bail!("Missing required column '{}' (found: {:?})", column, headers);
            }
        }

        let mut articles = Vec::new();
        let mut skipped = 0u64;

        for (row_index, row) in reader.deserialize::<CsvArticle>().enumerate() {
            match row {
                Ok(article) => articles.push(article),
                Err(e) => {
                    // +2: 1-based numbering plus the header line
                    let error_msg = format!("Malformed row {}: {}", row_index + 2, e);
                    if self.config.fail_fast {
                        return Err(anyhow::anyhow!(error_msg));
                    }
                    warn!("{}", error_msg);
                    skipped += 1;
                }
            }
        }

        Ok((articles, skipped))
    }
}
