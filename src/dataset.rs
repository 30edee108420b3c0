// WHY: labeled corpus assembly plus the per-row preprocessing that feeds every model
// Fake rows come first in the concatenation, then real rows

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::normalizer::TextNormalizer;
use crate::reader::{AsyncCsvReader, CsvArticle, ReadStats, ReaderConfig};

/// Binary class label: 0 = fake, 1 = real
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Fake = 0,
    Real = 1,
}

impl Label {
    pub const ALL: [Label; 2] = [Label::Fake, Label::Real];

    /// Numeric class index (0 fake, 1 real)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            Label::Fake
        } else {
            Label::Real
        }
    }

    /// Human-readable class name used in reports
    pub fn target_name(self) -> &'static str {
        match self {
            Label::Fake => "Fake News",
            Label::Real => "Real News",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// A CSV row tagged with the label of the file it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub title: Option<String>,
    pub text: Option<String>,
    pub subject: Option<String>,
    pub date: Option<String>,
    pub label: Label,
}

impl NewsRecord {
    pub fn from_csv(row: CsvArticle, label: Label) -> Self {
        Self {
            title: row.title,
            text: row.text,
            subject: row.subject,
            date: row.date,
            label,
        }
    }
}

/// A preprocessed record with missing values filled and the cleaned text attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub text: String,
    pub subject: String,
    pub full_text: String,
    pub full_text_clean: String,
    pub label: Label,
}

/// Both corpora plus their concatenation
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub fake: Vec<NewsRecord>,
    pub real: Vec<NewsRecord>,
    pub combined: Vec<NewsRecord>,
    pub stats: Vec<ReadStats>,
}

/// Load the fake and real CSVs, label them and concatenate (fake first)
pub async fn load_dataset(
    fake_path: impl AsRef<Path>,
    real_path: impl AsRef<Path>,
    config: &ReaderConfig,
) -> Result<LoadedDataset> {
    let reader = AsyncCsvReader::new(config.clone());

    // Both files are independent; read them concurrently
    let (fake_result, real_result) = tokio::try_join!(
        reader.read_articles(fake_path.as_ref()),
        reader.read_articles(real_path.as_ref()),
    )?;
    let (fake_rows, fake_stats) = fake_result;
    let (real_rows, real_stats) = real_result;

    let fake: Vec<NewsRecord> = fake_rows
        .into_iter()
        .map(|row| NewsRecord::from_csv(row, Label::Fake))
        .collect();
    let real: Vec<NewsRecord> = real_rows
        .into_iter()
        .map(|row| NewsRecord::from_csv(row, Label::Real))
        .collect();

    let combined: Vec<NewsRecord> = fake.iter().chain(real.iter()).cloned().collect();

    info!(
        "Dataset loaded: {} fake, {} real, {} combined",
        fake.len(),
        real.len(),
        combined.len()
    );

    Ok(LoadedDataset {
        fake,
        real,
        combined,
        stats: vec![fake_stats, real_stats],
    })
}

/// Fill missing values, build `full_text` and its cleaned form for one record
pub fn preprocess_record(record: &NewsRecord, normalizer: &TextNormalizer) -> Article {
    let title = record.title.clone().unwrap_or_default();
    let text = record.text.clone().unwrap_or_default();
    let subject = record.subject.clone().unwrap_or_else(|| "Unknown".to_string());
    let full_text = format!("{title} {text}");
    let full_text_clean = normalizer.normalize(Some(&full_text));

    Article {
        title,
        text,
        subject,
        full_text,
        full_text_clean,
        label: record.label,
    }
}

/// Preprocess every record; rows are independent so they fan out over rayon
///
/// Output order matches input order.
pub fn preprocess_records(
    records: &[NewsRecord],
    normalizer: &TextNormalizer,
    show_progress: bool,
) -> Vec<Article> {
    let progress = if show_progress {
        let bar = ProgressBar::new(records.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len} ({eta})") {
            bar.set_style(style);
        }
        bar.set_message("Cleaning text");
        bar
    } else {
        ProgressBar::hidden()
    };

    let articles: Vec<Article> = records
        .par_iter()
        .map(|record| {
            let article = preprocess_record(record, normalizer);
            progress.inc(1);
            article
        })
        .collect();

    progress.finish_and_clear();
    info!("Preprocessed {} records", articles.len());
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: Option<&str>, text: Option<&str>, subject: Option<&str>, label: Label) -> NewsRecord {
        NewsRecord {
            title: title.map(str::to_string),
            text: text.map(str::to_string),
            subject: subject.map(str::to_string),
            date: None,
            label,
        }
    }

    #[test]
    fn test_label_indices() {
        assert_eq!(Label::Fake.index(), 0);
        assert_eq!(Label::Real.index(), 1);
        assert_eq!(Label::from_index(1), Label::Real);
        assert_eq!(Label::Real.target_name(), "Real News");
    }

    #[test]
    fn test_preprocess_fills_missing_values() {
        let normalizer = TextNormalizer::shared().unwrap();
        let article = preprocess_record(&record(None, Some("Senators voted"), None, Label::Real), normalizer);

        assert_eq!(article.title, "");
        assert_eq!(article.subject, "Unknown");
        assert_eq!(article.full_text, " Senators voted");
        assert_eq!(article.full_text_clean, "senator voted");
        assert_eq!(article.label, Label::Real);
    }

    #[test]
    fn test_preprocess_all_missing() {
        let normalizer = TextNormalizer::shared().unwrap();
        let article = preprocess_record(&record(None, None, None, Label::Fake), normalizer);
        assert_eq!(article.full_text, " ");
        assert_eq!(article.full_text_clean, "");
    }

    #[test]
    fn test_preprocess_records_keeps_order() {
        let normalizer = TextNormalizer::shared().unwrap();
        let records: Vec<NewsRecord> = (0..50)
            .map(|i| record(Some(&format!("Title{}", "s".repeat(i % 2))), Some("body"), Some("news"), Label::Fake))
            .collect();
        let articles = preprocess_records(&records, normalizer, false);
        assert_eq!(articles.len(), 50);
        for (i, article) in articles.iter().enumerate() {
            assert_eq!(article.title, records[i].title.clone().unwrap());
        }
    }

    #[tokio::test]
    async fn test_load_dataset_labels_and_concatenates() {
        let temp_dir = TempDir::new().unwrap();
        let fake_path = temp_dir.path().join("Fake.csv");
        let real_path = temp_dir.path().join("True.csv");
        tokio::fs::write(&fake_path, "title,text,subject,date\nF1,fake body,News,\nF2,fake body,News,\n")
            .await
            .unwrap();
        tokio::fs::write(&real_path, "title,text,subject,date\nR1,real body,politicsNews,\n")
            .await
            .unwrap();

        let dataset = load_dataset(&fake_path, &real_path, &ReaderConfig::default()).await.unwrap();

        assert_eq!(dataset.fake.len(), 2);
        assert_eq!(dataset.real.len(), 1);
        assert_eq!(dataset.combined.len(), 3);
        assert!(dataset.fake.iter().all(|r| r.label == Label::Fake));
        assert!(dataset.real.iter().all(|r| r.label == Label::Real));
        let labels: Vec<Label> = dataset.combined.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![Label::Fake, Label::Fake, Label::Real]);
        assert_eq!(dataset.combined[2].title.as_deref(), Some("R1"));
        assert_eq!(dataset.stats.len(), 2);
    }

    #[tokio::test]
    async fn test_load_dataset_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_dataset(
            temp_dir.path().join("missing.csv"),
            temp_dir.path().join("also-missing.csv"),
            &ReaderConfig::default(),
        )
        .await;
        assert!(result.is_err());
    }
}
