// WHY: one end-to-end run: load both corpora, clean, split, vectorize, train and
// evaluate each selected model, optionally explore, and collect a JSON-ready report

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::classifiers::{Classifier, ForestConfig, LogisticRegression, ModelKind, MultinomialNb, RandomForest};
use crate::dataset::{load_dataset, preprocess_records, Label, LoadedDataset};
use crate::explore::{explore, ClassExploration};
use crate::metrics::Evaluation;
use crate::normalizer::{NormalizerConfig, TextNormalizer};
use crate::reader::{ReadStats, ReaderConfig};
use crate::split::{take, train_test_split};
use crate::vectorizer::TfidfVectorizer;

/// Everything a run needs; echoed back in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub fake_path: PathBuf,
    pub real_path: PathBuf,
    pub test_size: f64,
    pub seed: u64,
    pub models: Vec<ModelKind>,
    pub logistic_c: f64,
    pub logistic_max_iter: usize,
    pub nb_alpha: f64,
    pub forest: ForestConfig,
    pub top_n: usize,
    pub explore: bool,
    pub normalizer: NormalizerConfig,
    pub reader: ReaderConfig,
    #[serde(skip)]
    pub show_progress: bool,
}

impl PipelineConfig {
    pub fn new(fake_path: impl Into<PathBuf>, real_path: impl Into<PathBuf>) -> Self {
        Self {
            fake_path: fake_path.into(),
            real_path: real_path.into(),
            test_size: 0.2,
            seed: 42,
            models: ModelKind::ALL.to_vec(),
            logistic_c: 1.0,
            logistic_max_iter: 1000,
            nb_alpha: 1.0,
            forest: ForestConfig::default(),
            top_n: 20,
            explore: false,
            normalizer: NormalizerConfig::default(),
            reader: ReaderConfig::default(),
            show_progress: false,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            bail!("test size must be between 0 and 1 (exclusive), got {}", self.test_size);
        }
        if self.models.is_empty() {
            bail!("no models selected");
        }
        Ok(())
    }
}

/// Wall-clock time per stage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    pub load_ms: u64,
    pub preprocess_ms: u64,
    pub vectorize_ms: u64,
    pub explore_ms: Option<u64>,
    pub total_ms: u64,
}

/// Result of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Unix seconds at start
    pub run_start: u64,
    pub config: PipelineConfig,
    pub read_stats: Vec<ReadStats>,
    pub fake_count: usize,
    pub real_count: usize,
    pub train_count: usize,
    pub test_count: usize,
    pub vocabulary_size: usize,
    pub evaluations: Vec<Evaluation>,
    pub exploration: Option<Vec<ClassExploration>>,
    pub timings: StageTimings,
}

/// Instantiate an untrained model with the configured hyperparameters
pub fn build_model(kind: ModelKind, config: &PipelineConfig) -> Box<dyn Classifier> {
    match kind {
        ModelKind::LogisticRegression => Box::new(LogisticRegression::new(config.logistic_c, config.logistic_max_iter)),
        ModelKind::NaiveBayes => Box::new(MultinomialNb::new(config.nb_alpha)),
        ModelKind::RandomForest => Box::new(RandomForest::new(config.forest.clone())),
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

pub async fn run_pipeline(config: &PipelineConfig) -> Result<RunReport> {
    config.validate()?;
    let run_start = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let total_start = Instant::now();

    let stage = Instant::now();
    let dataset = load_dataset(&config.fake_path, &config.real_path, &config.reader).await?;
    let load_ms = elapsed_ms(stage);

    // Cleaning, training and exploration are CPU-bound rayon work; keep them off the async workers
    let owned_config = config.clone();
    let mut report = tokio::task::spawn_blocking(move || analyze_dataset(&owned_config, dataset))
        .await
        .context("Analysis task did not complete")??;

    report.run_start = run_start;
    report.timings.load_ms = load_ms;
    report.timings.total_ms = elapsed_ms(total_start);
    Ok(report)
}

/// Clean, split, vectorize, train, evaluate and optionally explore an already loaded dataset
///
/// Synchronous: call it from a blocking context. `run_start`, `load_ms` and `total_ms` are
/// left for the caller to fill in.
pub fn analyze_dataset(config: &PipelineConfig, dataset: LoadedDataset) -> Result<RunReport> {
    config.validate()?;
    if dataset.combined.is_empty() {
        bail!("both input files are empty");
    }
    let analysis_start = Instant::now();
    let mut timings = StageTimings::default();

    let stage = Instant::now();
    let normalizer = TextNormalizer::new(config.normalizer.clone())?;
    let articles = preprocess_records(&dataset.combined, &normalizer, config.show_progress);
    timings.preprocess_ms = elapsed_ms(stage);

    let (train_idx, test_idx) = train_test_split(articles.len(), config.test_size, config.seed);
    let documents: Vec<&str> = articles.iter().map(|a| a.full_text_clean.as_str()).collect();
    let labels: Vec<Label> = articles.iter().map(|a| a.label).collect();
    let train_docs = take(&documents, &train_idx);
    let test_docs = take(&documents, &test_idx);
    let y_train = take(&labels, &train_idx);
    let y_test = take(&labels, &test_idx);
    info!("Split {} articles into {} train / {} test", articles.len(), train_idx.len(), test_idx.len());

    let stage = Instant::now();
    let mut vectorizer = TfidfVectorizer::new()?;
    let x_train = vectorizer
        .fit_transform(&train_docs)
        .context("Failed to fit TF-IDF on the training split")?;
    let x_test = vectorizer.transform(&test_docs)?;
    timings.vectorize_ms = elapsed_ms(stage);
    info!(
        "TF-IDF: {} features, {} non-zeros in train",
        x_train.n_cols(),
        x_train.nnz()
    );

    let mut evaluations = Vec::with_capacity(config.models.len());
    for &kind in &config.models {
        let mut model = build_model(kind, config);
        let stage = Instant::now();
        model
            .fit(&x_train, &y_train)
            .with_context(|| format!("Failed to train {}", model.name()))?;
        let train_time_ms = elapsed_ms(stage);

        let predictions = model
            .predict(&x_test)
            .with_context(|| format!("Failed to predict with {}", model.name()))?;
        let evaluation = Evaluation::new(model.name(), &y_test, &predictions, train_time_ms);
        info!(
            "{}: accuracy {:.4} (trained in {} ms)",
            evaluation.model, evaluation.accuracy, train_time_ms
        );
        evaluations.push(evaluation);
    }

    let exploration = if config.explore {
        let stage = Instant::now();
        let classes = explore(&articles, config.top_n)?;
        timings.explore_ms = Some(elapsed_ms(stage));
        Some(classes)
    } else {
        None
    };

    timings.total_ms = elapsed_ms(analysis_start);
    Ok(RunReport {
        run_start: 0,
        config: config.clone(),
        read_stats: dataset.stats,
        fake_count: dataset.fake.len(),
        real_count: dataset.real.len(),
        train_count: train_idx.len(),
        test_count: test_idx.len(),
        vocabulary_size: vectorizer.feature_names().len(),
        evaluations,
        exploration,
        timings,
    })
}

/// Write the report as pretty JSON, creating parent directories as needed
pub async fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(report)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
