pub mod classifiers;
pub mod dataset;
pub mod explore;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod reader;
pub mod sentiment;
pub mod split;
pub mod vectorizer;

// Re-export the text cleaning surface
pub use normalizer::{normalize, NormalizerConfig, TextNormalizer};

// Re-export dataset and model types used by the CLI and benches
pub use classifiers::{Classifier, ForestConfig, LogisticRegression, ModelError, ModelKind, MultinomialNb, RandomForest};
pub use dataset::{load_dataset, preprocess_records, Article, Label, NewsRecord};
pub use metrics::{ClassificationReport, ConfusionMatrix, Evaluation};
pub use pipeline::{analyze_dataset, run_pipeline, write_report, PipelineConfig, RunReport};
pub use reader::{ReadStats, ReaderConfig};
pub use vectorizer::{CountVectorizer, SparseMatrix, TfidfVectorizer};
