use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use fakenews::classifiers::ModelKind;
use fakenews::pipeline::{run_pipeline, write_report, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "fakenews")]
#[command(about = "Fake-news classification: text cleaning, TF-IDF and classic classifiers")]
#[command(version)]
struct Args {
    /// CSV of fake articles (label 0)
    fake_csv: PathBuf,

    /// CSV of real articles (label 1)
    real_csv: PathBuf,

    /// Share of articles held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// Seed for the split and the random forest
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Comma-separated models: logistic, naive-bayes, random-forest
    #[arg(long, value_delimiter = ',', default_value = "logistic,naive-bayes,random-forest")]
    models: Vec<ModelKind>,

    /// Trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_estimators: usize,

    /// Terms listed per class in exploration output
    #[arg(long, default_value_t = 20)]
    top_n: usize,

    /// Also compute top words, bigrams, TF-IDF terms and sentiment per class
    #[arg(long)]
    explore: bool,

    /// Keep "Reuters" source markers in cleaned text
    #[arg(long)]
    keep_source_marker: bool,

    /// Abort on the first malformed CSV row
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Run report output path
    #[arg(long, default_value = "run_report.json")]
    stats_out: PathBuf,
}

impl Args {
    fn into_config(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.fake_csv, self.real_csv);
        config.test_size = self.test_size;
        config.seed = self.seed;
        config.models = self.models;
        config.forest.n_estimators = self.n_estimators;
        config.forest.seed = self.seed;
        config.top_n = self.top_n;
        config.explore = self.explore;
        config.normalizer.strip_source_marker = !self.keep_source_marker;
        config.reader.fail_fast = self.fail_fast;
        config.show_progress = !self.no_progress;
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting fakenews");
    info!(?args, "Parsed CLI arguments");

    // WHY: fail before any work with a clear message about which input is missing
    for path in [&args.fake_csv, &args.real_csv] {
        if !path.is_file() {
            anyhow::bail!("Input file does not exist: {}", path.display());
        }
    }

    let stats_out = args.stats_out.clone();
    let config = args.into_config();
    let report = run_pipeline(&config).await?;

    println!("fakenews v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Loaded {} fake and {} real articles; {} train / {} test; {} TF-IDF features",
        report.fake_count, report.real_count, report.train_count, report.test_count, report.vocabulary_size
    );
    for evaluation in &report.evaluations {
        println!();
        println!("{evaluation}");
    }

    if let Some(classes) = &report.exploration {
        for class in classes {
            println!();
            println!("== {} ==", class.label.target_name());
            let columns = [
                ("Top words", &class.top_words),
                ("Top bigrams", &class.top_bigrams),
                ("Top mean TF-IDF terms", &class.top_tfidf_terms),
            ];
            for (title, terms) in columns {
                println!("{title}:");
                for term in terms.iter() {
                    println!("  {:<30} {:.4}", term.term, term.score);
                }
            }
            if let (Some(p), Some(s)) = (class.sentiment.polarity, class.sentiment.subjectivity) {
                println!(
                    "Polarity     min {:.3} q1 {:.3} median {:.3} q3 {:.3} max {:.3}",
                    p.min, p.q1, p.median, p.q3, p.max
                );
                println!(
                    "Subjectivity min {:.3} q1 {:.3} median {:.3} q3 {:.3} max {:.3}",
                    s.min, s.q1, s.median, s.q3, s.max
                );
            }
        }
    }

    write_report(&report, &stats_out).await?;
    info!("Run report written to {}", stats_out.display());
    println!();
    println!("Run report written to {}", stats_out.display());

    Ok(())
}
