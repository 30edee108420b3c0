use fakenews::dataset::load_dataset;
use fakenews::pipeline::{run_pipeline, PipelineConfig};
use fakenews::reader::{AsyncCsvReader, ReaderConfig};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::TestFixture;

/// A file without the text column is rejected with the column name in the error
#[tokio::test]
async fn test_missing_required_column() {
    let fixture = TestFixture::new();
    let bad = fixture.create_csv("Fake.csv", "title,subject,date\nA,News,2017\n");
    let (_, real) = fixture.create_corpus(3);

    let err = load_dataset(&bad, &real, &ReaderConfig::default())
        .await
        .expect_err("Missing column should fail");
    assert!(format!("{err:#}").contains("'text'"), "{err:#}");
}

/// Ragged rows are skipped and counted unless fail-fast is set
#[tokio::test]
async fn test_ragged_rows_skip_or_abort() {
    let fixture = TestFixture::new();
    let path = fixture.create_csv(
        "ragged.csv",
        "title,text,subject,date\nOne,body,News,2017\nTwo,body\nThree,body,News,2017\n",
    );

    let lenient = AsyncCsvReader::new(ReaderConfig::default());
    let (rows, stats) = lenient.read_articles(&path).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(stats.rows_skipped, 1);

    let strict = AsyncCsvReader::new(ReaderConfig { fail_fast: true });
    assert!(strict.read_articles(&path).await.is_err());
}

/// A fail-fast pipeline aborts on the first malformed row
#[tokio::test]
async fn test_pipeline_fail_fast() {
    let fixture = TestFixture::new();
    let (fake, _) = fixture.create_corpus(10);
    let mut real_csv = test_utils::synthetic_csv(test_utils::fixtures::REAL_VOCABULARY, 10);
    real_csv.push_str("broken,row\n");
    let real = fixture.create_csv("True.csv", &real_csv);

    let mut config = PipelineConfig::new(&fake, &real);
    config.forest.n_estimators = 5;
    let report = run_pipeline(&config).await.expect("Lenient run should succeed");
    assert_eq!(report.read_stats[1].rows_skipped, 1);
    assert_eq!(report.real_count, 10);

    config.reader.fail_fast = true;
    assert!(run_pipeline(&config).await.is_err());
}

/// Two empty files leave nothing to train on
#[tokio::test]
async fn test_pipeline_empty_inputs() {
    let fixture = TestFixture::new();
    let fake = fixture.create_csv("Fake.csv", "title,text,subject,date\n");
    let real = fixture.create_csv("True.csv", "title,text,subject,date\n");

    let config = PipelineConfig::new(fake, real);
    assert!(run_pipeline(&config).await.is_err());
}

/// One class only cannot train a binary classifier
#[tokio::test]
async fn test_pipeline_single_class() {
    let fixture = TestFixture::new();
    let (fake, _) = fixture.create_corpus(10);
    let real = fixture.create_csv("True.csv", "title,text,subject,date\n");

    let config = PipelineConfig::new(fake, real);
    let err = run_pipeline(&config).await.expect_err("Single class should fail");
    assert!(format!("{err:#}").contains("single class"), "{err:#}");
}
