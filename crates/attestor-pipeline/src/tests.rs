//! Integration tests for the pipeline

#[cfg(test)]
mod tests {
    use crate::{Pipeline, PipelineConfig, ProgressFn, RunOptions};
    use attestor_oracle::MockOracle;
    use std::sync::{Arc, Mutex};

    /// Config matching the boundary-free cut arithmetic scenarios.
    fn wide_config() -> PipelineConfig {
        PipelineConfig {
            max_excerpt_size: 3_000,
            overlap: 500,
            concurrency: 3,
            ..Default::default()
        }
    }

    /// A document whose two paragraphs carry distinct marker words, sized
    /// to segment into exactly two excerpts.
    fn two_part_document() -> String {
        let first = "QUICKFOX controls narrative sentence. ".repeat(16); // 608 chars
        let second = "LAZYDOG exceptions narrative sentence. ".repeat(15);
        format!("{}\n\n{}", first.trim_end(), second.trim_end())
    }

    #[tokio::test]
    async fn test_excerpt_count_arithmetic_end_to_end() {
        // 9,000 boundary-free chars at max 3000 / overlap 500: three full
        // windows plus the overlap-driven remainder.
        let oracle = MockOracle::new(r#"{"Auditor": "Counting LLP", "Scope": "Security"}"#);
        let pipeline = Pipeline::new(oracle, wide_config()).unwrap();

        let document = "x".repeat(9_000);
        let aggregate = pipeline.run(&document).await;

        assert_eq!(aggregate.total_excerpts, 4);
        assert_eq!(aggregate.failed_excerpts, 0);
        assert!(aggregate.error.is_none());
        assert_eq!(aggregate.auditor, "Counting LLP");
    }

    #[tokio::test]
    async fn test_one_raising_excerpt_leaves_the_rest_intact() {
        let oracle = MockOracle::new("{}");
        // The second excerpt's head repeats the first one's tail, so its
        // rule must be registered first to win the match.
        oracle.respond_when(
            "LAZYDOG",
            r#"{"Auditor": "Survivor LLP", "Tags": ["backups"]}"#,
        );
        oracle.fail_when("QUICKFOX", "simulated outage");

        let config = PipelineConfig {
            max_excerpt_size: 700,
            overlap: 50,
            concurrency: 2,
            ..Default::default()
        };
        let pipeline = Pipeline::new(oracle, config).unwrap();

        let aggregate = pipeline.run(&two_part_document()).await;

        assert_eq!(aggregate.total_excerpts, 2);
        assert_eq!(aggregate.failed_excerpts, 1);
        let error = aggregate.error.as_deref().unwrap();
        assert!(
            error.contains("Excerpt 1: oracle call failed"),
            "unexpected error roster: {}",
            error
        );
        // The failed excerpt's siblings still contribute their data.
        assert_eq!(aggregate.auditor, "Survivor LLP");
        assert_eq!(aggregate.tags, vec!["backups"]);
    }

    #[tokio::test]
    async fn test_fenced_reply_with_leading_prose_parses() {
        let oracle = MockOracle::new(
            "Happy to help! Here is the summary:\n```json\n{\"Auditor\": \"Fence & Prose LLP\", \"Tags\": [\"encryption\"]}\n```",
        );
        let pipeline = Pipeline::new(oracle, PipelineConfig::default()).unwrap();

        let aggregate = pipeline.run("A short single-excerpt report.").await;

        assert_eq!(aggregate.failed_excerpts, 0);
        assert_eq!(aggregate.auditor, "Fence & Prose LLP");
        assert_eq!(aggregate.tags, vec!["encryption"]);
    }

    #[tokio::test]
    async fn test_status_counts_sum_across_excerpts() {
        let oracle = MockOracle::new(r#"{"Status Counts": {"Passed": 2}}"#);
        let pipeline = Pipeline::new(oracle, wide_config()).unwrap();

        let document = "x".repeat(9_000); // 4 excerpts
        let aggregate = pipeline.run(&document).await;

        assert_eq!(aggregate.total_excerpts, 4);
        assert_eq!(aggregate.status_counts.passed, 8);
        assert_eq!(aggregate.status_counts.passed_with_exception, 0);
        assert_eq!(aggregate.status_counts.excluded, 0);
    }

    #[tokio::test]
    async fn test_scalar_first_wins_follows_excerpt_order() {
        let oracle = MockOracle::new("{}");
        oracle.respond_when("LAZYDOG", r#"{"Auditor": "Second Excerpt LLP"}"#);
        oracle.respond_when("QUICKFOX", r#"{"Auditor": "First Excerpt LLP"}"#);

        let config = PipelineConfig {
            max_excerpt_size: 700,
            overlap: 50,
            concurrency: 2,
            min_response_len: 2,
            ..Default::default()
        };
        let pipeline = Pipeline::new(oracle, config).unwrap();

        let aggregate = pipeline.run(&two_part_document()).await;

        assert_eq!(aggregate.failed_excerpts, 0);
        assert_eq!(aggregate.auditor, "First Excerpt LLP");
    }

    #[tokio::test]
    async fn test_progress_callback_reaches_the_total() {
        let oracle = MockOracle::new(r#"{"Scope": "Availability and Security"}"#);
        let pipeline = Pipeline::new(oracle, wide_config()).unwrap();

        let events: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let progress: ProgressFn = Arc::new(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });

        let document = "x".repeat(9_000);
        pipeline
            .run_with(
                &document,
                RunOptions {
                    progress: Some(progress),
                    ..Default::default()
                },
            )
            .await;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(*events.last().unwrap(), (4, 4));
    }

    #[tokio::test]
    async fn test_runs_are_deterministic() {
        let oracle = MockOracle::new(
            r#"{"Auditor": "Stable LLP", "Tags": ["access control", "encryption"], "Status Counts": {"Passed": 3, "Excluded": 1}}"#,
        );
        let pipeline = Pipeline::new(oracle, wide_config()).unwrap();

        let document = "Control testing narrative sentence. ".repeat(200);
        let first = pipeline.run(&document).await;
        let second = pipeline.run(&document).await;

        assert_eq!(first, second);
    }
}
