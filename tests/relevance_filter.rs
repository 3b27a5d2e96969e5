use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use mockall::{Sequence, mock};

use letterbox::mailbox::RawEmail;
use letterbox::oracle::{CompletionOracle, OracleError, ResponseFormat, RetryPolicy};
use letterbox::patterns::PatternTables;
use letterbox::preferences::UserProfile;
use letterbox::relevance::RelevanceFilter;

mock! {
    pub Oracle {}

    #[async_trait]
    impl CompletionOracle for Oracle {
        async fn complete(&self, prompt: &str, format: ResponseFormat) -> Result<String, OracleError>;
    }
}

fn email(id: &str, subject: &str, body: &str) -> RawEmail {
    RawEmail {
        id: id.to_string(),
        subject: subject.to_string(),
        from: "Newsletter <news@example.com>".to_string(),
        date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        body: body.to_string(),
        snippet: format!("{subject} preview"),
    }
}

fn batch() -> Vec<RawEmail> {
    vec![
        email(
            "m1",
            "Chip export rules tighten",
            "<html><body><p>New export controls on advanced semiconductors take effect next month, \
             affecting foundries across the region.</p><footer>Unsubscribe</footer></body></html>",
        ),
        email(
            "m2",
            "Flash sale ends tonight",
            "<html><body><p>Everything in the store is forty percent off until midnight.</p></body></html>",
        ),
        email(
            "m3",
            "Weekly robotics roundup",
            "<html><body><p>Warehouse robots learned to pick irregular items this week.</p></body></html>",
        ),
    ]
}

fn profile() -> UserProfile {
    UserProfile {
        occupation: "Supply chain analyst".to_string(),
        current_work: "Semiconductor sourcing report".to_string(),
        topics: vec!["semiconductors".to_string(), "robotics".to_string()],
    }
}

fn ids(emails: &[RawEmail]) -> Vec<&str> {
    emails.iter().map(|e| e.id.as_str()).collect()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn test_filter_keeps_included_emails_in_order() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_complete()
        .withf(|prompt, format| {
            *format == ResponseFormat::Json
                && prompt.contains("Supply chain analyst")
                && prompt.contains("semiconductors, robotics")
                && prompt.contains("[m1] Subject: Chip export rules tighten |")
                && prompt.contains("[m3] Subject: Weekly robotics roundup |")
                && !prompt.contains("Unsubscribe")
        })
        .times(1)
        .returning(|_, _| {
            Ok(r#"{"decisions": [
                {"id": "m3", "include": true, "reason": "Robotics is a listed topic"},
                {"id": "m2", "include": false, "reason": "Promotion"},
                {"id": "m1", "include": true, "reason": "Directly relevant to current work"}
            ]}"#
            .to_string())
        });

    let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
    let kept = filter.filter(batch(), &profile()).await;

    assert_eq!(ids(&kept), vec!["m1", "m3"]);
}

#[tokio::test]
async fn test_filter_fails_open_when_oracle_errors() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_complete()
        .times(1)
        .returning(|_, _| Err(OracleError::Auth(reqwest::StatusCode::UNAUTHORIZED)));

    let filter =
        RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin()).with_retry(fast_retry());
    let emails = batch();
    let kept = filter.filter(emails.clone(), &profile()).await;

    assert_eq!(kept, emails);
}

#[tokio::test]
async fn test_filter_fails_open_after_retries_are_exhausted() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_complete()
        .times(3)
        .returning(|_, _| Err(OracleError::RateLimited { retry_after: None }));

    let filter =
        RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin()).with_retry(fast_retry());
    let emails = batch();
    let kept = filter.filter(emails.clone(), &profile()).await;

    assert_eq!(kept, emails);
}

#[tokio::test]
async fn test_filter_retries_transient_failure() {
    let mut seq = Sequence::new();
    let mut oracle = MockOracle::new();
    oracle
        .expect_complete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(OracleError::Timeout));
    oracle
        .expect_complete()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(r#"{"decisions": [{"id": "m2", "include": true}]}"#.to_string()));

    let filter =
        RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin()).with_retry(fast_retry());
    let kept = filter.filter(batch(), &profile()).await;

    assert_eq!(ids(&kept), vec!["m2"]);
}

#[tokio::test]
async fn test_filter_fails_open_on_unusable_response() {
    for response in [
        "Sorry, I can't do that.",
        r#"{"verdict": "all good"}"#,
        r#"{"decisions": []}"#,
        r#"{"decisions": [{"id": "m1"}, {"include": true}]}"#,
        r#"{"decisions": [{"id": "unknown", "include": true}]}"#,
    ] {
        let mut oracle = MockOracle::new();
        oracle
            .expect_complete()
            .times(1)
            .returning(move |_, _| Ok(response.to_string()));

        let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
        let emails = batch();
        let kept = filter.filter(emails.clone(), &profile()).await;

        assert_eq!(kept, emails, "response {response:?} should fail open");
    }
}

#[tokio::test]
async fn test_missing_ids_are_excluded() {
    let mut oracle = MockOracle::new();
    oracle.expect_complete().times(1).returning(|_, _| {
        Ok(r#"```json
{"decisions": [{"id": "m1", "include": true, "reason": "Relevant"}]}
```"#
            .to_string())
    });

    let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
    let kept = filter.filter(batch(), &profile()).await;

    assert_eq!(ids(&kept), vec!["m1"]);
}

#[tokio::test]
async fn test_duplicate_decisions_last_wins() {
    let mut oracle = MockOracle::new();
    oracle.expect_complete().times(1).returning(|_, _| {
        Ok(r#"{"decisions": [
            {"id": "m1", "include": false},
            {"id": "m2", "include": true},
            {"id": "m1", "include": "true"},
            {"id": "m2", "include": false}
        ]}"#
        .to_string())
    });

    let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
    let kept = filter.filter(batch(), &profile()).await;

    assert_eq!(ids(&kept), vec!["m1"]);
}

#[tokio::test]
async fn test_empty_batch_never_calls_oracle() {
    let mut oracle = MockOracle::new();
    oracle.expect_complete().never();

    let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
    let kept = filter.filter(Vec::new(), &profile()).await;

    assert!(kept.is_empty());
}

#[tokio::test]
async fn test_empty_body_is_represented_by_preview() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_complete()
        .withf(|prompt, _| prompt.contains("[e1] Subject: Hello there | Hello there preview"))
        .times(1)
        .returning(|_, _| Ok(r#"{"decisions": [{"id": "e1", "include": true}]}"#.to_string()));

    let filter = RelevanceFilter::new(Arc::new(oracle), PatternTables::builtin());
    let emails = vec![email("e1", "Hello there", "")];
    let kept = filter.filter(emails, &UserProfile::default()).await;

    assert_eq!(ids(&kept), vec!["e1"]);
}
