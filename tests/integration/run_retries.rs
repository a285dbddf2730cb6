//! Whole-run retries, terminal failures and the shared deadline.

use super::support::{harness, scripted_answer, test_config, EchoFetcher, ScriptedText};
use pagesmith::error::{ApiError, ServiceError};
use pagesmith::usage::UsageLedger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn initial_rows(path: &std::path::Path) -> usize {
    UsageLedger::read_rows(path)
        .unwrap()
        .iter()
        .filter(|r| r.stage == "Initial")
        .count()
}

#[tokio::test]
async fn test_run_fails_after_three_attempts() {
    let config = test_config();
    let text = ScriptedText::new(|_| Err(ServiceError::Unauthorized("bad key".to_string())));
    let h = harness(&config, text, EchoFetcher::default());

    let err = h.generator.generate("Acme", "coffee").await.unwrap_err();

    match err {
        ApiError::RunFailed {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("bad key"));
        }
        other => panic!("expected RunFailed, got {other:?}"),
    }
    // rejected calls are not retried, so one research call per attempt
    assert_eq!(h.text.calls(), 3);
    assert_eq!(initial_rows(&h.generator.workspace().usage_log_path()), 3);
    assert!(!h.generator.workspace().artifact_path().exists());
}

#[tokio::test]
async fn test_unparseable_body_is_retried_as_a_new_attempt() {
    let config = test_config();
    let bodies = Arc::new(AtomicUsize::new(0));
    let seen = bodies.clone();
    let text = ScriptedText::new(move |prompt| {
        if prompt.contains("website content") && seen.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok("Sorry, I cannot produce JSON today.".to_string());
        }
        Ok(scripted_answer(prompt))
    });
    let h = harness(&config, text, EchoFetcher::default());

    let report = h.generator.generate("Acme", "coffee").await.unwrap();

    assert_eq!(report.attempts, 2);
    assert_eq!(bodies.load(Ordering::SeqCst), 2);
    assert_eq!(initial_rows(&h.generator.workspace().usage_log_path()), 2);
    assert!(report.artifact.exists());
}

#[tokio::test]
async fn test_transient_errors_are_absorbed_by_call_retries() {
    let config = test_config();
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = failures.clone();
    let text = ScriptedText::new(move |prompt| {
        if prompt.contains("industry") && counter.fetch_add(1, Ordering::SeqCst) < 2 {
            return Err(ServiceError::RateLimited("slow down".to_string()));
        }
        Ok(scripted_answer(prompt))
    });
    let h = harness(&config, text, EchoFetcher::default());

    let report = h.generator.generate("Acme", "coffee").await.unwrap();

    assert_eq!(report.attempts, 1);
    assert_eq!(report.request.industry, "Food and Beverage");
}

#[tokio::test(start_paused = true)]
async fn test_deadline_fails_the_attempt() {
    let mut config = test_config();
    config.pipeline.deadline_secs = 60;
    config.pipeline.max_run_retries = 0;
    let text = ScriptedText::happy().stalling_on("website content", Duration::from_secs(600));
    let h = harness(&config, text, EchoFetcher::default());

    let err = h.generator.generate("Acme", "coffee").await.unwrap_err();

    match err {
        ApiError::RunFailed {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 1);
            assert!(last_error.contains("deadline"), "{last_error}");
            assert!(last_error.contains("content"), "{last_error}");
        }
        other => panic!("expected RunFailed, got {other:?}"),
    }
    assert!(!h.generator.workspace().artifact_path().exists());
}
