//! End-to-end pipeline runs against scripted generators

use pretty_assertions::assert_eq;
use std::sync::Arc;
use tcg_core::{
    ExtractionSource, GenerationError, PipelineConfig, PipelineError, RecordKind, RetryPolicy,
};
use tcg_pipeline::{GenerationPipeline, GenerationRequest, PromptBuilder};
use tcg_test_utils::{
    distinct_summary, existing_record, fenced_test_cases, overloaded, rate_limited,
    ScriptedGenerator,
};

fn config() -> PipelineConfig {
    PipelineConfig::default().with_retry(RetryPolicy::new(3, 1000).with_max_jitter_ms(0))
}

fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(RecordKind::TestCase, prompt)
}

#[tokio::test(start_paused = true)]
async fn fenced_response_flows_through_every_stage() {
    let generator = Arc::new(ScriptedGenerator::replying(fenced_test_cases(4)));
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();

    let outcome = pipeline.generate(&request("make tests"), &[]).await.unwrap();

    assert_eq!(outcome.source, ExtractionSource::Strict);
    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["TC_1", "TC_2", "TC_3", "TC_4"]);
    assert!(outcome.rejected.is_empty());
    assert_eq!(outcome.records[0].steps, "Choose invoice\nInspect invoice record1");
    assert_eq!(generator.calls(), 1);
    assert_eq!(generator.prompts(), vec!["make tests".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_before_processing() {
    let generator = Arc::new(ScriptedGenerator::overloaded_then(2, fenced_test_cases(3)));
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();

    let outcome = pipeline.generate(&request("p"), &[]).await.unwrap();
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(generator.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_are_tagged_retry_later() {
    let generator = Arc::new(ScriptedGenerator::failing(rate_limited(), 5));
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();

    let err = pipeline.generate(&request("p"), &[]).await.unwrap_err();
    assert!(err.is_retry_later());
    assert_eq!(generator.calls(), 3);
    match err {
        PipelineError::Invoke(invoke) => assert_eq!(invoke.attempts(), 3),
        PipelineError::Config(other) => panic!("unexpected config error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn permanent_failure_is_not_retried() {
    let generator = Arc::new(ScriptedGenerator::failing(
        GenerationError::status(403, "permission denied"),
        5,
    ));
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();

    let err = pipeline.generate(&request("p"), &[]).await.unwrap_err();
    assert!(!err.is_retry_later());
    assert_eq!(generator.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn refusal_returns_placeholders_not_error() {
    let generator = ScriptedGenerator::replying("I cannot generate test cases for this request.");
    let pipeline = GenerationPipeline::new(generator, config()).unwrap();

    let outcome = pipeline.generate(&request("p"), &[]).await.unwrap();
    assert!(outcome.is_synthetic());
    assert_eq!(outcome.source, ExtractionSource::Fallback);
    assert!(!outcome.records.is_empty());
}

#[tokio::test(start_paused = true)]
async fn existing_records_filter_new_output() {
    let existing = vec![existing_record("TC_90", &distinct_summary(2))];
    let generator = ScriptedGenerator::new([Ok(fenced_test_cases(3)), Err(overloaded())]);
    let pipeline = GenerationPipeline::new(generator, config()).unwrap();

    let outcome = pipeline.generate(&request("p"), &existing).await.unwrap();
    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["TC_1", "TC_3"]);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].record_id, "TC_2");
    assert_eq!(outcome.report.discarded, 1);
}

#[tokio::test(start_paused = true)]
async fn composed_prompt_reaches_generator() {
    let existing = vec![existing_record("TC_1", "Reset password by email")];
    let prompt = PromptBuilder::new(RecordKind::TestCase)
        .module("Accounts")
        .summary("Password recovery")
        .existing(&existing)
        .build();

    let generator = Arc::new(ScriptedGenerator::replying(fenced_test_cases(1)));
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();
    pipeline.generate(&request(&prompt), &existing).await.unwrap();

    let sent = generator.prompts();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("- Reset password by email"));
}

#[test]
fn process_raw_skips_the_generator() {
    let generator = Arc::new(ScriptedGenerator::default());
    let pipeline = GenerationPipeline::new(Arc::clone(&generator), config()).unwrap();

    let raw = r#"[{"id": "TC_1", "summary": "Create order", "steps": "Open cart, pay",},]"#;
    let outcome = pipeline.process_raw(raw, RecordKind::TestCase, &[]);

    assert_eq!(outcome.source, ExtractionSource::Repaired);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(generator.calls(), 0);
}
