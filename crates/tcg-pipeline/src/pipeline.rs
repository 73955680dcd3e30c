//! Generation pipeline
//!
//! invoke → extract → normalize → filter, strictly in that order. Every generation runs
//! inside an `info` span carrying a fresh ULID so log lines from all stages correlate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tcg_core::{
    ExtractionSource, NormalizedRecord, PipelineConfig, PipelineError, PipelineResult, RecordKind,
};
use tcg_dedup::{DuplicateFilter, FilterReport, Rejection};
use tcg_extract::{Extractor, Normalizer};
use tcg_invoker::{RetryInvoker, TextGenerator};
use tracing::{info, info_span, warn, Instrument};
use ulid::Ulid;

/// One generation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Record family to produce
    pub kind: RecordKind,
    /// Fully composed prompt
    pub prompt: String,
}

impl GenerationRequest {
    /// Create request
    #[must_use]
    pub fn new(kind: RecordKind, prompt: impl Into<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
        }
    }
}

/// Result of one generation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    /// Correlation id, also recorded on the tracing span
    pub generation_id: Ulid,
    /// When processing finished
    pub generated_at: DateTime<Utc>,
    /// Record family
    pub kind: RecordKind,
    /// Extraction strategy that produced the candidates
    pub source: ExtractionSource,
    /// Surviving records, in model order
    pub records: Vec<NormalizedRecord>,
    /// Records dropped as duplicates
    pub rejected: Vec<Rejection>,
    /// Advisory filter diagnostics
    pub report: FilterReport,
}

impl GenerationOutcome {
    /// Whether `records` are placeholders rather than model output
    #[inline]
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.source.is_synthetic()
    }
}

/// Run extraction, normalization and filtering over an already obtained response
#[must_use]
pub fn process_response(
    raw: &str,
    kind: RecordKind,
    existing: &[NormalizedRecord],
    config: &PipelineConfig,
) -> GenerationOutcome {
    let generation_id = Ulid::new();
    let span = info_span!("generation", %generation_id, %kind);
    let _entered = span.enter();
    process(generation_id, raw, kind, existing, config)
}

fn process(
    generation_id: Ulid,
    raw: &str,
    kind: RecordKind,
    existing: &[NormalizedRecord],
    config: &PipelineConfig,
) -> GenerationOutcome {
    let extraction = Extractor::new(kind).extract(raw);
    if extraction.is_synthetic() {
        warn!("Model output unusable, returning placeholder records");
    }

    let normalized = Normalizer::new(kind)
        .with_defaults(config.defaults.clone())
        .normalize(&extraction.records);
    let outcome = DuplicateFilter::new(config).filter(normalized, existing);

    info!(
        source = extraction.source.as_str(),
        kept = outcome.kept.len(),
        rejected = outcome.rejected.len(),
        "Generation processed"
    );

    GenerationOutcome {
        generation_id,
        generated_at: Utc::now(),
        kind,
        source: extraction.source,
        records: outcome.kept,
        rejected: outcome.rejected,
        report: outcome.report,
    }
}

/// Pipeline bound to one text generator
#[derive(Debug)]
pub struct GenerationPipeline<G> {
    invoker: RetryInvoker<G>,
    config: PipelineConfig,
}

impl<G: TextGenerator> GenerationPipeline<G> {
    /// Create pipeline
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when `config` fails validation.
    pub fn new(generator: G, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            invoker: RetryInvoker::new(generator, config.retry.clone()),
            config,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Underlying invoker
    #[inline]
    #[must_use]
    pub fn invoker(&self) -> &RetryInvoker<G> {
        &self.invoker
    }

    /// Generate records for `request`, de-duplicated against `existing`
    ///
    /// # Errors
    ///
    /// Only invocation failures; see [`RetryInvoker::invoke`]. Unusable model output
    /// yields a synthetic outcome instead of an error.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        existing: &[NormalizedRecord],
    ) -> PipelineResult<GenerationOutcome> {
        let generation_id = Ulid::new();
        let span = info_span!("generation", %generation_id, kind = %request.kind);

        async {
            let raw = self.invoker.invoke(&request.prompt).await?;
            Ok::<_, PipelineError>(process(
                generation_id,
                &raw,
                request.kind,
                existing,
                &self.config,
            ))
        }
        .instrument(span)
        .await
    }

    /// Same as [`generate`](Self::generate) minus the service call
    #[must_use]
    pub fn process_raw(
        &self,
        raw: &str,
        kind: RecordKind,
        existing: &[NormalizedRecord],
    ) -> GenerationOutcome {
        process_response(raw, kind, existing, &self.config)
    }
}
