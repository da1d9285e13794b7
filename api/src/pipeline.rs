use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tutordesk_core::dataset::FallbackDataset;
use tutordesk_core::envelope::{Outcome, ResultEnvelope};
use tutordesk_core::fallback::FallbackSynthesizer;
use tutordesk_core::operations::{OperationKind, OperationOutput, ValidatedInput};
use tutordesk_core::validation::Validator;

use crate::provider::{AiProvider, ProviderInvoker};

/// Count of responses served from fallback data, per operation.
#[derive(Debug, Default)]
pub struct FallbackStats {
    counts: [AtomicU64; OperationKind::ALL.len()],
}

impl FallbackStats {
    fn slot(kind: OperationKind) -> usize {
        OperationKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default()
    }

    fn record(&self, kind: OperationKind) {
        self.counts[Self::slot(kind)].fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: OperationKind) -> u64 {
        self.counts[Self::slot(kind)].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        OperationKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str().to_string(), self.get(kind)))
            .collect()
    }
}

/// validate → invoke provider → synthesize fallback on failure → envelope.
///
/// One generic path serves all five operations; each run owns its input and
/// result, so concurrent runs share nothing mutable beyond the counters.
pub struct Pipeline {
    validator: Validator,
    invoker: ProviderInvoker,
    dataset: Arc<FallbackDataset>,
    stats: FallbackStats,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn AiProvider>, dataset: Arc<FallbackDataset>) -> Self {
        Pipeline {
            validator: Validator::standard(),
            invoker: ProviderInvoker::new(provider),
            dataset,
            stats: FallbackStats::default(),
        }
    }

    pub fn stats(&self) -> &FallbackStats {
        &self.stats
    }

    pub fn provider_configured(&self) -> bool {
        self.invoker.is_configured()
    }

    pub async fn run(
        &self,
        kind: OperationKind,
        raw: &serde_json::Value,
    ) -> ResultEnvelope<OperationOutput> {
        match self.validator.validate(kind, raw) {
            Ok(input) => self.execute(input).await.into(),
            Err(failure) => {
                tracing::debug!(operation = %kind, errors = ?failure.errors, "Input rejected");
                ResultEnvelope::validation_failed(failure)
            }
        }
    }

    /// Provider first; on any provider error the fallback answers instead.
    pub async fn execute(&self, input: ValidatedInput) -> Outcome<OperationOutput> {
        match self.invoker.invoke(&input, &self.dataset).await {
            Ok(output) => Outcome::ProviderSucceeded(output),
            Err(err) => {
                let kind = input.kind();
                self.stats.record(kind);
                tracing::warn!(
                    operation = %kind,
                    provider = self.invoker.provider_name(),
                    error = %err,
                    "AI provider failed, serving fallback data"
                );
                Outcome::FallbackUsed(FallbackSynthesizer::new(&self.dataset).synthesize(&input))
            }
        }
    }
}
