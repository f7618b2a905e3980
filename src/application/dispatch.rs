//! Request dispatcher with fallback routing
//!
//! Routes one logical chat request to one of several configured backend
//! providers, applying a [`RoutingStrategy`], and produces a single outcome:
//! the first successful response, or an aggregated failure carrying every
//! per-target error in the order encountered.

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::routing::{ProviderTarget, RoutingStrategy};
use crate::domain::types::ChatMessage;
use crate::infrastructure::model::traits::ModelBackend;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

pub type DispatchResult = Result<DispatchOutcome, DispatchError>;

/// Successful dispatch: the winning target's label and its response
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub provider: String,
    pub model: String,
    /// Number of targets attempted, the winner included
    pub attempts: usize,
    pub response: ModelResponse,
}

/// Classified failure from a single target attempt
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Transport, auth, or provider-side error
    #[error("target '{provider}' is unavailable")]
    TargetUnavailable {
        provider: String,
        #[source]
        source: ModelError,
    },

    /// The backend responded, but the reply structure could not be parsed
    #[error("target '{provider}' returned a malformed response")]
    MalformedResponse {
        provider: String,
        #[source]
        source: ModelError,
    },
}

impl AttemptError {
    fn classify(provider: &str, source: ModelError) -> Self {
        match source {
            ModelError::InvalidResponse { .. } => AttemptError::MalformedResponse {
                provider: provider.to_string(),
                source,
            },
            _ => AttemptError::TargetUnavailable {
                provider: provider.to_string(),
                source,
            },
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            AttemptError::TargetUnavailable { provider, .. } => provider,
            AttemptError::MalformedResponse { provider, .. } => provider,
        }
    }
}

/// Failure case of a dispatch call. Attempt errors never escape individually;
/// only this aggregate crosses the dispatch boundary.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch requires a non-empty message list")]
    EmptyPayload,

    #[error("dispatch requires at least one target")]
    EmptyTargetList,

    #[error("all targets failed after {} attempts", .errors.len())]
    AllTargetsExhausted { errors: Vec<AttemptError> },
}

/// Routes one logical request across an ordered target chain.
///
/// Stateless aside from the network side effect; independent `dispatch`
/// calls need no synchronization.
pub struct Dispatcher<B: ModelBackend> {
    backend: B,
}

impl<B: ModelBackend> Dispatcher<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Send `payload` to the targets according to `strategy`.
    ///
    /// For `Fallback`: targets are tried strictly in list order, one network
    /// call per target, stopping at the first success. A failed attempt is
    /// recorded and the next target is tried; there are no retries within a
    /// target. At most `targets.len()` calls are made.
    pub async fn dispatch(
        &self,
        payload: &[ChatMessage],
        targets: &[ProviderTarget],
        strategy: RoutingStrategy,
    ) -> DispatchResult {
        if payload.is_empty() {
            return Err(DispatchError::EmptyPayload);
        }
        if targets.is_empty() {
            return Err(DispatchError::EmptyTargetList);
        }

        match strategy {
            RoutingStrategy::Fallback => self.dispatch_fallback(payload, targets).await,
        }
    }

    async fn dispatch_fallback(
        &self,
        payload: &[ChatMessage],
        targets: &[ProviderTarget],
    ) -> DispatchResult {
        let trace_id = Uuid::new_v4();
        let mut errors = Vec::with_capacity(targets.len());

        for (index, target) in targets.iter().enumerate() {
            if target
                .override_params()
                .get("model")
                .is_some_and(|value| !value.is_string())
            {
                warn!(
                    provider = target.provider(),
                    "Ignoring non-string model override"
                );
            }

            let model = target.effective_model().to_string();
            let request = ModelRequest::new(target.provider(), &model, payload.to_vec())
                .with_params(target.attempt_params())
                .with_trace_id(trace_id);

            info!(
                trace_id = %trace_id,
                provider = target.provider(),
                model = model.as_str(),
                attempt = index + 1,
                targets = targets.len(),
                "Attempting target"
            );

            match self.backend.send(request).await {
                Ok(response) => {
                    info!(
                        trace_id = %trace_id,
                        provider = target.provider(),
                        attempts = index + 1,
                        "Target succeeded"
                    );
                    return Ok(DispatchOutcome {
                        provider: target.provider().to_string(),
                        model,
                        attempts: index + 1,
                        response,
                    });
                }
                Err(err) => {
                    warn!(
                        trace_id = %trace_id,
                        provider = target.provider(),
                        error = %err,
                        "Target failed, advancing to next"
                    );
                    errors.push(AttemptError::classify(target.provider(), err));
                }
            }
        }

        warn!(trace_id = %trace_id, targets = targets.len(), "All targets exhausted");
        Err(DispatchError::AllTargetsExhausted { errors })
    }
}
