// Dispatcher tests - fallback routing against a scripted backend
//
// The backend is deterministic and records every request it receives, so
// call counts, ordering, and per-target request contents are observable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pharos_relay::application::AttemptError;
use pharos_relay::model::{ModelBackend, ModelError, ModelRequest, ModelResponse};
use pharos_relay::types::ChatMessage;
use pharos_relay::{DispatchError, Dispatcher, ProviderTarget, RoutingStrategy};
use serde_json::json;

enum Behavior {
    Reply(&'static str),
    Unavailable,
    Malformed,
}

#[derive(Clone, Default)]
struct CallLog(Arc<Mutex<Vec<ModelRequest>>>);

impl CallLog {
    fn len(&self) -> usize {
        self.0.lock().expect("lock").len()
    }

    fn calls(&self) -> Vec<ModelRequest> {
        self.0.lock().expect("lock").clone()
    }
}

struct ScriptedBackend {
    behaviors: HashMap<String, Behavior>,
    calls: CallLog,
}

impl ScriptedBackend {
    fn new(entries: Vec<(&str, Behavior)>, calls: CallLog) -> Self {
        Self {
            behaviors: entries
                .into_iter()
                .map(|(id, behavior)| (id.to_string(), behavior))
                .collect(),
            calls,
        }
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn send(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        self.calls.0.lock().expect("lock").push(request.clone());
        match self.behaviors.get(&request.provider) {
            Some(Behavior::Reply(text)) => Ok(ModelResponse::new(text.to_string())),
            Some(Behavior::Unavailable) => Err(ModelError::missing_api_key(&request.provider)),
            Some(Behavior::Malformed) => {
                Err(ModelError::invalid_response(&request.provider, "missing content"))
            }
            None => Err(ModelError::provider_not_found(&request.provider)),
        }
    }
}

fn dispatcher_with(
    entries: Vec<(&str, Behavior)>,
) -> (Dispatcher<ScriptedBackend>, CallLog) {
    let calls = CallLog::default();
    let dispatcher = Dispatcher::new(ScriptedBackend::new(entries, calls.clone()));
    (dispatcher, calls)
}

fn prompt() -> Vec<ChatMessage> {
    vec![ChatMessage::user("How many legs does a spider have?")]
}

#[tokio::test]
async fn first_target_success_makes_exactly_one_call() {
    let (dispatcher, calls) = dispatcher_with(vec![
        ("mistral", Behavior::Reply("A spider has eight legs.")),
        ("gw-openai", Behavior::Reply("unreached")),
    ]);
    let targets = vec![
        ProviderTarget::new("mistral", "mistral-tiny"),
        ProviderTarget::new("gw-openai", "gpt-4o"),
    ];

    let outcome = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect("dispatch");

    assert_eq!(outcome.provider, "mistral");
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.response.text(), "A spider has eight legs.");
    assert_eq!(calls.len(), 1);
}

#[tokio::test]
async fn fallback_advances_past_failed_targets() {
    let (dispatcher, calls) = dispatcher_with(vec![
        ("gw-openai", Behavior::Unavailable),
        ("gw-mistral", Behavior::Reply("A spider has eight legs.")),
    ]);
    let targets = vec![
        ProviderTarget::new("gw-openai", "gpt-4o"),
        ProviderTarget::new("gw-mistral", "mistral-tiny"),
    ];

    let outcome = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect("dispatch");

    assert_eq!(outcome.provider, "gw-mistral");
    assert_eq!(outcome.model, "mistral-tiny");
    assert_eq!(outcome.attempts, 2);
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn exhausted_dispatch_collects_errors_in_target_order() {
    let (dispatcher, calls) = dispatcher_with(vec![
        ("gw-openai", Behavior::Unavailable),
        ("mistral", Behavior::Malformed),
    ]);
    let targets = vec![
        ProviderTarget::new("gw-openai", "gpt-4o"),
        ProviderTarget::new("mistral", "mistral-tiny"),
    ];

    let error = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect_err("dispatch should fail");

    let DispatchError::AllTargetsExhausted { errors } = error else {
        panic!("expected AllTargetsExhausted, got {error:?}");
    };
    assert_eq!(errors.len(), targets.len());
    assert!(matches!(
        &errors[0],
        AttemptError::TargetUnavailable { provider, .. } if provider == "gw-openai"
    ));
    assert!(matches!(
        &errors[1],
        AttemptError::MalformedResponse { provider, .. } if provider == "mistral"
    ));
    assert_eq!(calls.len(), 2);
}

#[tokio::test]
async fn unknown_backend_counts_as_unavailable() {
    let (dispatcher, _calls) = dispatcher_with(vec![]);
    let targets = vec![ProviderTarget::new("ghost", "some-model")];

    let error = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect_err("dispatch should fail");

    let DispatchError::AllTargetsExhausted { errors } = error else {
        panic!("expected AllTargetsExhausted, got {error:?}");
    };
    assert!(matches!(&errors[0], AttemptError::TargetUnavailable { .. }));
}

#[tokio::test]
async fn overrides_apply_only_to_their_own_target() {
    let (dispatcher, calls) = dispatcher_with(vec![
        ("gw-openai", Behavior::Unavailable),
        ("gw-mistral", Behavior::Unavailable),
    ]);
    let targets = vec![
        ProviderTarget::new("gw-openai", "gpt-4.1")
            .with_param("model", "gpt-4o")
            .with_param("temperature", json!(0.2)),
        ProviderTarget::new("gw-mistral", "mistral-tiny"),
    ];

    let _ = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await;

    let requests = calls.calls();
    assert_eq!(requests.len(), 2);

    assert_eq!(requests[0].model, "gpt-4o");
    assert_eq!(requests[0].params.get("temperature"), Some(&json!(0.2)));
    assert!(!requests[0].params.contains_key("model"));

    assert_eq!(requests[1].model, "mistral-tiny");
    assert!(requests[1].params.is_empty());
}

#[tokio::test]
async fn attempts_of_one_dispatch_share_a_trace_id() {
    let (dispatcher, calls) = dispatcher_with(vec![
        ("gw-openai", Behavior::Unavailable),
        ("gw-mistral", Behavior::Reply("ok")),
    ]);
    let targets = vec![
        ProviderTarget::new("gw-openai", "gpt-4o"),
        ProviderTarget::new("gw-mistral", "mistral-tiny"),
    ];

    dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect("dispatch");

    let requests = calls.calls();
    assert_eq!(requests[0].trace_id, requests[1].trace_id);
}

#[tokio::test]
async fn dispatch_is_idempotent_for_deterministic_backends() {
    let (dispatcher, _calls) = dispatcher_with(vec![
        ("gw-openai", Behavior::Unavailable),
        ("gw-mistral", Behavior::Reply("A spider has eight legs.")),
    ]);
    let targets = vec![
        ProviderTarget::new("gw-openai", "gpt-4o"),
        ProviderTarget::new("gw-mistral", "mistral-tiny"),
    ];

    let first = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect("first dispatch");
    let second = dispatcher
        .dispatch(&prompt(), &targets, RoutingStrategy::Fallback)
        .await
        .expect("second dispatch");

    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_payload_is_rejected_before_any_call() {
    let (dispatcher, calls) =
        dispatcher_with(vec![("mistral", Behavior::Reply("unreached"))]);
    let targets = vec![ProviderTarget::new("mistral", "mistral-tiny")];

    let result = dispatcher
        .dispatch(&[], &targets, RoutingStrategy::Fallback)
        .await;

    assert!(matches!(result, Err(DispatchError::EmptyPayload)));
    assert_eq!(calls.len(), 0);
}

#[tokio::test]
async fn empty_target_list_is_rejected_before_any_call() {
    let (dispatcher, calls) =
        dispatcher_with(vec![("mistral", Behavior::Reply("unreached"))]);

    let result = dispatcher
        .dispatch(&prompt(), &[], RoutingStrategy::Fallback)
        .await;

    assert!(matches!(result, Err(DispatchError::EmptyTargetList)));
    assert_eq!(calls.len(), 0);
}
