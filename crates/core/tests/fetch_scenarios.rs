//! Fetch runtime scenarios against a scripted transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use graphgen_core::error::{FetchError, NormalizeResult, TransportError, TransportResult};
use graphgen_core::ports::{
    GraphqlError, GraphqlRequest, QueryArgs, QueryBuilder, ResponseEnvelope, Transport,
};
use graphgen_core::value::{FromRecord, Record};
use graphgen_core::{
    BigInt, FetchConfig, FieldSpec, GraphClient, MultiQueryOptions, OrderDirection,
    PresencePolicy, Selection, SingleQueryOptions,
};
use serde_json::{Map, Value, json};

// =============================================================================
// Test doubles
// =============================================================================

#[derive(Debug)]
struct Token {
    id: Option<String>,
    balance: Option<BigInt>,
}

static TOKEN_FIELDS: &[FieldSpec] = &[FieldSpec::plain("id"), FieldSpec::big_int("balance")];

impl FromRecord for Token {
    fn field_specs() -> &'static [FieldSpec] {
        TOKEN_FIELDS
    }

    fn from_record(mut record: Record) -> NormalizeResult<Self> {
        Ok(Self {
            id: record.decode("id")?,
            balance: record.decode("balance")?,
        })
    }
}

/// Records the arguments of every built query.
#[derive(Default)]
struct RecordingBuilder {
    calls: Mutex<Vec<(String, QueryArgs)>>,
}

impl RecordingBuilder {
    fn calls(&self) -> Vec<(String, QueryArgs)> {
        self.calls.lock().unwrap().clone()
    }
}

impl QueryBuilder for RecordingBuilder {
    fn build(&self, accessor: &str, args: &QueryArgs, _selection: &Selection) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((accessor.to_string(), args.clone()));
        format!("{{ {accessor} }}")
    }
}

/// Replays scripted responses in order.
struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResult<ResponseEnvelope>>>,
    posts: Mutex<usize>,
}

impl ScriptedTransport {
    fn new(responses: Vec<TransportResult<ResponseEnvelope>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            posts: Mutex::new(0),
        }
    }

    /// Pages of token rows with consecutive ids.
    fn pages(accessor: &str, sizes: &[usize]) -> Self {
        let mut next_id = 0usize;
        let responses = sizes
            .iter()
            .map(|&size| {
                let rows: Vec<Value> = (0..size)
                    .map(|_| {
                        next_id += 1;
                        json!({ "id": format!("0x{next_id:06}"), "balance": next_id.to_string() })
                    })
                    .collect();
                Ok(data(accessor, Value::Array(rows)))
            })
            .collect();
        Self::new(responses)
    }

    fn posts(&self) -> usize {
        *self.posts.lock().unwrap()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, _url: &str, _request: &GraphqlRequest) -> TransportResult<ResponseEnvelope> {
        *self.posts.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Http("no scripted response left".into())))
    }
}

fn data(accessor: &str, payload: Value) -> ResponseEnvelope {
    let mut map = Map::new();
    map.insert(accessor.to_string(), payload);
    ResponseEnvelope {
        data: Some(map),
        errors: None,
    }
}

fn client(
    transport: Arc<ScriptedTransport>,
    builder: Arc<RecordingBuilder>,
) -> GraphClient {
    GraphClient::new(transport, builder)
}

fn selection() -> Selection {
    let mut selection = Selection::new();
    selection.push_leaf("id");
    selection.push_leaf("balance");
    selection
}

const URL: &str = "http://localhost:8000/subgraphs/name/test";

// =============================================================================
// Paginated fetch
// =============================================================================

// Test critique: 1000 + 1000 + 500 → 3 appels, 2500 résultats
#[tokio::test]
async fn test_short_last_page_ends_pagination() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000, 500]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let options: MultiQueryOptions<Map<String, Value>> = MultiQueryOptions::new()
        .first(2500)
        .order_by("id".to_string())
        .order_direction(OrderDirection::Asc);

    let tokens: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();

    assert_eq!(transport.posts(), 3);
    assert_eq!(tokens.len(), 2500);
    assert_eq!(tokens[0].id.as_deref(), Some("0x000001"));
    assert_eq!(tokens[2499].balance, Some(BigInt::from(2500)));
}

// Test critique: 3 pages pleines → tronqué à 2500
#[tokio::test]
async fn test_overshoot_is_truncated() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000, 1000]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let options: MultiQueryOptions<Map<String, Value>> = MultiQueryOptions::new().first(2500);
    let tokens: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();

    assert_eq!(transport.posts(), 3);
    assert_eq!(tokens.len(), 2500);
    // Ordre serveur conservé
    assert_eq!(tokens[2499].id.as_deref(), Some("0x002500"));
}

#[tokio::test]
async fn test_first_at_cap_issues_one_call() {
    for first in [1, 999, 1000] {
        let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000]));
        let builder = Arc::new(RecordingBuilder::default());
        let client = client(transport.clone(), builder.clone());

        let options: MultiQueryOptions<Map<String, Value>> = MultiQueryOptions::new().first(first);
        let tokens: Vec<Token> = client
            .fetch_many(URL, "tokens", &options, &selection())
            .await
            .unwrap();

        assert_eq!(transport.posts(), 1, "first = {first}");
        assert_eq!(tokens.len(), first as usize);

        let calls = builder.calls();
        assert_eq!(calls[0].1.first, Some(first));
        assert_eq!(calls[0].1.order_by, None);
        assert_eq!(calls[0].1.order_direction, None);
    }
}

#[tokio::test]
async fn test_no_first_issues_one_call() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let options: MultiQueryOptions<Map<String, Value>> = MultiQueryOptions::new();
    let tokens: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();

    assert_eq!(transport.posts(), 1);
    assert_eq!(tokens.len(), 1000);
}

// Test critique: le curseur est la valeur brute du dernier enregistrement
#[tokio::test]
async fn test_cursor_injection_uses_last_raw_value() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000, 10]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let mut filter = Map::new();
    filter.insert("balance_gt".into(), json!("0"));
    let options = MultiQueryOptions::<Map<String, Value>>::new()
        .first(5000)
        .filter(filter);

    let tokens: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();
    assert_eq!(tokens.len(), 2010);

    let calls = builder.calls();
    assert_eq!(calls.len(), 3);

    let first_page = &calls[0].1;
    assert_eq!(first_page.first, Some(1000));
    assert_eq!(first_page.order_by.as_deref(), Some("id"));
    assert_eq!(first_page.order_direction, Some(OrderDirection::Asc));
    let where_0 = first_page.filter.as_ref().unwrap();
    assert!(!where_0.contains_key("id_gt"));
    assert_eq!(where_0.get("balance_gt"), Some(&json!("0")));

    let where_1 = calls[1].1.filter.as_ref().unwrap();
    assert_eq!(where_1.get("id_gt"), Some(&json!("0x001000")));
    assert_eq!(where_1.get("balance_gt"), Some(&json!("0")));

    let where_2 = calls[2].1.filter.as_ref().unwrap();
    assert_eq!(where_2.get("id_gt"), Some(&json!("0x002000")));
}

#[tokio::test]
async fn test_descending_order_uses_lt_key() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 3]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let options = MultiQueryOptions::<Map<String, Value>>::new()
        .first(1500)
        .order_by("balance".to_string())
        .order_direction(OrderDirection::Desc);

    let _: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();

    let calls = builder.calls();
    assert_eq!(calls.len(), 2);
    let where_1 = calls[1].1.filter.as_ref().unwrap();
    assert_eq!(where_1.get("balance_lt"), Some(&json!("1000")));
    assert!(!where_1.contains_key("balance_gt"));
}

// Test critique: le filtre de l'appelant n'est jamais modifié
#[tokio::test]
async fn test_caller_filter_is_not_mutated() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000, 1]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder.clone());

    let mut filter = Map::new();
    filter.insert("owner".into(), json!("0xabc"));
    let options = MultiQueryOptions::<Map<String, Value>>::new()
        .first(3000)
        .filter(filter.clone());
    let before = options.clone();

    let _: Vec<Token> = client
        .fetch_many(URL, "tokens", &options, &selection())
        .await
        .unwrap();

    assert_eq!(options, before);
    assert_eq!(options.filter, Some(filter));
}

#[tokio::test]
async fn test_error_mid_pagination_returns_no_partial_results() {
    let mut page = ScriptedTransport::pages("tokens", &[1000])
        .responses
        .into_inner()
        .unwrap();
    page.push_back(Ok(ResponseEnvelope {
        data: None,
        errors: Some(vec![
            GraphqlError {
                message: "indexer unavailable".into(),
            },
            GraphqlError {
                message: "second error".into(),
            },
        ]),
    }));
    let transport = Arc::new(ScriptedTransport::new(page.into()));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport.clone(), builder);

    let options = MultiQueryOptions::<Map<String, Value>>::new().first(2000);
    let err = client
        .fetch_many::<Token, _, _>(URL, "tokens", &options, &selection())
        .await
        .unwrap_err();

    assert_eq!(transport.posts(), 2);
    assert!(matches!(&err, FetchError::Query(message) if message == "indexer unavailable"));
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Status {
        status: 503,
        body: "unavailable".into(),
    })]));
    let client = client(transport, Arc::new(RecordingBuilder::default()));

    let options = MultiQueryOptions::<Map<String, Value>>::new();
    let err = client
        .fetch_many::<Token, _, _>(URL, "tokens", &options, &selection())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::Transport(TransportError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_unselected_order_field_cannot_paginate() {
    let rows: Vec<Value> = (0..1000).map(|i| json!({ "balance": i.to_string() })).collect();
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(data(
        "tokens",
        Value::Array(rows),
    ))]));
    let client = client(transport.clone(), Arc::new(RecordingBuilder::default()));

    let options = MultiQueryOptions::<Map<String, Value>>::new().first(1500);
    let err = client
        .fetch_many::<Token, _, _>(URL, "tokens", &options, &selection())
        .await
        .unwrap_err();

    assert_eq!(transport.posts(), 1);
    assert!(matches!(err, FetchError::CursorUnavailable { field } if field == "id"));
}

#[tokio::test]
async fn test_page_ceiling_stops_runaway_pagination() {
    let transport = Arc::new(ScriptedTransport::pages("tokens", &[1000, 1000, 1000]));
    let config = FetchConfig {
        max_pages: Some(2),
        ..FetchConfig::default()
    };
    let client = GraphClient::with_config(
        transport.clone(),
        Arc::new(RecordingBuilder::default()),
        config,
    );

    let options = MultiQueryOptions::<Map<String, Value>>::new().first(10_000);
    let err = client
        .fetch_many::<Token, _, _>(URL, "tokens", &options, &selection())
        .await
        .unwrap_err();

    assert_eq!(transport.posts(), 2);
    assert!(matches!(err, FetchError::PageLimitExceeded { pages: 2 }));
}

// =============================================================================
// Single fetch
// =============================================================================

// Test critique: le message d'erreur est exactement celui du serveur
#[tokio::test]
async fn test_single_fetch_surfaces_first_error_message() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(ResponseEnvelope {
        data: Some(Map::new()),
        errors: Some(vec![GraphqlError {
            message: "not found".into(),
        }]),
    })]));
    let client = client(transport.clone(), Arc::new(RecordingBuilder::default()));

    let err = client
        .fetch_one::<Token>(URL, "token", &SingleQueryOptions::new("0x1"), &selection())
        .await
        .unwrap_err();

    assert_eq!(transport.posts(), 1);
    assert_eq!(err.to_string(), "not found");
}

#[tokio::test]
async fn test_single_fetch_normalizes_record() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(data(
        "token",
        json!({ "id": "0x1", "balance": "123456789012345678901234567890" }),
    ))]));
    let builder = Arc::new(RecordingBuilder::default());
    let client = client(transport, builder.clone());

    let token: Token = client
        .fetch_one(URL, "token", &SingleQueryOptions::new("0x1"), &selection())
        .await
        .unwrap();

    assert_eq!(token.id.as_deref(), Some("0x1"));
    assert_eq!(
        token.balance.unwrap().to_string(),
        "123456789012345678901234567890"
    );

    let calls = builder.calls();
    assert_eq!(calls[0].0, "token");
    assert_eq!(calls[0].1.id.as_deref(), Some("0x1"));
}

#[tokio::test]
async fn test_single_fetch_null_is_not_found() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(data("token", Value::Null))]));
    let client = client(transport, Arc::new(RecordingBuilder::default()));

    let err = client
        .fetch_one::<Token>(URL, "token", &SingleQueryOptions::new("0x9"), &selection())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::NotFound { id, .. } if id == "0x9"));
}

#[tokio::test]
async fn test_truthy_policy_drops_zero_balance() {
    let transport = Arc::new(ScriptedTransport::new(vec![Ok(data(
        "token",
        json!({ "id": "0x1", "balance": 0 }),
    ))]));
    let config = FetchConfig {
        presence: PresencePolicy::Truthy,
        ..FetchConfig::default()
    };
    let client = GraphClient::with_config(transport, Arc::new(RecordingBuilder::default()), config);

    let token: Token = client
        .fetch_one(URL, "token", &SingleQueryOptions::new("0x1"), &selection())
        .await
        .unwrap();
    assert_eq!(token.id.as_deref(), Some("0x1"));
    assert_eq!(token.balance, None);
}
