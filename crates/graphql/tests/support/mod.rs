//! In-process subgraph-style GraphQL server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_graphql::{
    Context, EmptyMutation, EmptySubscription, Enum, ID, InputObject, Object, Result, Schema,
    SimpleObject,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

pub const SERVER_MAX_PAGE: i32 = 1000;

// -----------------------------------------------------------------------------
// Schema
// -----------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize)]
pub struct BigIntValue(pub String);

async_graphql::scalar!(BigIntValue, "BigInt");

#[derive(SimpleObject, Clone)]
pub struct Account {
    pub id: ID,
}

#[derive(SimpleObject, Clone)]
pub struct Token {
    pub id: ID,
    pub balance: BigIntValue,
    pub owner: Account,
}

#[derive(InputObject, Default)]
#[graphql(name = "Account_filter", rename_fields = "snake_case")]
pub struct AccountFilter {
    pub id: Option<ID>,
}

#[derive(InputObject, Default)]
#[graphql(name = "Token_filter", rename_fields = "snake_case")]
pub struct TokenFilter {
    pub id: Option<ID>,
    pub id_gt: Option<ID>,
    pub id_lt: Option<ID>,
    #[graphql(name = "owner_")]
    pub owner: Option<AccountFilter>,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(name = "Token_orderBy", rename_items = "camelCase")]
pub enum TokenOrderBy {
    Id,
    Balance,
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
#[graphql(rename_items = "lowercase")]
pub enum OrderDirection {
    Asc,
    Desc,
}

pub struct Query;

#[Object]
impl Query {
    async fn token(&self, ctx: &Context<'_>, id: ID) -> Option<Token> {
        let store = ctx.data_unchecked::<Arc<Store>>();
        store.count();
        store.tokens.iter().find(|token| token.id == id).cloned()
    }

    async fn tokens(
        &self,
        ctx: &Context<'_>,
        first: Option<i32>,
        #[graphql(name = "where")] filter: Option<TokenFilter>,
        order_by: Option<TokenOrderBy>,
        order_direction: Option<OrderDirection>,
    ) -> Result<Vec<Token>> {
        let store = ctx.data_unchecked::<Arc<Store>>();
        store.count();

        let first = first.unwrap_or(100);
        if first > SERVER_MAX_PAGE {
            return Err(format!("first may not exceed {SERVER_MAX_PAGE}").into());
        }

        let filter = filter.unwrap_or_default();
        let mut rows: Vec<Token> = store
            .tokens
            .iter()
            .filter(|t| filter.id.as_ref().is_none_or(|id| t.id == *id))
            .filter(|t| filter.id_gt.as_ref().is_none_or(|id| t.id.as_str() > id.as_str()))
            .filter(|t| filter.id_lt.as_ref().is_none_or(|id| t.id.as_str() < id.as_str()))
            .filter(|t| {
                filter
                    .owner
                    .as_ref()
                    .and_then(|owner| owner.id.as_ref())
                    .is_none_or(|id| t.owner.id == *id)
            })
            .cloned()
            .collect();

        match order_by.unwrap_or(TokenOrderBy::Id) {
            TokenOrderBy::Id => rows.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str())),
            TokenOrderBy::Balance => rows.sort_by_key(|t| t.balance.0.parse::<u128>().unwrap_or(0)),
        }
        if order_direction == Some(OrderDirection::Desc) {
            rows.reverse();
        }
        rows.truncate(first as usize);

        Ok(rows)
    }

    async fn accounts(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] filter: Option<AccountFilter>,
    ) -> Vec<Account> {
        let store = ctx.data_unchecked::<Arc<Store>>();
        let mut accounts: Vec<Account> = store.tokens.iter().map(|t| t.owner.clone()).collect();
        accounts.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        accounts.dedup_by(|a, b| a.id == b.id);
        if let Some(id) = filter.and_then(|f| f.id) {
            accounts.retain(|a| a.id == id);
        }
        accounts
    }
}

pub type TestSchema = Schema<Query, EmptyMutation, EmptySubscription>;

// -----------------------------------------------------------------------------
// Data
// -----------------------------------------------------------------------------

pub struct Store {
    pub tokens: Vec<Token>,
    requests: AtomicUsize,
}

impl Store {
    /// Tokens `0x000001..=0x<count>`; balance `n * 10^18`.
    pub fn with_tokens(count: usize) -> Self {
        let tokens = (1..=count)
            .map(|n| Token {
                id: ID(format!("0x{n:06}")),
                balance: BigIntValue(format!("{n}000000000000000000")),
                owner: Account {
                    id: ID(format!("0xowner{}", n % 3)),
                },
            })
            .collect();
        Self {
            tokens,
            requests: AtomicUsize::new(0),
        }
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

// -----------------------------------------------------------------------------
// Server
// -----------------------------------------------------------------------------

/// Serve the schema on an ephemeral port and return its GraphQL URL.
pub async fn spawn(store: Arc<Store>) -> String {
    let schema = Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(store)
        .finish();

    let app = Router::new()
        .route("/graphql", post(graphql_handler))
        .with_state(schema);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/graphql")
}

async fn graphql_handler(State(schema): State<TestSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}
