//! Port trait for GraphQL query text construction.
//!
//! The core decides which accessor, arguments and selection to request;
//! implementations (e.g. `graphgen-graphql`) turn them into query text.

use serde_json::{Map, Value};

use crate::filter::WhereClause;
use crate::ports::{BlockPin, MultiQueryOptions, OrderDirection, SingleQueryOptions};
use crate::selection::Selection;

/// Fully resolved arguments of one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryArgs {
    pub id: Option<String>,
    pub first: Option<u32>,
    /// Rendered `where` argument.
    pub filter: Option<Map<String, Value>>,
    pub block: Option<BlockPin>,
    pub order_by: Option<String>,
    pub order_direction: Option<OrderDirection>,
}

impl QueryArgs {
    /// Arguments of a single-record request.
    pub fn from_single(options: &SingleQueryOptions) -> Self {
        Self {
            id: Some(options.id.clone()),
            block: options.block.clone(),
            ..Self::default()
        }
    }

    /// Arguments of a collection request, exactly as the caller supplied them.
    pub fn from_multi<F, O>(options: &MultiQueryOptions<F, O>) -> Self
    where
        F: WhereClause,
        O: AsRef<str>,
    {
        Self {
            id: None,
            first: options.first,
            filter: options.filter.as_ref().map(WhereClause::to_where),
            block: options.block.clone(),
            order_by: options.order_by.as_ref().map(|o| o.as_ref().to_string()),
            order_direction: options.order_direction,
        }
    }
}

/// Port trait for query text construction.
pub trait QueryBuilder: Send + Sync {
    /// Build the query text for one accessor call.
    fn build(&self, accessor: &str, args: &QueryArgs, selection: &Selection) -> String;
}
