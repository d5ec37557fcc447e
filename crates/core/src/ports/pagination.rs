//! Query option types for single and paginated fetches.
//!
//! These types are caller-supplied per invocation and never persisted.
//! Generated entity modules re-export them rather than declaring their own.

use std::fmt;

/// Maximum number of records the server returns for a single request.
pub const MAX_PAGE: u32 = 1000;

/// Ordering field used when pagination is engaged without an explicit `orderBy`.
pub const DEFAULT_ORDER_FIELD: &str = "id";

/// Ordering direction for sorted queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl OrderDirection {
    /// GraphQL enum value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Filter suffix selecting records strictly beyond a cursor value.
    pub const fn cursor_suffix(self) -> &'static str {
        match self {
            Self::Asc => "_gt",
            Self::Desc => "_lt",
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination filter key for an ordering field, e.g. `id_gt`.
pub fn pagination_key(order_by: &str, direction: OrderDirection) -> String {
    format!("{order_by}{}", direction.cursor_suffix())
}

/// Block at which a query is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockPin {
    /// Block height.
    Number(u64),
    /// Block hash (hex encoded).
    Hash(String),
}

/// Options for fetching one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleQueryOptions {
    /// Identifier of the record.
    pub id: String,
    /// Optional block pin.
    pub block: Option<BlockPin>,
}

impl SingleQueryOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            block: None,
        }
    }

    pub fn at_block(mut self, block: BlockPin) -> Self {
        self.block = Some(block);
        self
    }
}

/// Options for fetching a collection of records.
///
/// `F` is the entity filter type (the `where` argument), `O` the ordering
/// key type. Generated modules use their `XFilter` and `XOrderBy` types.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiQueryOptions<F, O = String> {
    /// Number of records wanted. `None` fetches everything the server returns.
    pub first: Option<u32>,
    /// Filter applied to every page.
    pub filter: Option<F>,
    /// Optional block pin.
    pub block: Option<BlockPin>,
    /// Ordering field.
    pub order_by: Option<O>,
    /// Ordering direction.
    pub order_direction: Option<OrderDirection>,
}

impl<F, O> Default for MultiQueryOptions<F, O> {
    fn default() -> Self {
        Self {
            first: None,
            filter: None,
            block: None,
            order_by: None,
            order_direction: None,
        }
    }
}

impl<F, O> MultiQueryOptions<F, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(mut self, first: u32) -> Self {
        self.first = Some(first);
        self
    }

    pub fn filter(mut self, filter: F) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn at_block(mut self, block: BlockPin) -> Self {
        self.block = Some(block);
        self
    }

    pub fn order_by(mut self, order_by: O) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn order_direction(mut self, direction: OrderDirection) -> Self {
        self.order_direction = Some(direction);
        self
    }
}
