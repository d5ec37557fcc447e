//! Fetch service - the runtime called by generated entity modules.
//!
//! Generated code only holds typed glue; single-record fetches and the
//! cursor pagination algorithm live here.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, instrument, trace, warn};

use crate::error::{FetchError, FetchResult};
use crate::filter::WhereClause;
use crate::metrics::{FetchTimer, record_page, record_query_error, record_request};
use crate::normalize::{PresencePolicy, normalize};
use crate::ports::{
    DEFAULT_ORDER_FIELD, GraphqlRequest, MAX_PAGE, MultiQueryOptions, OrderDirection, QueryArgs,
    QueryBuilder, SingleQueryOptions, Transport, pagination_key,
};
use crate::selection::Selection;
use crate::value::FromRecord;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the fetch service.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Records the server returns per request at most.
    pub max_page: u32,
    /// Optional ceiling on the number of requests of one paginated fetch.
    pub max_pages: Option<u32>,
    /// Field presence rule used during normalization.
    pub presence: PresencePolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_page: MAX_PAGE,
            max_pages: None,
            presence: PresencePolicy::Explicit,
        }
    }
}

// =============================================================================
// GraphClient
// =============================================================================

/// Runtime client shared by every generated entity module.
///
/// Immutable once built; cursor state lives in each call.
#[derive(Clone)]
pub struct GraphClient {
    transport: Arc<dyn Transport>,
    queries: Arc<dyn QueryBuilder>,
    config: FetchConfig,
}

impl GraphClient {
    pub fn new(transport: Arc<dyn Transport>, queries: Arc<dyn QueryBuilder>) -> Self {
        Self::with_config(transport, queries, FetchConfig::default())
    }

    pub fn with_config(
        transport: Arc<dyn Transport>,
        queries: Arc<dyn QueryBuilder>,
        config: FetchConfig,
    ) -> Self {
        Self {
            transport,
            queries,
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch exactly one record.
    ///
    /// Issues one request. A `null` payload is [`FetchError::NotFound`].
    #[instrument(skip_all, fields(accessor = %accessor, id = %options.id))]
    pub async fn fetch_one<T: FromRecord>(
        &self,
        url: &str,
        accessor: &str,
        options: &SingleQueryOptions,
        selection: &Selection,
    ) -> FetchResult<T> {
        let _timer = FetchTimer::new();
        let args = QueryArgs::from_single(options);

        match self.request(url, accessor, &args, selection).await? {
            Value::Object(raw) => {
                record_page(accessor, 1);
                self.decode(&raw)
            }
            Value::Null => Err(FetchError::NotFound {
                accessor: accessor.to_string(),
                id: options.id.clone(),
            }),
            _ => Err(FetchError::MalformedResponse(format!(
                "{accessor} did not return an object"
            ))),
        }
    }

    /// Fetch a collection of records, paginating past the page cap.
    ///
    /// When `first` exceeds the cap, requests are clamped to the cap and
    /// continue from the raw ordering value of the last row with an
    /// `<orderBy>_gt` / `<orderBy>_lt` filter. The loop stops on a short
    /// page or once `first` records are accumulated; results keep server
    /// order and are truncated to `first`.
    #[instrument(skip_all, fields(accessor = %accessor, first = ?options.first))]
    pub async fn fetch_many<T, F, O>(
        &self,
        url: &str,
        accessor: &str,
        options: &MultiQueryOptions<F, O>,
        selection: &Selection,
    ) -> FetchResult<Vec<T>>
    where
        T: FromRecord,
        F: WhereClause,
        O: AsRef<str>,
    {
        let _timer = FetchTimer::new();
        let cap = self.config.max_page;

        // Per-request arguments; the where map is an owned copy.
        let mut args = QueryArgs::from_multi(options);
        let mut cursor_key = None;

        if let Some(first) = options.first
            && first > cap
        {
            args.first = Some(cap);
            let order_by = args
                .order_by
                .get_or_insert_with(|| DEFAULT_ORDER_FIELD.to_string())
                .clone();
            let direction = *args.order_direction.get_or_insert(OrderDirection::Asc);
            let key = pagination_key(&order_by, direction);
            debug!(key = %key, "Pagination engaged");
            cursor_key = Some((key, order_by));
        }

        let mut results = Vec::new();
        let mut cursor: Option<Value> = None;
        let mut pages: u32 = 0;

        loop {
            if let Some((key, _)) = &cursor_key
                && let Some(value) = cursor.take()
            {
                trace!(key = %key, cursor = %value, "Injecting cursor");
                args.filter
                    .get_or_insert_with(Map::new)
                    .insert(key.clone(), value);
            }

            if let Some(max_pages) = self.config.max_pages
                && pages >= max_pages
            {
                warn!(pages, "Page limit reached before data was exhausted");
                return Err(FetchError::PageLimitExceeded { pages });
            }

            let rows = match self.request(url, accessor, &args, selection).await? {
                Value::Array(rows) => rows,
                _ => {
                    return Err(FetchError::MalformedResponse(format!(
                        "{accessor} did not return a list"
                    )));
                }
            };
            pages += 1;

            let page_len = rows.len();
            let last_value = cursor_key
                .as_ref()
                .and_then(|(_, order_by)| rows.last().and_then(|row| row.get(order_by)))
                .cloned();

            for row in rows {
                let Value::Object(raw) = row else {
                    return Err(FetchError::MalformedResponse(format!(
                        "{accessor} returned a non-object row"
                    )));
                };
                results.push(self.decode(&raw)?);
            }
            record_page(accessor, page_len);
            debug!(page = pages, rows = page_len, total = results.len(), "Page received");

            let Some((_, order_by)) = &cursor_key else {
                break;
            };
            if page_len < cap as usize {
                break;
            }
            if let Some(first) = options.first
                && results.len() >= first as usize
            {
                break;
            }

            match last_value {
                Some(value) if !value.is_null() => cursor = Some(value),
                _ => {
                    return Err(FetchError::CursorUnavailable {
                        field: order_by.clone(),
                    });
                }
            }
        }

        if let Some(first) = options.first {
            results.truncate(first as usize);
        }
        debug!(pages, total = results.len(), "Fetch complete");

        Ok(results)
    }

    /// Build, send and unwrap one request.
    async fn request(
        &self,
        url: &str,
        accessor: &str,
        args: &QueryArgs,
        selection: &Selection,
    ) -> FetchResult<Value> {
        let query = self.queries.build(accessor, args, selection);
        trace!(query = %query, "Sending GraphQL request");
        record_request(accessor);

        let envelope = self
            .transport
            .post(url, &GraphqlRequest::new(query))
            .await?;

        if let Some(error) = envelope.first_error() {
            record_query_error(accessor);
            let dropped = envelope.error_count() - 1;
            if dropped > 0 {
                debug!(dropped, "Additional GraphQL errors dropped");
            }
            return Err(FetchError::Query(error.message.clone()));
        }

        envelope
            .into_sole_payload()
            .ok_or_else(|| FetchError::MalformedResponse("response carried no data".into()))
    }

    fn decode<T: FromRecord>(&self, raw: &Map<String, Value>) -> FetchResult<T> {
        let record = normalize(raw, T::field_specs(), self.config.presence)?;
        Ok(T::from_record(record)?)
    }
}
