//! Port trait for schema loading.

use async_trait::async_trait;

use crate::error::SchemaResult;
use crate::models::Schema;

/// Supplies the schema the generator works from.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Human-readable origin, for logs.
    fn describe(&self) -> String;

    async fn load(&self) -> SchemaResult<Schema>;
}
