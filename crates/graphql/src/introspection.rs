//! Schema loading from GraphQL introspection results.
//!
//! Two sources are provided: a saved introspection document on disk and a
//! live endpoint queried through a [`Transport`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use graphgen_core::error::{SchemaError, SchemaResult};
use graphgen_core::models::{Field, Schema, SchemaType, TypeKind, TypeRef};
use graphgen_core::ports::{GraphqlRequest, SchemaSource, Transport};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// Standard introspection query, restricted to what the generator reads.
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    types {
      kind
      name
      fields(includeDeprecated: true) { name type { ...TypeRef } }
      inputFields { name type { ...TypeRef } }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
            }
          }
        }
      }
    }
  }
}"#;

// -----------------------------------------------------------------------------
// Introspection document
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(rename = "queryType")]
    query_type: Option<RawNamed>,
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawType {
    kind: TypeKind,
    name: Option<String>,
    #[serde(default)]
    fields: Option<Vec<RawField>>,
    #[serde(default, rename = "inputFields")]
    input_fields: Option<Vec<RawField>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    ty: RawTypeRef,
}

#[derive(Debug, Deserialize)]
struct RawTypeRef {
    kind: TypeKind,
    name: Option<String>,
    #[serde(default, rename = "ofType")]
    of_type: Option<Box<RawTypeRef>>,
}

impl RawTypeRef {
    fn into_type_ref(self, field: &str) -> SchemaResult<TypeRef> {
        let unwrap_inner = |inner: Option<Box<RawTypeRef>>| {
            inner.ok_or_else(|| {
                SchemaError::Introspection(format!("field {field}: wrapper type without ofType"))
            })
        };

        match self.kind {
            TypeKind::NonNull => Ok(TypeRef::non_null(
                unwrap_inner(self.of_type)?.into_type_ref(field)?,
            )),
            TypeKind::List => Ok(TypeRef::list(
                unwrap_inner(self.of_type)?.into_type_ref(field)?,
            )),
            kind => {
                let name = self.name.ok_or_else(|| {
                    SchemaError::Introspection(format!("field {field}: named type without name"))
                })?;
                Ok(TypeRef::named(kind, name))
            }
        }
    }
}

fn convert_fields(fields: Option<Vec<RawField>>) -> SchemaResult<Vec<Field>> {
    fields
        .unwrap_or_default()
        .into_iter()
        .map(|field| {
            let ty = field.ty.into_type_ref(&field.name)?;
            Ok(Field::new(field.name, ty))
        })
        .collect()
}

/// Parse an introspection result.
///
/// Accepts the full response (`{"data":{"__schema":…}}`), its data object
/// (`{"__schema":…}`) or the bare schema object. Built-in `__` types are
/// skipped.
pub fn parse_introspection(document: Value) -> SchemaResult<Schema> {
    let mut document = document;
    if let Some(data) = document.get_mut("data") {
        document = data.take();
    }
    if let Some(schema) = document.get_mut("__schema") {
        document = schema.take();
    }

    let raw: RawSchema = serde_json::from_value(document)
        .map_err(|e| SchemaError::Introspection(e.to_string()))?;

    let mut schema = Schema::new(raw.query_type.map(|named| named.name));
    for ty in raw.types {
        let Some(name) = ty.name else {
            continue;
        };
        if name.starts_with("__") {
            continue;
        }
        schema.insert(SchemaType {
            fields: convert_fields(ty.fields)?,
            input_fields: convert_fields(ty.input_fields)?,
            kind: ty.kind,
            name,
        });
    }

    debug!(types = schema.types.len(), "Introspection parsed");
    Ok(schema)
}

// -----------------------------------------------------------------------------
// Sources
// -----------------------------------------------------------------------------

/// Introspection result saved to a JSON file.
#[derive(Debug, Clone)]
pub struct IntrospectionFile {
    path: PathBuf,
}

impl IntrospectionFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SchemaSource for IntrospectionFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load(&self) -> SchemaResult<Schema> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            SchemaError::Introspection(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let document: Value = serde_json::from_str(&text)
            .map_err(|e| SchemaError::Introspection(format!("{}: {e}", self.path.display())))?;

        info!(path = %self.path.display(), "📄 Loaded introspection file");
        parse_introspection(document)
    }
}

/// Live endpoint introspected through a transport.
#[derive(Clone)]
pub struct RemoteSchema {
    transport: Arc<dyn Transport>,
    url: String,
}

impl RemoteSchema {
    pub fn new(transport: Arc<dyn Transport>, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }
}

#[async_trait]
impl SchemaSource for RemoteSchema {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn load(&self) -> SchemaResult<Schema> {
        let envelope = self
            .transport
            .post(&self.url, &GraphqlRequest::new(INTROSPECTION_QUERY))
            .await
            .map_err(|e| SchemaError::Introspection(e.to_string()))?;

        if let Some(error) = envelope.first_error() {
            return Err(SchemaError::Introspection(error.message.clone()));
        }
        let data = envelope
            .data
            .ok_or_else(|| SchemaError::Introspection("response carried no data".into()))?;

        info!(url = %self.url, "🌐 Introspected remote schema");
        parse_introspection(Value::Object(data))
    }
}
