//! Subgraph-style schema the fixture clients are generated from.

use graphgen_core::models::{Field, Schema, SchemaType, TypeKind, TypeRef};

fn object(name: &str, fields: Vec<Field>) -> SchemaType {
    SchemaType {
        name: name.into(),
        kind: TypeKind::Object,
        fields,
        input_fields: Vec::new(),
    }
}

fn input(name: &str, input_fields: Vec<Field>) -> SchemaType {
    SchemaType {
        name: name.into(),
        kind: TypeKind::InputObject,
        fields: Vec::new(),
        input_fields,
    }
}

fn required(ty: TypeRef) -> TypeRef {
    TypeRef::non_null(ty)
}

fn list_of(ty: TypeRef) -> TypeRef {
    TypeRef::non_null(TypeRef::list(TypeRef::non_null(ty)))
}

fn id_filter(name: &str) -> SchemaType {
    input(
        name,
        vec![
            Field::new("id", TypeRef::scalar("ID")),
            Field::new("id_gt", TypeRef::scalar("ID")),
        ],
    )
}

/// Tokens and accounts, plus entities whose names are Rust keywords
/// (`Match`) or whose accessors shadow module items (`fields`).
pub fn token_schema() -> Schema {
    let token_kind = || TypeRef::named(TypeKind::Enum, "TokenKind");

    let mut schema = Schema::new(Some("Query".into()));
    schema.insert(object(
        "Query",
        vec![
            Field::new("token", TypeRef::object("Token")),
            Field::new("tokens", list_of(TypeRef::object("Token"))),
            Field::new("account", TypeRef::object("Account")),
            Field::new("accounts", list_of(TypeRef::object("Account"))),
            Field::new("match", TypeRef::object("Match")),
            Field::new("matches", list_of(TypeRef::object("Match"))),
            Field::new("field", TypeRef::object("Field")),
            Field::new("fields", list_of(TypeRef::object("Field"))),
        ],
    ));
    schema.insert(object(
        "Token",
        vec![
            Field::new("id", required(TypeRef::scalar("ID"))),
            Field::new("balance", required(TypeRef::scalar("BigInt"))),
            Field::new("ratio", TypeRef::scalar("BigDecimal")),
            Field::new("owner", required(TypeRef::object("Account"))),
            Field::new("holders", list_of(TypeRef::object("Account"))),
            Field::new("kind", token_kind()),
            Field::new("type", TypeRef::scalar("String")),
            Field::new("createdAt", TypeRef::scalar("Timestamp")),
            Field::new("meta", TypeRef::object("TokenMeta")),
        ],
    ));
    schema.insert(input(
        "Token_filter",
        vec![
            Field::new("id", TypeRef::scalar("ID")),
            Field::new("id_gt", TypeRef::scalar("ID")),
            Field::new("balance_gte", TypeRef::scalar("BigInt")),
            Field::new("owner_", TypeRef::named(TypeKind::InputObject, "Account_filter")),
            Field::new("kind", token_kind()),
            Field::new("kind_in", TypeRef::list(required(token_kind()))),
            Field::new(
                "and",
                TypeRef::list(TypeRef::named(TypeKind::InputObject, "Token_filter")),
            ),
            Field::new(
                "_change_block",
                TypeRef::named(TypeKind::InputObject, "BlockChangedFilter"),
            ),
        ],
    ));
    schema.insert(object(
        "Account",
        vec![
            Field::new("id", required(TypeRef::scalar("ID"))),
            Field::new("tokens", list_of(TypeRef::object("Token"))),
        ],
    ));
    schema.insert(id_filter("Account_filter"));
    schema.insert(object(
        "TokenMeta",
        vec![Field::new("symbol", TypeRef::scalar("String"))],
    ));
    schema.insert(object(
        "Match",
        vec![
            Field::new("id", required(TypeRef::scalar("ID"))),
            Field::new("round", TypeRef::scalar("Int")),
        ],
    ));
    schema.insert(id_filter("Match_filter"));
    schema.insert(object(
        "Field",
        vec![
            Field::new("id", required(TypeRef::scalar("ID"))),
            Field::new("name", TypeRef::scalar("String")),
        ],
    ));
    schema.insert(id_filter("Field_filter"));
    schema.insert(input(
        "BlockChangedFilter",
        vec![Field::new("number_gte", required(TypeRef::scalar("Int")))],
    ));
    schema
}
