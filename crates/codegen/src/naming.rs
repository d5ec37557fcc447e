//! Identifier derivation for generated code.

use convert_case::{Case, Casing};
use proc_macro2::{Ident, Span};
use quote::format_ident;

/// Rust keywords that can be used as raw identifiers.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "union", "unsafe",
    "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

fn is_plain_snake(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

/// snake_case spelling of a GraphQL field name.
///
/// Names that already are snake case (including filter names such as
/// `owner_` or `_change_block`) are kept verbatim so they cannot collide.
pub fn snake_name(name: &str) -> String {
    if is_plain_snake(name) {
        name.to_string()
    } else {
        name.to_case(Case::Snake)
    }
}

/// PascalCase spelling of a schema type or field name.
pub fn pascal_name(name: &str) -> String {
    let valid = name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        name.to_string()
    } else {
        name.to_case(Case::Pascal)
    }
}

/// Identifier from an already-cased name, escaping keywords.
pub fn ident(name: &str) -> Ident {
    if RESERVED.contains(&name) {
        format_ident!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        format_ident!("{}", name)
    }
}

/// Field identifier for a GraphQL field name.
pub fn field_ident(name: &str) -> Ident {
    ident(&snake_name(name))
}

/// Module identifier for a schema type name.
pub fn module_ident(type_name: &str) -> Ident {
    ident(&snake_name(type_name))
}

/// File stem of a module: raw identifiers load from the bare name.
pub fn module_file(module: &Ident) -> String {
    let name = module.to_string();
    match name.strip_prefix("r#") {
        Some(bare) => bare.to_string(),
        None => name,
    }
}

/// Generated type identifier, e.g. `TokenFilter`.
pub fn type_ident(type_name: &str, suffix: &str) -> Ident {
    format_ident!("{}{}", pascal_name(type_name), suffix)
}

/// Enum variant identifier for a field name.
pub fn variant_ident(name: &str) -> Ident {
    let pascal = pascal_name(name);
    if RESERVED.contains(&pascal.as_str()) {
        format_ident!("{}_", pascal)
    } else {
        format_ident!("{}", pascal)
    }
}

/// Builder method identifier for a selectable field, e.g. `with_balance`.
pub fn builder_ident(name: &str) -> Ident {
    format_ident!("with_{}", snake_name(name).trim_start_matches('_'))
}
