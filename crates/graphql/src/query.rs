//! GraphQL query text builder.

use std::fmt::Write;

use graphgen_core::filter::enum_name;
use graphgen_core::ports::{BlockPin, QueryArgs, QueryBuilder};
use graphgen_core::selection::{Selected, Selection};
use serde_json::Value;

/// Renders single-operation GraphQL queries.
///
/// Arguments are emitted in a fixed order (`id`, `first`, `where`, `block`,
/// `orderBy`, `orderDirection`); an empty `where` is omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct GqlQueryBuilder;

impl GqlQueryBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl QueryBuilder for GqlQueryBuilder {
    fn build(&self, accessor: &str, args: &QueryArgs, selection: &Selection) -> String {
        let mut out = String::from("{ ");
        out.push_str(accessor);

        let rendered = render_args(args);
        if !rendered.is_empty() {
            out.push('(');
            out.push_str(&rendered.join(", "));
            out.push(')');
        }

        if !selection.is_empty() {
            out.push(' ');
            render_selection(selection, &mut out);
        }

        out.push_str(" }");
        out
    }
}

fn render_args(args: &QueryArgs) -> Vec<String> {
    let mut rendered = Vec::new();

    if let Some(id) = &args.id {
        rendered.push(format!("id: {}", string_literal(id)));
    }
    if let Some(first) = args.first {
        rendered.push(format!("first: {first}"));
    }
    if let Some(filter) = &args.filter
        && !filter.is_empty()
    {
        let mut literal = String::new();
        render_object(filter.iter(), &mut literal);
        rendered.push(format!("where: {literal}"));
    }
    if let Some(block) = &args.block {
        let pin = match block {
            BlockPin::Number(number) => format!("{{number: {number}}}"),
            BlockPin::Hash(hash) => format!("{{hash: {}}}", string_literal(hash)),
        };
        rendered.push(format!("block: {pin}"));
    }
    if let Some(order_by) = &args.order_by {
        rendered.push(format!("orderBy: {order_by}"));
    }
    if let Some(direction) = args.order_direction {
        rendered.push(format!("orderDirection: {direction}"));
    }

    rendered
}

fn render_selection(selection: &Selection, out: &mut String) {
    out.push('{');
    for (name, selected) in &selection.fields {
        out.push(' ');
        out.push_str(name);
        if let Selected::Nested(inner) = selected {
            out.push(' ');
            render_selection(inner, out);
        }
    }
    out.push_str(" }");
}

/// GraphQL string literal. JSON escaping is a valid subset.
fn string_literal(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

fn render_object<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>, out: &mut String) {
    out.push('{');
    for (i, (key, value)) in entries.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}: ");
        render_value(value, out);
    }
    out.push('}');
}

/// `[_A-Za-z][_0-9A-Za-z]*`
fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn render_value(value: &Value, out: &mut String) {
    if let Some(name) = enum_name(value) {
        if is_name(name) {
            out.push_str(name);
        } else {
            out.push_str(&string_literal(name));
        }
        return;
    }

    match value {
        Value::Object(map) => render_object(map.iter(), out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_value(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}
