//! Field selections requested from the server.
//!
//! A [`Selection`] is the runtime form of a generated `XArgs` value: the
//! ordered list of leaf and nested fields the caller asked for.

/// How a selected field is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected {
    /// Scalar or enum field.
    Leaf,
    /// Object field with its own sub-selection.
    Nested(Selection),
}

/// Ordered set of selected fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub fields: Vec<(String, Selected)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a leaf field.
    pub fn push_leaf(&mut self, name: impl Into<String>) {
        self.fields.push((name.into(), Selected::Leaf));
    }

    /// Select an object field. Empty sub-selections are skipped, since
    /// GraphQL rejects `owner { }`.
    pub fn push_nested(&mut self, name: impl Into<String>, selection: Selection) {
        if !selection.is_empty() {
            self.fields.push((name.into(), Selected::Nested(selection)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether a top-level field is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(field, _)| field == name)
    }
}

/// Conversion of a generated selection descriptor into a [`Selection`].
pub trait IntoSelection {
    fn selection(&self) -> Selection;
}

impl IntoSelection for Selection {
    fn selection(&self) -> Selection {
        self.clone()
    }
}

impl<T: IntoSelection + ?Sized> IntoSelection for Box<T> {
    fn selection(&self) -> Selection {
        (**self).selection()
    }
}
