//! Pointer and atom default values.

use schemalink_foundation::RawValue;

/// One default value: a literal, or a query evaluated at insert time.
#[derive(Clone, Debug, PartialEq)]
pub enum DefaultSpec {
    /// A literal value.
    Literal(RawValue),
    /// A query default, `{query: "<expr>"}`.
    Query {
        /// The expression as written.
        text: String,
        /// Canonical text, once type-checked.
        resolved: Option<String>,
    },
}

impl DefaultSpec {
    /// Creates an unresolved query default.
    #[must_use]
    pub fn query(text: impl Into<String>) -> Self {
        Self::Query {
            text: text.into(),
            resolved: None,
        }
    }

    /// Reads one default entry.
    #[must_use]
    pub fn from_raw(value: &RawValue) -> Self {
        if let Some(map) = value.as_map() {
            if let (1, Some(RawValue::Str(text))) = (map.len(), map.get("query")) {
                return Self::query(text.clone());
            }
        }
        Self::Literal(value.clone())
    }

    /// Reads a `default` attribute: a single value or a list.
    #[must_use]
    pub fn list_from_raw(value: &RawValue) -> Vec<Self> {
        value.to_list().iter().map(Self::from_raw).collect()
    }

    /// The declared raw form.
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        match self {
            Self::Literal(v) => v.clone(),
            Self::Query { text, .. } => [("query", RawValue::from(text.as_str()))]
                .into_iter()
                .collect(),
        }
    }

    /// Represents a default list, collapsing a single entry.
    #[must_use]
    pub fn list_to_raw(defaults: &[Self]) -> RawValue {
        match defaults {
            [single] => single.to_raw(),
            many => RawValue::List(many.iter().map(Self::to_raw).collect()),
        }
    }

    /// Returns true for query defaults.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}
