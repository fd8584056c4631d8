//! Link cardinality and search configuration.

use std::fmt;

use schemalink_foundation::RawValue;

/// Cardinality of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkMapping {
    /// `11`
    OneToOne,
    /// `1*`
    OneToMany,
    /// `*1`
    ManyToOne,
    /// `**`
    ManyToMany,
}

impl LinkMapping {
    /// Parses the textual form (`11`, `1*`, `*1`, `**`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "11" => Some(Self::OneToOne),
            "1*" => Some(Self::OneToMany),
            "*1" => Some(Self::ManyToOne),
            "**" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    /// Parses a raw value. Documents may spell `11` as an integer.
    #[must_use]
    pub fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Str(s) => Self::parse(s),
            RawValue::Int(11) => Some(Self::OneToOne),
            _ => None,
        }
    }

    /// The textual form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToOne => "11",
            Self::OneToMany => "1*",
            Self::ManyToOne => "*1",
            Self::ManyToMany => "**",
        }
    }

    /// Returns true if the target side is multi-valued.
    #[must_use]
    pub fn is_multi_target(self) -> bool {
        matches!(self, Self::OneToMany | Self::ManyToMany)
    }
}

impl fmt::Display for LinkMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full-text search weight of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SearchWeight {
    /// Highest weight.
    A,
    /// Second weight.
    B,
    /// Third weight.
    C,
    /// Lowest weight.
    D,
}

impl SearchWeight {
    /// Parses `A`..`D`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            _ => None,
        }
    }

    /// The textual form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Search configuration of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LinkSearchConfiguration {
    /// Weight, or `None` when the link is not searchable.
    pub weight: Option<SearchWeight>,
}

impl LinkSearchConfiguration {
    /// Parses `true`, `false` or `{weight: A}`.
    #[must_use]
    pub fn from_raw(value: &RawValue) -> Option<Self> {
        match value {
            RawValue::Bool(true) => Some(Self {
                weight: Some(SearchWeight::A),
            }),
            RawValue::Bool(false) | RawValue::Null => Some(Self::default()),
            RawValue::Map(map) => match map.get("weight") {
                Some(RawValue::Str(w)) if map.len() == 1 => SearchWeight::parse(w).map(|w| Self {
                    weight: Some(w),
                }),
                None if map.is_empty() => Some(Self::default()),
                _ => None,
            },
            _ => None,
        }
    }

    /// The raw form, `None` when not searchable.
    #[must_use]
    pub fn to_raw(self) -> Option<RawValue> {
        self.weight
            .map(|w| [("weight", RawValue::from(w.as_str()))].into_iter().collect())
    }
}
