//! Atom and pointer constraints.
//!
//! Constraints are parsed from their raw form as soon as they are read; no
//! names are involved, so shape errors surface at intake. A [`ConstraintSet`]
//! holds at most one constraint per kind: adding a constraint of a kind that
//! is already present replaces it, and inheritance only fills kinds the set
//! does not have yet.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use schemalink_foundation::{Error, RawValue, Result};

// =============================================================================
// ConstraintKind
// =============================================================================

/// The kind of a constraint, ordered by its key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    /// `expr`
    Expr,
    /// `max-length`
    MaxLength,
    /// `max-value`
    MaxValue,
    /// `max-value-ex`
    MaxValueEx,
    /// `min-length`
    MinLength,
    /// `min-value`
    MinValue,
    /// `min-value-ex`
    MinValueEx,
    /// `precision`
    Precision,
    /// `regexp`
    Regexp,
    /// `rounding`
    Rounding,
    /// `unique`
    Unique,
}

impl ConstraintKind {
    /// Every kind, in key order.
    pub const ALL: [Self; 11] = [
        Self::Expr,
        Self::MaxLength,
        Self::MaxValue,
        Self::MaxValueEx,
        Self::MinLength,
        Self::MinValue,
        Self::MinValueEx,
        Self::Precision,
        Self::Regexp,
        Self::Rounding,
        Self::Unique,
    ];

    /// The key used in documents.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Expr => "expr",
            Self::MaxLength => "max-length",
            Self::MaxValue => "max-value",
            Self::MaxValueEx => "max-value-ex",
            Self::MinLength => "min-length",
            Self::MinValue => "min-value",
            Self::MinValueEx => "min-value-ex",
            Self::Precision => "precision",
            Self::Regexp => "regexp",
            Self::Rounding => "rounding",
            Self::Unique => "unique",
        }
    }

    /// Looks a kind up by key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Returns true for constraints that restrict an atom's values.
    #[must_use]
    pub fn is_atom_constraint(self) -> bool {
        !matches!(self, Self::Unique)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// =============================================================================
// RoundingMode
// =============================================================================

/// Decimal rounding modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Towards positive infinity.
    Ceiling,
    /// Towards zero.
    Down,
    /// Towards negative infinity.
    Floor,
    /// To nearest, ties towards zero.
    HalfDown,
    /// To nearest, ties to even.
    HalfEven,
    /// To nearest, ties away from zero.
    HalfUp,
    /// Away from zero.
    Up,
    /// Away from zero if the last digit would be 0 or 5, otherwise towards zero.
    ZeroFiveUp,
}

impl RoundingMode {
    const NAMES: [(&'static str, Self); 8] = [
        ("ceiling", Self::Ceiling),
        ("down", Self::Down),
        ("floor", Self::Floor),
        ("half-down", Self::HalfDown),
        ("half-even", Self::HalfEven),
        ("half-up", Self::HalfUp),
        ("up", Self::Up),
        ("05up", Self::ZeroFiveUp),
    ];

    /// Parses a mode name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::NAMES.iter().find(|(n, _)| *n == s).map(|(_, m)| *m)
    }

    /// The mode name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, m)| *m == self)
            .map_or("", |(n, _)| n)
    }
}

// =============================================================================
// Constraint
// =============================================================================

/// A single constraint.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// Minimum string length.
    MinLength(u64),
    /// Maximum string length.
    MaxLength(u64),
    /// Inclusive lower bound.
    MinValue(RawValue),
    /// Exclusive lower bound.
    MinValueEx(RawValue),
    /// Inclusive upper bound.
    MaxValue(RawValue),
    /// Exclusive upper bound.
    MaxValueEx(RawValue),
    /// Total digits and, optionally, digits after the point.
    Precision {
        /// Total number of digits.
        precision: u32,
        /// Digits after the decimal point; always less than `precision`.
        scale: Option<u32>,
    },
    /// Decimal rounding mode.
    Rounding(RoundingMode),
    /// Boolean expression over the value.
    Expr(String),
    /// Regular expression the value must match.
    Regexp(String),
    /// Pointer uniqueness: a value for atomic pointers, an expression otherwise.
    Unique(RawValue),
}

impl Constraint {
    /// The kind of this constraint.
    #[must_use]
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::MinLength(_) => ConstraintKind::MinLength,
            Self::MaxLength(_) => ConstraintKind::MaxLength,
            Self::MinValue(_) => ConstraintKind::MinValue,
            Self::MinValueEx(_) => ConstraintKind::MinValueEx,
            Self::MaxValue(_) => ConstraintKind::MaxValue,
            Self::MaxValueEx(_) => ConstraintKind::MaxValueEx,
            Self::Precision { .. } => ConstraintKind::Precision,
            Self::Rounding(_) => ConstraintKind::Rounding,
            Self::Expr(_) => ConstraintKind::Expr,
            Self::Regexp(_) => ConstraintKind::Regexp,
            Self::Unique(_) => ConstraintKind::Unique,
        }
    }

    /// Returns true for constraints that restrict an atom's values.
    #[must_use]
    pub fn is_atom_constraint(&self) -> bool {
        self.kind().is_atom_constraint()
    }

    /// Parses one `key: value` entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraint` for unknown keys and malformed values.
    pub fn from_entry(key: &str, value: &RawValue) -> Result<Self> {
        let kind = ConstraintKind::from_key(key)
            .ok_or_else(|| Error::invalid_constraint(format!("unknown constraint `{key}`")))?;
        let bad = |expected: &str| {
            Error::invalid_constraint(format!(
                "`{key}` expects {expected}, got {}",
                value.type_name()
            ))
        };

        let constraint = match kind {
            ConstraintKind::MinLength | ConstraintKind::MaxLength => {
                let n = value
                    .as_int()
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| bad("a non-negative integer"))?;
                if kind == ConstraintKind::MinLength {
                    Self::MinLength(n)
                } else {
                    Self::MaxLength(n)
                }
            }
            ConstraintKind::MinValue
            | ConstraintKind::MinValueEx
            | ConstraintKind::MaxValue
            | ConstraintKind::MaxValueEx => {
                if !value.is_number() && value.as_str().is_none() {
                    return Err(bad("a number or string"));
                }
                let v = value.clone();
                match kind {
                    ConstraintKind::MinValue => Self::MinValue(v),
                    ConstraintKind::MinValueEx => Self::MinValueEx(v),
                    ConstraintKind::MaxValue => Self::MaxValue(v),
                    _ => Self::MaxValueEx(v),
                }
            }
            ConstraintKind::Precision => parse_precision(value).ok_or_else(|| {
                bad("a positive integer or a [precision, scale] pair")
            })??,
            ConstraintKind::Rounding => {
                let name = value.as_str().ok_or_else(|| bad("a rounding mode"))?;
                Self::Rounding(RoundingMode::parse(name).ok_or_else(|| {
                    Error::invalid_constraint(format!("unknown rounding mode `{name}`"))
                })?)
            }
            ConstraintKind::Expr => {
                let text = value.as_str().ok_or_else(|| bad("an expression string"))?;
                Self::Expr(text.trim_matches(|c| c == ' ' || c == '\n').to_string())
            }
            ConstraintKind::Regexp => {
                let pattern = value.as_str().ok_or_else(|| bad("a regular expression"))?;
                Regex::new(pattern).map_err(|e| {
                    Error::invalid_constraint(format!("invalid regexp `{pattern}`: {e}"))
                })?;
                Self::Regexp(pattern.to_string())
            }
            ConstraintKind::Unique => {
                if value.is_null() {
                    return Err(bad("a value or expression"));
                }
                Self::Unique(value.clone())
            }
        };
        Ok(constraint)
    }

    /// Parses a `constraints` attribute: a list of single-entry maps, or one
    /// map holding several entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConstraint` for malformed entries.
    pub fn list_from_raw(value: &RawValue) -> Result<Vec<Self>> {
        let mut out = Vec::new();
        match value {
            RawValue::Null => {}
            RawValue::Map(map) => {
                for (k, v) in map {
                    out.push(Self::from_entry(k, v)?);
                }
            }
            RawValue::List(items) => {
                for item in items {
                    let map = item.as_map().ok_or_else(|| {
                        Error::invalid_constraint(format!(
                            "constraint entries must be maps, got {}",
                            item.type_name()
                        ))
                    })?;
                    for (k, v) in map {
                        out.push(Self::from_entry(k, v)?);
                    }
                }
            }
            other => {
                return Err(Error::invalid_constraint(format!(
                    "constraints must be a list or map, got {}",
                    other.type_name()
                )));
            }
        }
        Ok(out)
    }

    /// The raw `{key: value}` form.
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        let value = match self {
            Self::MinLength(n) | Self::MaxLength(n) => {
                RawValue::Int(i64::try_from(*n).unwrap_or(i64::MAX))
            }
            Self::MinValue(v)
            | Self::MinValueEx(v)
            | Self::MaxValue(v)
            | Self::MaxValueEx(v)
            | Self::Unique(v) => v.clone(),
            Self::Precision { precision, scale } => match scale {
                None => RawValue::Int(i64::from(*precision)),
                Some(s) => RawValue::List(vec![
                    RawValue::Int(i64::from(*precision)),
                    RawValue::Int(i64::from(*s)),
                ]),
            },
            Self::Rounding(mode) => RawValue::from(mode.as_str()),
            Self::Expr(text) | Self::Regexp(text) => RawValue::from(text.as_str()),
        };
        [(self.kind().key(), value)].into_iter().collect()
    }
}

fn parse_precision(value: &RawValue) -> Option<Result<Constraint>> {
    let positive = |v: &RawValue| v.as_int().and_then(|n| u32::try_from(n).ok());
    match value {
        RawValue::Int(_) => {
            let precision = positive(value).filter(|p| *p > 0)?;
            Some(Ok(Constraint::Precision {
                precision,
                scale: None,
            }))
        }
        RawValue::List(items) if items.len() == 2 => {
            let precision = positive(&items[0]).filter(|p| *p > 0)?;
            let scale = positive(&items[1])?;
            if scale >= precision {
                return Some(Err(Error::invalid_constraint(
                    "scale must be strictly less than total numeric precision",
                )));
            }
            Some(Ok(Constraint::Precision {
                precision,
                scale: Some(scale),
            }))
        }
        _ => None,
    }
}

// =============================================================================
// ConstraintSet
// =============================================================================

/// Constraints keyed by kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstraintSet {
    items: BTreeMap<ConstraintKind, Constraint>,
}

impl ConstraintSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint, replacing any constraint of the same kind.
    pub fn add(&mut self, constraint: Constraint) {
        self.items.insert(constraint.kind(), constraint);
    }

    /// Fills kinds missing from this set with `base`'s constraints.
    pub fn inherit(&mut self, base: &ConstraintSet) {
        for (kind, c) in &base.items {
            self.items.entry(*kind).or_insert_with(|| c.clone());
        }
    }

    /// Returns the constraint of the given kind.
    #[must_use]
    pub fn get(&self, kind: ConstraintKind) -> Option<&Constraint> {
        self.items.get(&kind)
    }

    /// Returns true if a constraint of the given kind is present.
    #[must_use]
    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.items.contains_key(&kind)
    }

    /// Iterates in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.items.values()
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The raw list form, sorted by key.
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        RawValue::List(self.iter().map(Constraint::to_raw).collect())
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = Self::new();
        for c in iter {
            set.add(c);
        }
        set
    }
}

// =============================================================================
// Tests
// =============================================================================
