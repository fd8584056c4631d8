//! Typed access to the keys of a raw declaration map.

use schemalink_foundation::{Error, RawMap, RawValue, Result};
use schemalink_schema::{Constraint, DefaultSpec, LinkMapping, LinkSearchConfiguration};

/// A declaration body with its allowed keys checked.
pub(crate) struct Fields<'a> {
    map: Option<&'a RawMap>,
}

impl<'a> Fields<'a> {
    /// Views `value` as a declaration body. Null is an empty body.
    pub(crate) fn new(value: &'a RawValue, allowed: &[&str], strict: bool) -> Result<Self> {
        let map = match value {
            RawValue::Null => None,
            RawValue::Map(map) => Some(map),
            other => {
                return Err(Error::invalid_declaration(format!(
                    "expected a mapping, got {}",
                    other.type_name()
                )));
            }
        };
        if strict {
            if let Some(unknown) = map
                .into_iter()
                .flat_map(|m| m.keys())
                .find(|k| !allowed.contains(&k.as_str()))
            {
                return Err(Error::invalid_declaration(format!("unknown key `{unknown}`")));
            }
        }
        Ok(Self { map })
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'a RawValue> {
        self.map.and_then(|m| m.get(key)).filter(|v| !v.is_null())
    }

    pub(crate) fn str(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(RawValue::Str(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong(key, "a string", other)),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(RawValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(wrong(key, "a boolean", other)),
        }
    }

    /// A name or list of names; `extends: X` is `extends: [X]`.
    pub(crate) fn names(&self, key: &str) -> Result<Vec<String>> {
        self.string_list(key, "a name or list of names")
    }

    /// An expression or list of expressions.
    pub(crate) fn expressions(&self, key: &str) -> Result<Vec<String>> {
        self.string_list(key, "an expression or list of expressions")
    }

    fn string_list(&self, key: &str, expected: &str) -> Result<Vec<String>> {
        let Some(value) = self.get(key) else {
            return Ok(Vec::new());
        };
        value
            .to_list()
            .into_iter()
            .map(|v| match v {
                RawValue::Str(s) => Ok(s),
                other => Err(wrong(key, expected, &other)),
            })
            .collect()
    }

    pub(crate) fn map(&self, key: &str) -> Result<Option<&'a RawMap>> {
        match self.get(key) {
            None => Ok(None),
            Some(RawValue::Map(m)) => Ok(Some(m)),
            Some(other) => Err(wrong(key, "a mapping", other)),
        }
    }

    /// `default: v` is `default: [v]`.
    pub(crate) fn defaults(&self, key: &str) -> Option<Vec<DefaultSpec>> {
        self.get(key).map(DefaultSpec::list_from_raw)
    }

    pub(crate) fn constraints(&self, key: &str) -> Result<Vec<Constraint>> {
        self.get(key)
            .map_or_else(|| Ok(Vec::new()), Constraint::list_from_raw)
    }

    pub(crate) fn mapping(&self, key: &str) -> Result<Option<LinkMapping>> {
        self.get(key)
            .map(|v| {
                LinkMapping::from_raw(v).ok_or_else(|| {
                    Error::invalid_declaration(format!(
                        "invalid mapping {v}, expected one of 11, 1*, *1, **"
                    ))
                })
            })
            .transpose()
    }

    pub(crate) fn search(&self, key: &str) -> Result<Option<LinkSearchConfiguration>> {
        self.get(key)
            .map(|v| {
                LinkSearchConfiguration::from_raw(v).ok_or_else(|| {
                    Error::invalid_declaration(format!("invalid search configuration {v}"))
                })
            })
            .transpose()
    }
}

fn wrong(key: &str, expected: &str, got: &RawValue) -> Error {
    Error::invalid_declaration(format!(
        "`{key}` must be {expected}, got {}",
        got.type_name()
    ))
}
