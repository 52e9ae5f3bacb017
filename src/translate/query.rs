//! Inputs, outputs and options of translator lookups.
//!
//! A lookup takes one or more identifiers ([`Ids`]) and produces one
//! [`Translation`] per identifier. The batch shape follows the input length:
//! a single identifier yields [`Resolved::Single`], anything else yields
//! [`Resolved::Batch`], so `f(["MYC"])` and `f("MYC")` return the same value.

use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::fmt;

/// Identifiers to translate.
///
/// An entry may be absent: that is how a miss from a previous lookup is
/// carried into the next one when a [`Resolved`] is converted back into ids.
/// Absent entries always resolve to the missing-value default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ids(Vec<Option<String>>);

impl Ids {
    /// Number of identifiers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no identifiers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate identifiers; `None` marks a carried-over miss.
    pub fn iter(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|id| id.as_deref())
    }
}

impl From<&str> for Ids {
    fn from(id: &str) -> Self {
        Ids(vec![Some(id.to_string())])
    }
}

impl From<String> for Ids {
    fn from(id: String) -> Self {
        Ids(vec![Some(id)])
    }
}

impl From<&String> for Ids {
    fn from(id: &String) -> Self {
        Ids(vec![Some(id.clone())])
    }
}

impl From<Vec<String>> for Ids {
    fn from(ids: Vec<String>) -> Self {
        Ids(ids.into_iter().map(Some).collect())
    }
}

impl From<&Vec<String>> for Ids {
    fn from(ids: &Vec<String>) -> Self {
        ids.as_slice().into()
    }
}

impl From<&[String]> for Ids {
    fn from(ids: &[String]) -> Self {
        Ids(ids.iter().cloned().map(Some).collect())
    }
}

impl From<Vec<&str>> for Ids {
    fn from(ids: Vec<&str>) -> Self {
        ids.as_slice().into()
    }
}

impl From<&[&str]> for Ids {
    fn from(ids: &[&str]) -> Self {
        Ids(ids.iter().map(|id| Some(id.to_string())).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Ids {
    fn from(ids: [&str; N]) -> Self {
        ids.as_slice().into()
    }
}

impl<const N: usize> From<&[&str; N]> for Ids {
    fn from(ids: &[&str; N]) -> Self {
        ids.as_slice().into()
    }
}

impl From<&Resolved> for Ids {
    /// Feed the results of one lookup into another. Misses stay misses;
    /// multi-valued results contribute their first value.
    fn from(resolved: &Resolved) -> Self {
        match resolved {
            Resolved::Single(t) => Ids(vec![t.key().map(str::to_string)]),
            Resolved::Batch(ts) => Ids(ts.iter().map(|t| t.key().map(str::to_string)).collect()),
        }
    }
}

impl From<Resolved> for Ids {
    fn from(resolved: Resolved) -> Self {
        (&resolved).into()
    }
}

impl<S: Into<String>> FromIterator<S> for Ids {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Ids(iter.into_iter().map(|s| Some(s.into())).collect())
    }
}

/// Result for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Not found; carries the missing-value default in effect for the call
    Missing(Option<String>),
    /// A single value
    One(String),
    /// Several values, in stored order
    Many(Vec<String>),
}

impl Translation {
    /// Whether this is a lookup miss.
    pub fn is_missing(&self) -> bool {
        matches!(self, Translation::Missing(_))
    }

    /// The single value, if this is [`Translation::One`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Translation::One(s) => Some(s),
            _ => None,
        }
    }

    /// The values, if this is [`Translation::Many`].
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Translation::Many(v) => Some(v),
            _ => None,
        }
    }

    /// Found values as a flat list; a miss yields nothing.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Translation::Missing(_) => Vec::new(),
            Translation::One(s) => vec![s],
            Translation::Many(v) => v,
        }
    }

    /// Key to use when chaining into another lookup.
    fn key(&self) -> Option<&str> {
        match self {
            Translation::Missing(_) => None,
            Translation::One(s) => Some(s),
            Translation::Many(v) => v.first().map(String::as_str),
        }
    }

    /// Collapse to a single value: first of many, empty becomes a miss.
    pub(crate) fn select_first(self, null_id: &Option<String>) -> Self {
        match self {
            Translation::Many(v) => match v.into_iter().next() {
                Some(first) => Translation::One(first),
                None => Translation::Missing(null_id.clone()),
            },
            other => other,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::Missing(Some(d)) => f.write_str(d),
            Translation::Missing(None) => Ok(()),
            Translation::One(s) => f.write_str(s),
            Translation::Many(v) => f.write_str(&v.join(",")),
        }
    }
}

impl Serialize for Translation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Translation::Missing(None) => serializer.serialize_none(),
            Translation::Missing(Some(d)) => serializer.serialize_str(d),
            Translation::One(s) => serializer.serialize_str(s),
            Translation::Many(v) => v.serialize(serializer),
        }
    }
}

/// Results of a lookup, shaped after the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Exactly one identifier was given
    Single(Translation),
    /// Zero or several identifiers were given
    Batch(Vec<Translation>),
}

impl Resolved {
    pub(crate) fn from_results(mut results: Vec<Translation>) -> Self {
        if results.len() == 1 {
            if let Some(t) = results.pop() {
                return Resolved::Single(t);
            }
        }
        Resolved::Batch(results)
    }

    /// The result of a single-identifier lookup.
    pub fn as_single(&self) -> Option<&Translation> {
        match self {
            Resolved::Single(t) => Some(t),
            Resolved::Batch(_) => None,
        }
    }

    /// Number of per-identifier results.
    pub fn len(&self) -> usize {
        match self {
            Resolved::Single(_) => 1,
            Resolved::Batch(v) => v.len(),
        }
    }

    /// Whether there are no results.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-identifier results regardless of shape.
    pub fn into_vec(self) -> Vec<Translation> {
        match self {
            Resolved::Single(t) => vec![t],
            Resolved::Batch(v) => v,
        }
    }

    /// Iterate per-identifier results.
    pub fn iter(&self) -> std::slice::Iter<'_, Translation> {
        match self {
            Resolved::Single(t) => std::slice::from_ref(t).iter(),
            Resolved::Batch(v) => v.iter(),
        }
    }
}

impl Serialize for Resolved {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolved::Single(t) => t.serialize(serializer),
            Resolved::Batch(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for t in v {
                    seq.serialize_element(t)?;
                }
                seq.end()
            }
        }
    }
}

/// Per-call lookup options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Values to keep when an identifier has several candidates
    pub preferred_ids: Vec<String>,
    /// Collapse each result to one value; `None` uses the operation's default
    pub select_one: Option<bool>,
    /// `id_to_symbol`: return the official symbol followed by all synonyms
    pub all_synonyms: bool,
    /// Missing-value default for this call, overriding the translator's
    pub null_id: Option<String>,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer these values among several candidates.
    pub fn preferred<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn select_one(mut self, select_one: bool) -> Self {
        self.select_one = Some(select_one);
        self
    }

    pub fn all_synonyms(mut self, all_synonyms: bool) -> Self {
        self.all_synonyms = all_synonyms;
        self
    }

    pub fn null_id(mut self, null_id: impl Into<String>) -> Self {
        self.null_id = Some(null_id.into());
        self
    }
}
