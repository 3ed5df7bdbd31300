//! Attribute values and attribute sets.
//!
//! An [`Attributes`] map is a snapshot of named values on some target (a
//! node's `x`, `opacity`, `fill`...). Missing keys are undefined. Values are
//! numbers or strings, and strings that look like colors are blended channel
//! by channel.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::{self, Rgba};
use crate::easing::Easing;
use crate::scalar;
use crate::transition::{Transition, Tween};

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    /// The parsed color, when this is a color string that parses.
    ///
    /// Text that only looks like a color (`"round"`, `"right"`) yields `None`.
    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Text(s) if color::is_color_string(s) => color::parse(s).ok(),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Blend two values at eased fraction `v`.
///
/// Numbers use the scalar rule and color strings the color interpolator.
/// Every other pairing is discrete and holds `from`.
fn blend_value(from: &AttrValue, to: &AttrValue, v: f64) -> AttrValue {
    match (from, to) {
        (AttrValue::Number(a), AttrValue::Number(b)) => AttrValue::Number(scalar::blend(*a, *b, v)),
        (AttrValue::Text(_), AttrValue::Text(b)) => {
            let Some(start) = from.as_color() else {
                return from.clone();
            };
            match color::parse(b) {
                Ok(end) => AttrValue::Text(color::mix(&start, &end, v)),
                Err(error) => {
                    debug!(%error, from = %from, "color target unparseable, holding start value");
                    from.clone()
                }
            }
        }
        _ => from.clone(),
    }
}

impl Tween for AttrValue {
    fn tween(from: &Self, to: &Self, t: f64, easing: &Easing) -> Self {
        if t >= 1.0 || from == to {
            return to.clone();
        }
        blend_value(from, to, easing.apply(t))
    }
}

/// A set of named attribute values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Tween for Attributes {
    fn tween(from: &Self, to: &Self, t: f64, easing: &Easing) -> Self {
        if t >= 1.0 {
            return to.clone();
        }
        let v = easing.apply(t);
        to.0.iter()
            .map(|(key, target)| {
                let value = match from.0.get(key) {
                    Some(start) if start == target => target.clone(),
                    Some(start) => blend_value(start, target, v),
                    None => target.clone(),
                };
                (key.clone(), value)
            })
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    /// Shallow equality: every key of `self` holds an identical value in
    /// `other`. Extra keys in `other` are ignored.
    fn same(&self, other: &Self) -> bool {
        self.0.iter().all(|(key, value)| other.0.get(key) == Some(value))
    }
}

impl From<BTreeMap<String, AttrValue>> for Attributes {
    fn from(map: BTreeMap<String, AttrValue>) -> Self {
        Self(map)
    }
}

/// A transition over whole attribute sets.
pub type AttributesTransition = Transition<Attributes>;
