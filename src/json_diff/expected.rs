// Copyright 2024 The DocAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{Error, Result};

/// The template side of a "like" comparison.
///
/// Mirrors a JSON document, with one extra kind: a regular expression that
/// the actual value, read as a string, has to match. Object entries keep
/// their insertion order, which is the order they are checked in.
///
/// # Examples
///
/// ```
/// use json_expect::Expected;
/// use serde_json::json;
///
/// let expected = Expected::object([
///     ("id", Expected::from(json!(1))),
///     ("email", Expected::regex(r"^\w+@example\.com$").unwrap()),
/// ]);
/// assert_eq!(expected.to_json(), json!({"id": 1, "email": r"^\w+@example\.com$"}));
/// ```
#[derive(Debug, Clone)]
pub enum Expected {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Expected>),
    Object(Vec<(String, Expected)>),
    Regex(Regex),
}

impl Expected {
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Expected::Regex)
            .map_err(|_| Error::InvalidRegex {
                pattern: pattern.to_string(),
                path: "$".to_string(),
            })
    }

    /// Builds an object; a repeated key replaces the earlier entry in place.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expected)>,
    {
        let mut object: Vec<(String, Expected)> = vec![];
        for (key, value) in entries {
            let key = key.into();
            match object.iter_mut().find(|(existing, _)| *existing == key) {
                Some((_, slot)) => *slot = value,
                None => object.push((key, value)),
            }
        }
        Expected::Object(object)
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expected>,
    {
        Expected::Array(items.into_iter().collect())
    }

    /// The plain JSON this template stands for; a regex becomes its source.
    pub fn to_json(&self) -> Value {
        match self {
            Expected::Null => Value::Null,
            Expected::Bool(b) => Value::Bool(*b),
            Expected::Number(n) => Value::Number(n.clone()),
            Expected::String(s) => Value::String(s.clone()),
            Expected::Array(items) => Value::Array(items.iter().map(Expected::to_json).collect()),
            Expected::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Expected::Regex(re) => Value::String(re.as_str().to_string()),
        }
    }

    pub(crate) fn type_of(&self) -> &'static str {
        match self {
            Expected::Bool(_) => "boolean",
            Expected::Number(_) => "number",
            Expected::String(_) | Expected::Regex(_) => "string",
            Expected::Null | Expected::Array(_) | Expected::Object(_) => "object",
        }
    }
}

impl PartialEq for Expected {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expected::Regex(a), Expected::Regex(b)) => a.as_str() == b.as_str(),
            (Expected::Regex(_), _) | (_, Expected::Regex(_)) => false,
            (Expected::Array(a), Expected::Array(b)) => a == b,
            (Expected::Object(a), Expected::Object(b)) => a == b,
            (a, b) => a.to_json() == b.to_json(),
        }
    }
}

impl From<Value> for Expected {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Expected::Null,
            Value::Bool(b) => Expected::Bool(b),
            Value::Number(n) => Expected::Number(n),
            Value::String(s) => Expected::String(s),
            Value::Array(items) => Expected::Array(items.into_iter().map(Expected::from).collect()),
            Value::Object(map) => Expected::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Expected::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Expected {
    fn from(value: &Value) -> Self {
        Expected::from(value.clone())
    }
}

impl From<Regex> for Expected {
    fn from(re: Regex) -> Self {
        Expected::Regex(re)
    }
}
