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

//! Matcher templates: example values annotated with how loosely they have
//! to be matched.
//!
//! A template tree yields two things: the plain example value, used as the
//! expected side of [`crate::match_json`], and the table of matching rules
//! that relaxes the comparison where templates sit.
//!
//! ```
//! use json_expect::matchers::{each_like, like, term, Template};
//! use json_expect::{match_json, MatchOptions};
//! use serde_json::json;
//!
//! let body = Template::object([
//!     ("id", like(json!(1))),
//!     ("gender", term("M", "^(M|F)$")),
//!     ("tags", each_like(json!("rust"), None)),
//! ]);
//!
//! let actual = json!({"id": 42, "gender": "F", "tags": ["a", "b"]});
//! let outcome = match_json(&actual, &body.value(), &body.rules("$.body"), &MatchOptions::new()).unwrap();
//! assert!(outcome.is_equal());
//! ```

use serde_json::{Map, Value};

use crate::json_diff::path::Location;
use crate::json_diff::rules::{MatchingRule, MatchingRules};

#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Compared as is, unless an enclosing template relaxes it.
    Plain(Value),
    Object(Vec<(String, Template)>),
    Array(Vec<Template>),
    /// Same type as the example.
    Like(Box<Template>),
    /// Any string matching `matcher`; `generate` is the example.
    Term { generate: Value, matcher: String },
    /// An array of at least `min` elements, each like `content`.
    EachLike { content: Box<Template>, min: usize },
}

pub fn like(value: impl Into<Template>) -> Template {
    Template::Like(Box::new(value.into()))
}

pub fn term(generate: impl Into<Value>, matcher: &str) -> Template {
    Template::Term {
        generate: generate.into(),
        matcher: matcher.to_string(),
    }
}

/// `min` defaults to 1 when `None`.
pub fn each_like(content: impl Into<Template>, min: Option<usize>) -> Template {
    Template::EachLike {
        content: Box::new(content.into()),
        min: min.unwrap_or(1),
    }
}

impl Template {
    pub fn object<K, T, I>(entries: I) -> Self
    where
        K: Into<String>,
        T: Into<Template>,
        I: IntoIterator<Item = (K, T)>,
    {
        Template::Object(
            entries
                .into_iter()
                .map(|(key, template)| (key.into(), template.into()))
                .collect(),
        )
    }

    pub fn array<T, I>(items: I) -> Self
    where
        T: Into<Template>,
        I: IntoIterator<Item = T>,
    {
        Template::Array(items.into_iter().map(Into::into).collect())
    }

    /// The matching rules of this tree, keyed by paths rooted at `path`.
    pub fn rules(&self, path: &str) -> MatchingRules {
        let mut rules = MatchingRules::new();
        self.collect_rules(&Location::root(path), &mut rules);
        rules
    }

    fn collect_rules(&self, path: &Location, rules: &mut MatchingRules) {
        match self {
            Template::Plain(_) => {}
            Template::Object(entries) => {
                for (key, template) in entries {
                    template.collect_rules(&path.field(key), rules);
                }
            }
            Template::Array(items) => {
                for (i, template) in items.iter().enumerate() {
                    template.collect_rules(&path.index(i), rules);
                }
            }
            Template::Like(inner) => {
                rules.insert(path.to_string(), MatchingRule::by_type());
                inner.collect_rules(path, rules);
            }
            Template::Term { matcher, .. } => {
                rules.insert(path.to_string(), MatchingRule::by_regex(matcher));
            }
            Template::EachLike { content, min } => {
                let element = path.each();
                rules.insert(path.to_string(), MatchingRule::min(*min));
                rules.insert(element.any_field().to_string(), MatchingRule::by_type());
                content.collect_rules(&element, rules);
            }
        }
    }

    /// The example value with every template replaced by its example.
    pub fn value(&self) -> Value {
        match self {
            Template::Plain(value) => value.clone(),
            Template::Object(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(key, template)| (key.clone(), template.value()))
                    .collect::<Map<_, _>>(),
            ),
            Template::Array(items) => Value::Array(items.iter().map(Template::value).collect()),
            Template::Like(inner) => inner.value(),
            Template::Term { generate, .. } => generate.clone(),
            Template::EachLike { content, min } => {
                let element = content.value();
                Value::Array(vec![element; *min])
            }
        }
    }
}

impl From<Value> for Template {
    fn from(value: Value) -> Self {
        Template::Plain(value)
    }
}

impl From<&str> for Template {
    fn from(value: &str) -> Self {
        Template::Plain(Value::String(value.to_string()))
    }
}
