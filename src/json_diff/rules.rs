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

//! Rule-driven comparison.
//!
//! Values are compared positionally and exactly, except where a matching
//! rule registered under the current path relaxes the comparison:
//!
//! * `{"match": "type"}` only requires the same type, here and in every
//!   descendant that has no rule of its own;
//! * `{"match": "regex", "regex": "..."}` requires the actual value, read as
//!   a string, to match the pattern; the expected value is not consulted;
//! * `{"min": n}` requires an array of at least `n` elements, each of which
//!   is compared against the expected template element at `path[*]`.
//!
//! Rules are looked up by exact path. A rule at `path.*` also covers each
//! property of the object at `path`, and a rule at `path[*]` each element of
//! the array at `path`.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use super::misc::{numbers_eq, render, type_of};
use super::path::Location;
use super::{NumericMode, Outcome};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Type,
    Regex,
}

/// One entry of a matching-rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingRule {
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RuleKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
}

impl MatchingRule {
    pub fn by_type() -> Self {
        Self {
            kind: Some(RuleKind::Type),
            ..Self::default()
        }
    }

    pub fn by_regex(pattern: &str) -> Self {
        Self {
            kind: Some(RuleKind::Regex),
            regex: Some(pattern.to_string()),
            ..Self::default()
        }
    }

    pub fn min(min: usize) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }
}

/// Flat table of rules keyed by path, e.g. `$.body.items[*].*`.
pub type MatchingRules = BTreeMap<String, MatchingRule>;

/// Per-call options for [`match_json`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOptions {
    pub(crate) target: String,
    pub(crate) path: String,
    pub(crate) strict: bool,
}

impl MatchOptions {
    /// Target `Json`, root `$.body`, extra actual keys allowed.
    pub fn new() -> Self {
        Self {
            target: "Json".to_string(),
            path: "$.body".to_string(),
            strict: false,
        }
    }

    pub fn target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    /// Root path; rule keys have to start with it to be found.
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Rejects keys present in the actual value but absent from the
    /// expected one, at any depth not covered by a regex rule.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares `actual` with `expected` under `rules`.
///
/// A structural mismatch is returned as a failed [`Outcome`]; a rule that
/// cannot be applied (such as a pattern that does not compile) is an
/// [`Error`].
///
/// # Examples
///
/// ```
/// use json_expect::{match_json, MatchOptions, MatchingRule, MatchingRules};
/// use serde_json::json;
///
/// let mut rules = MatchingRules::new();
/// rules.insert("$.body.id".to_string(), MatchingRule::by_type());
///
/// let outcome = match_json(&json!({"id": 7}), &json!({"id": 1}), &rules, &MatchOptions::new()).unwrap();
/// assert!(outcome.is_equal());
/// ```
pub fn match_json(
    actual: &Value,
    expected: &Value,
    rules: &MatchingRules,
    options: &MatchOptions,
) -> Result<Outcome> {
    trace!(root = %options.path, rules = rules.len(), "rule comparison");

    let comparer = RuleComparer {
        rules,
        options,
        patterns: RefCell::new(HashMap::new()),
    };

    match comparer.compare(actual, expected, &Location::root(&options.path), None, Mode::Value) {
        Ok(()) => Ok(Outcome::equal()),
        Err(Failure::Mismatch(message)) => Ok(Outcome::mismatch(message)),
        Err(Failure::Fatal(err)) => Err(err),
    }
}

/// Whether rule-less nodes need equal values or only equal types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Value,
    Type,
}

enum Failure {
    Mismatch(String),
    Fatal(Error),
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Failure::Fatal(err)
    }
}

type Step = std::result::Result<(), Failure>;

/// Like [`type_of`], but telling `null`, arrays and objects apart.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        other => type_of(other),
    }
}

struct RuleComparer<'a> {
    rules: &'a MatchingRules,
    options: &'a MatchOptions,
    patterns: RefCell<HashMap<String, Regex>>,
}

impl<'a> RuleComparer<'a> {
    fn mismatch(&self, message: String) -> Step {
        Err(Failure::Mismatch(format!("{} {}", self.options.target, message)))
    }

    fn rule_at(&self, path: &Location, wildcard: Option<&Location>) -> Option<&'a MatchingRule> {
        self.rules
            .get(path.as_str())
            .or_else(|| wildcard.and_then(|w| self.rules.get(w.as_str())))
    }

    fn compare(
        &self,
        actual: &Value,
        expected: &Value,
        path: &Location,
        wildcard: Option<&Location>,
        mode: Mode,
    ) -> Step {
        let Some(rule) = self.rule_at(path, wildcard) else {
            return self.structural(actual, expected, path, mode);
        };

        if rule.kind == Some(RuleKind::Regex) {
            return self.regex_compare(actual, rule, path);
        }

        let mode = match rule.kind {
            Some(RuleKind::Type) => Mode::Type,
            _ => mode,
        };

        match rule.min {
            Some(min) => self.min_compare(actual, expected, path, min, mode),
            None => self.structural(actual, expected, path, mode),
        }
    }

    fn structural(&self, actual: &Value, expected: &Value, path: &Location, mode: Mode) -> Step {
        let (actual_type, expected_type) = (type_of(actual), type_of(expected));
        if actual_type != expected_type {
            return self.mismatch(format!(
                "doesn't have type \"{}\" at \"{}\" but found \"{}\"",
                expected_type, path, actual_type
            ));
        }

        let (actual_kind, expected_kind) = (kind_of(actual), kind_of(expected));
        if actual_kind != expected_kind {
            return match mode {
                Mode::Type => Err(Failure::Mismatch(format!(
                    "Matching Rule - \"type\" failed at \"{}\"",
                    path
                ))),
                Mode::Value if actual.is_null() || expected.is_null() => {
                    self.value_mismatch(actual, expected, path)
                }
                Mode::Value => self.mismatch(format!(
                    "doesn't have type \"{}\" at \"{}\" but found \"{}\"",
                    expected_kind, path, actual_kind
                )),
            };
        }

        match (actual, expected) {
            (Value::Object(actual), Value::Object(expected)) => {
                self.object_compare(actual, expected, path, mode)
            }
            (Value::Array(actual), Value::Array(expected)) => {
                self.array_compare(actual, expected, path, mode)
            }
            _ if mode == Mode::Type => Ok(()),
            (Value::Number(_), Value::Number(_))
                if numbers_eq(actual, expected, NumericMode::AssumeFloat) =>
            {
                Ok(())
            }
            _ if actual == expected => Ok(()),
            _ => self.value_mismatch(actual, expected, path),
        }
    }

    fn value_mismatch(&self, actual: &Value, expected: &Value, path: &Location) -> Step {
        self.mismatch(format!(
            "doesn't have value \"{}\" at \"{}\" but found \"{}\"",
            render(expected),
            path,
            render(actual)
        ))
    }

    fn object_compare(
        &self,
        actual: &Map<String, Value>,
        expected: &Map<String, Value>,
        path: &Location,
        mode: Mode,
    ) -> Step {
        let wildcard = path.any_field();

        for (key, expected_value) in expected {
            let Some(actual_value) = actual.get(key) else {
                return self.mismatch(format!("doesn't have \"{}\" at \"{}\"", key, path));
            };

            self.compare(actual_value, expected_value, &path.field(key), Some(&wildcard), mode)?;
        }

        if self.options.strict {
            if let Some(extra) = actual.keys().find(|key| !expected.contains_key(*key)) {
                return self.mismatch(format!("has unexpected \"{}\" at \"{}\"", extra, path));
            }
        }

        Ok(())
    }

    fn array_compare(
        &self,
        actual: &[Value],
        expected: &[Value],
        path: &Location,
        mode: Mode,
    ) -> Step {
        if actual.len() != expected.len() {
            return self.length_mismatch(expected.len(), actual.len(), path);
        }

        let wildcard = path.each();
        for (i, (actual, expected)) in actual.iter().zip(expected).enumerate() {
            self.compare(actual, expected, &path.index(i), Some(&wildcard), mode)?;
        }

        Ok(())
    }

    fn length_mismatch(&self, expected: usize, actual: usize, path: &Location) -> Step {
        self.mismatch(format!(
            "doesn't have array with length \"{}\" at \"{}\" but found with length \"{}\"",
            expected, path, actual
        ))
    }

    /// Every actual element is held against the template at the same index,
    /// or the first template once the templates run out.
    fn min_compare(
        &self,
        actual: &Value,
        expected: &Value,
        path: &Location,
        min: usize,
        mode: Mode,
    ) -> Step {
        let Value::Array(items) = actual else {
            return self.mismatch(format!(
                "doesn't have type \"array\" at \"{}\" but found \"{}\"",
                path,
                kind_of(actual)
            ));
        };

        if items.len() < min {
            return self.length_mismatch(min, items.len(), path);
        }

        let templates = match expected {
            Value::Array(templates) => templates.as_slice(),
            other => std::slice::from_ref(other),
        };
        let Some(first) = templates.first() else {
            return Ok(());
        };

        let element_path = path.each();
        let wildcard = element_path.any_field();
        for (i, item) in items.iter().enumerate() {
            let template = templates.get(i).unwrap_or(first);
            self.compare(item, template, &element_path, Some(&wildcard), mode)?;
        }

        Ok(())
    }

    fn regex_compare(&self, actual: &Value, rule: &MatchingRule, path: &Location) -> Step {
        let Some(pattern) = rule.regex.as_deref() else {
            return Err(Error::Configuration(format!(
                "regex rule at \"{}\" has no pattern",
                path
            ))
            .into());
        };

        let found = render(actual);
        let is_match = {
            let mut patterns = self.patterns.borrow_mut();
            if !patterns.contains_key(pattern) {
                let re = Regex::new(pattern).map_err(|_| Error::InvalidRegex {
                    pattern: pattern.to_string(),
                    path: path.to_string(),
                })?;
                patterns.insert(pattern.to_string(), re);
            }
            patterns
                .get(pattern)
                .is_some_and(|re| re.is_match(&found))
        };

        if is_match {
            return Ok(());
        }

        self.mismatch(format!(
            "doesn't match with \"{}\" at \"{}\" but found \"{}\"",
            pattern, path, found
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn rules(entries: &[(&str, MatchingRule)]) -> MatchingRules {
        entries
            .iter()
            .map(|(path, rule)| (path.to_string(), rule.clone()))
            .collect()
    }

    fn check(actual: Value, expected: Value, rules: &MatchingRules) -> String {
        match_json(&actual, &expected, rules, &MatchOptions::new())
            .unwrap()
            .message_or_empty()
            .to_string()
    }

    #[test]
    fn test_without_rules() {
        let none = MatchingRules::new();
        assert_eq!(check(json!({"a": 1, "b": [1, 2]}), json!({"a": 1, "b": [1, 2]}), &none), "");
        assert_eq!(check(json!({"a": 1, "b": 2}), json!({"a": 1}), &none), "");
        assert_eq!(check(json!(1.0), json!(1), &none), "");
        assert_eq!(
            check(json!({"a": 1}), json!({"a": 2}), &none),
            r#"Json doesn't have value "2" at "$.body.a" but found "1""#
        );
        assert_eq!(
            check(json!({"a": "1"}), json!({"a": 1}), &none),
            r#"Json doesn't have type "number" at "$.body.a" but found "string""#
        );
        assert_eq!(
            check(json!({}), json!({"a": 1}), &none),
            r#"Json doesn't have "a" at "$.body""#
        );
        assert_eq!(
            check(json!({"a": [1]}), json!({"a": {}}), &none),
            r#"Json doesn't have type "object" at "$.body.a" but found "array""#
        );
        assert_eq!(
            check(json!({"a": null}), json!({"a": {}}), &none),
            r#"Json doesn't have value "{}" at "$.body.a" but found "null""#
        );
    }

    #[test]
    fn test_arrays_are_positional() {
        let none = MatchingRules::new();
        assert_eq!(
            check(json!([1, 2]), json!([2, 1]), &none),
            r#"Json doesn't have value "2" at "$.body[0]" but found "1""#
        );
        assert_eq!(
            check(json!([1, 2, 3]), json!([1, 2]), &none),
            r#"Json doesn't have array with length "2" at "$.body" but found with length "3""#
        );
    }

    #[test]
    fn test_type_rule() {
        let table = rules(&[("$.body.x", MatchingRule::by_type())]);
        assert_eq!(check(json!({"x": 1}), json!({"x": 2}), &table), "");
        assert_eq!(
            check(json!({"x": 1}), json!({"x": "2"}), &table),
            r#"Json doesn't have type "string" at "$.body.x" but found "number""#
        );
        assert_eq!(
            check(json!({"x": []}), json!({"x": {}}), &table),
            r#"Matching Rule - "type" failed at "$.body.x""#
        );
    }

    #[test]
    fn test_type_rule_cascades_to_descendants() {
        let table = rules(&[
            ("$.body", MatchingRule::by_type()),
            ("$.body.code", MatchingRule::by_regex("^[A-Z]{3}$")),
        ]);
        let expected = json!({"user": {"name": "ann", "age": 30}, "code": "ABC"});

        assert_eq!(
            check(json!({"user": {"name": "bob", "age": 41}, "code": "XYZ"}), expected.clone(), &table),
            ""
        );
        assert_eq!(
            check(json!({"user": {"name": "bob", "age": "41"}, "code": "XYZ"}), expected.clone(), &table),
            r#"Json doesn't have type "number" at "$.body.user.age" but found "string""#
        );
        assert_eq!(
            check(json!({"user": {"name": "bob", "age": 41}, "code": "xyz"}), expected, &table),
            r#"Json doesn't match with "^[A-Z]{3}$" at "$.body.code" but found "xyz""#
        );
    }

    #[test]
    fn test_regex_rule() {
        let table = rules(&[("$.body.gender", MatchingRule::by_regex("^(M|F){1}$"))]);
        assert_eq!(check(json!({"gender": "F"}), json!({"gender": "M"}), &table), "");
        assert_eq!(
            check(json!({"gender": "Male"}), json!({"gender": "M"}), &table),
            r#"Json doesn't match with "^(M|F){1}$" at "$.body.gender" but found "Male""#
        );

        let table = rules(&[("$.body.id", MatchingRule::by_regex(r"^\d+$"))]);
        assert_eq!(check(json!({"id": 42}), json!({"id": 1}), &table), "");
    }

    #[test]
    fn test_invalid_regex_is_an_error() {
        let table = rules(&[("$.body.name", MatchingRule::by_regex("(unclosed"))]);
        let err = match_json(
            &json!({"name": "x"}),
            &json!({"name": "y"}),
            &table,
            &MatchOptions::new(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"Invalid RegExp provided "(unclosed" at "$.body.name""#
        );
    }

    #[test]
    fn test_min_rule() {
        let table = rules(&[
            ("$.body.books", MatchingRule::min(2)),
            ("$.body.books[*].*", MatchingRule::by_type()),
        ]);
        let expected = json!({"books": [{"title": "a", "pages": 1}, {"title": "a", "pages": 1}]});

        assert_eq!(
            check(
                json!({"books": [
                    {"title": "x", "pages": 10},
                    {"title": "y", "pages": 20},
                    {"title": "z", "pages": 30},
                ]}),
                expected.clone(),
                &table
            ),
            ""
        );
        assert_eq!(
            check(json!({"books": [{"title": "x", "pages": 10}]}), expected.clone(), &table),
            r#"Json doesn't have array with length "2" at "$.body.books" but found with length "1""#
        );
        assert_eq!(
            check(
                json!({"books": [{"title": "x", "pages": 10}, {"title": "y", "pages": "20"}]}),
                expected.clone(),
                &table
            ),
            r#"Json doesn't have type "number" at "$.body.books[*].pages" but found "string""#
        );
        assert_eq!(
            check(json!({"books": [{"title": "x"}, {"title": "y"}]}), expected.clone(), &table),
            r#"Json doesn't have "pages" at "$.body.books[*]""#
        );
        assert_eq!(
            check(json!({"books": {"title": "x"}}), expected, &table),
            r#"Json doesn't have type "array" at "$.body.books" but found "object""#
        );
    }

    #[test]
    fn test_min_rule_on_primitives() {
        let table = rules(&[
            ("$.body.tags", MatchingRule::min(1)),
            ("$.body.tags[*]", MatchingRule::by_type()),
        ]);
        assert_eq!(check(json!({"tags": ["a", "b", "c"]}), json!({"tags": ["x"]}), &table), "");
        assert_eq!(
            check(json!({"tags": ["a", 2]}), json!({"tags": ["x"]}), &table),
            r#"Json doesn't have type "string" at "$.body.tags[*]" but found "number""#
        );
    }

    #[test]
    fn test_strict_mode() {
        let none = MatchingRules::new();
        let strict = MatchOptions::new().strict(true);

        let outcome = match_json(&json!({"a": 1, "b": 2}), &json!({"a": 1}), &none, &strict).unwrap();
        assert_eq!(outcome.message(), Some(r#"Json has unexpected "b" at "$.body""#));

        let outcome = match_json(
            &json!({"a": {"c": 1, "d": 2}}),
            &json!({"a": {"c": 1}}),
            &none,
            &strict,
        )
        .unwrap();
        assert_eq!(outcome.message(), Some(r#"Json has unexpected "d" at "$.body.a""#));

        let masked = rules(&[("$.body.a", MatchingRule::by_regex("."))]);
        let outcome = match_json(
            &json!({"a": {"c": 1, "d": 2}}),
            &json!({"a": {"c": 1}}),
            &masked,
            &strict,
        )
        .unwrap();
        assert!(outcome.is_equal());
    }

    #[test]
    fn test_custom_target_and_path() {
        let table = rules(&[("$.headers.x-id", MatchingRule::by_type())]);
        let options = MatchOptions::new().target("Header").path("$.headers");
        let outcome = match_json(
            &json!({"x-id": "1", "host": "a"}),
            &json!({"x-id": "2", "host": "b"}),
            &table,
            &options,
        )
        .unwrap();
        assert_eq!(
            outcome.message(),
            Some(r#"Header doesn't have value "b" at "$.headers.host" but found "a""#)
        );
    }

    #[test]
    fn test_rule_deserialization() {
        let table: MatchingRules = serde_json::from_value(json!({
            "$.body.id": {"match": "type"},
            "$.body.name": {"match": "regex", "regex": "^a"},
            "$.body.items": {"min": 1}
        }))
        .unwrap();
        assert_eq!(table["$.body.id"], MatchingRule::by_type());
        assert_eq!(table["$.body.name"], MatchingRule::by_regex("^a"));
        assert_eq!(table["$.body.items"], MatchingRule::min(1));
        assert_eq!(
            serde_json::to_value(MatchingRule::min(2)).unwrap(),
            json!({"min": 2})
        );
    }
}
