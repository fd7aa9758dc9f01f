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

//! "Like" comparison: the actual value has to contain the expected template.
//!
//! Objects match when every expected key is present and matches; extra
//! actual keys are ignored. Arrays match when every expected element can be
//! paired with a distinct actual element, in any order. Expected strings may
//! carry an expression (`$V > 1`) or name a registered assertion handler
//! (`#isEmail`), and expected regexes are tested against the actual value.
//! The first mismatch found stops the comparison.

use serde_json::Value;
use tracing::{debug, trace};

use super::misc::{numbers_eq, render, type_of};
use super::path::Location;
use super::{Expected, NumericMode, Outcome};
use crate::context::Context;
use crate::expression;
use crate::handlers::AssertContext;

/// Per-call options for [`like`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeOptions {
    pub(crate) target: String,
    pub(crate) root_path: String,
    pub(crate) numeric_mode: NumericMode,
}

impl LikeOptions {
    /// Target `Json`, root `$`, numbers compared as floats.
    pub fn new() -> Self {
        Self {
            target: "Json".to_string(),
            root_path: "$".to_string(),
            numeric_mode: NumericMode::AssumeFloat,
        }
    }

    /// Names what is being compared in messages, e.g. `Cookie`.
    pub fn target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    /// Root of the expected-side paths in messages. The actual side is
    /// always rooted at `$`, so the unmatched array element message
    /// (`doesn't have expected value at '$[1]'`) keeps the `$` root.
    pub fn root_path(mut self, root_path: &str) -> Self {
        self.root_path = root_path.to_string();
        self
    }

    pub fn numeric_mode(mut self, numeric_mode: NumericMode) -> Self {
        self.numeric_mode = numeric_mode;
        self
    }
}

impl Default for LikeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that `actual` contains `expected`.
///
/// # Examples
///
/// ```
/// use json_expect::{like, Context, Expected, LikeOptions};
/// use serde_json::json;
///
/// let ctx = Context::new();
/// let outcome = like(&ctx, &json!({"id": 1}), &Expected::from(json!({"id": 2})), &LikeOptions::new());
/// assert_eq!(outcome.message(), Some("Json doesn't have value '2' at '$.id' but found '1'"));
///
/// let outcome = like(&ctx, &json!([1, 2, 3]), &Expected::from(json!([3, 2, 1])), &LikeOptions::new());
/// assert!(outcome.is_equal());
/// ```
pub fn like(ctx: &Context, actual: &Value, expected: &Expected, options: &LikeOptions) -> Outcome {
    trace!(root = %options.root_path, "like comparison");

    let comparer = LikeComparer { ctx, options };
    let result = comparer.compare(
        actual,
        expected,
        &Location::root("$"),
        &Location::root(&options.root_path),
    );

    Outcome::from(result)
}

struct LikeComparer<'a> {
    ctx: &'a Context,
    options: &'a LikeOptions,
}

impl<'a> LikeComparer<'a> {
    fn compare(
        &self,
        actual: &Value,
        expected: &Expected,
        actual_path: &Location,
        expected_path: &Location,
    ) -> Result<(), String> {
        if let Some(verdict) = self.value_compare(actual, expected, expected_path) {
            return verdict;
        }

        match (actual, expected) {
            (Value::Object(_), Expected::Object(entries)) => {
                self.object_compare(actual, entries, actual_path, expected_path)
            }
            (Value::Array(items), Expected::Array(templates)) => {
                self.array_compare(items, templates, actual_path, expected_path)
            }
            _ => Ok(()),
        }
    }

    /// Settles everything except two objects or two arrays. `None` means
    /// the structures have to be walked.
    fn value_compare(
        &self,
        actual: &Value,
        expected: &Expected,
        path: &Location,
    ) -> Option<Result<(), String>> {
        let target = &self.options.target;

        if self.identical(actual, expected) {
            return Some(Ok(()));
        }

        if let Expected::Regex(re) = expected {
            let found = render(actual);
            if re.is_match(&found) {
                return Some(Ok(()));
            }
            return Some(Err(format!(
                "{} doesn't match with '{}' at '{}' but found '{}'",
                target,
                re.as_str(),
                path,
                found
            )));
        }

        if let Expected::String(template) = expected {
            if let Some(verdict) = self.expression_compare(actual, template, path) {
                return Some(verdict);
            }
            if let Some(verdict) = self.assertion_compare(actual, template, path) {
                return Some(verdict);
            }
        }

        let (actual_type, expected_type) = (type_of(actual), expected.type_of());
        if actual_type != expected_type {
            return Some(Err(format!(
                "{} doesn't have type '{}' at '{}' but found '{}'",
                target, expected_type, path, actual_type
            )));
        }

        if expected_type != "object" || actual.is_null() || matches!(expected, Expected::Null) {
            return Some(Err(format!(
                "{} doesn't have value '{}' at '{}' but found '{}'",
                target,
                render(&expected.to_json()),
                path,
                render(actual)
            )));
        }

        match (actual, expected) {
            (Value::Array(_), Expected::Array(_)) | (Value::Object(_), Expected::Object(_)) => None,
            (_, Expected::Array(_)) => Some(Err(format!(
                "{} doesn't have type 'array' at '{}' but found 'object'",
                target, path
            ))),
            _ => Some(Err(format!(
                "{} doesn't have type 'object' at '{}' but found 'array'",
                target, path
            ))),
        }
    }

    fn identical(&self, actual: &Value, expected: &Expected) -> bool {
        match (actual, expected) {
            (Value::Null, Expected::Null) => true,
            (Value::Bool(a), Expected::Bool(b)) => a == b,
            (Value::String(a), Expected::String(b)) => a == b,
            (Value::Number(_), Expected::Number(b)) => {
                numbers_eq(actual, &Value::Number(b.clone()), self.options.numeric_mode)
            }
            _ => false,
        }
    }

    fn expression_compare(
        &self,
        actual: &Value,
        template: &str,
        path: &Location,
    ) -> Option<Result<(), String>> {
        let strategy = &self.ctx.settings().assert.expression;
        let placeholder = strategy.includes.as_deref()?;
        if !strategy.matches(template) {
            return None;
        }

        match expression::evaluate(template, placeholder, actual) {
            Ok(true) => Some(Ok(())),
            Ok(false) => Some(Err(format!(
                "{} doesn't fulfil expression '{}'. Actual value found: {}",
                self.options.target,
                template.replace(placeholder, path.as_str()),
                render(actual)
            ))),
            Err(err) => {
                debug!(expression = template, error = %err, "not evaluable, comparing as a value");
                None
            }
        }
    }

    fn assertion_compare(
        &self,
        actual: &Value,
        template: &str,
        path: &Location,
    ) -> Option<Result<(), String>> {
        let strategy = &self.ctx.settings().assert.handler;
        if !strategy.matches(template) {
            return None;
        }

        let (name, args): (&str, Vec<String>) = match strategy.strip(template).split_once(':') {
            Some((name, args)) => (name, args.split(',').map(str::to_string).collect()),
            None => (strategy.strip(template), vec![]),
        };

        let handler = match self.ctx.handlers().assert_handler(name) {
            Ok(handler) => handler,
            Err(err) => {
                debug!(error = %err, "comparing '{}' as a value", template);
                return None;
            }
        };

        match handler(&AssertContext { data: actual, args: &args }) {
            Ok(true) => Some(Ok(())),
            Ok(false) => Some(Err(format!(
                "{} doesn't fulfil assertion '{}' at '{}'",
                self.options.target, template, path
            ))),
            Err(err) => {
                debug!(handler = name, error = %err, "assert handler failed, comparing as a value");
                None
            }
        }
    }

    fn object_compare(
        &self,
        actual: &Value,
        entries: &[(String, Expected)],
        actual_path: &Location,
        expected_path: &Location,
    ) -> Result<(), String> {
        for (key, expected) in entries {
            let Some(actual) = actual.get(key) else {
                return Err(format!(
                    "{} doesn't have property '{}' at '{}'",
                    self.options.target, key, expected_path
                ));
            };

            self.compare(
                actual,
                expected,
                &actual_path.field(key),
                &expected_path.field(key),
            )?;
        }

        Ok(())
    }

    /// Pairs each expected element with a distinct actual element: the one at
    /// the same position when it matches, otherwise the first unpaired one
    /// after it, then before it.
    fn array_compare(
        &self,
        actual: &[Value],
        expected: &[Expected],
        actual_path: &Location,
        expected_path: &Location,
    ) -> Result<(), String> {
        if expected.len() > actual.len() {
            return Err(format!(
                "{} doesn't have 'array' with length '{}' at '{}' but found 'array' with length '{}'",
                self.options.target,
                expected.len(),
                expected_path,
                actual.len()
            ));
        }

        let mut seen = vec![false; actual.len()];

        for (i, template) in expected.iter().enumerate() {
            let element_path = expected_path.index(i);

            let failure = if seen[i] {
                format!(
                    "{} doesn't have expected value at '{}'",
                    self.options.target,
                    actual_path.index(i)
                )
            } else {
                match self.compare(&actual[i], template, &actual_path.index(i), &element_path) {
                    Ok(()) => {
                        seen[i] = true;
                        continue;
                    }
                    Err(message) => message,
                }
            };

            let candidates = (i + 1..actual.len()).chain(0..i);
            let mut found = None;
            for j in candidates {
                if seen[j] {
                    continue;
                }
                if self
                    .compare(&actual[j], template, &actual_path.index(j), &element_path)
                    .is_ok()
                {
                    found = Some(j);
                    break;
                }
            }

            match found {
                Some(j) => seen[j] = true,
                None => return Err(failure),
            }
        }

        Ok(())
    }
}
