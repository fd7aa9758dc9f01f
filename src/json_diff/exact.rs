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

//! Exact comparison reporting every difference between two documents.

use std::fmt;

use serde_json::{Map, Value};
use tracing::trace;

use super::misc::{numbers_eq, Indent};
use super::path::{JSONPath, Key, Path};
use super::NumericMode;
use crate::error::Result;

/// Mode for how JSON values should be compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareMode {
    /// The actual value only has to contain the expected one: extra object
    /// keys and trailing array elements are allowed.
    Inclusive,
    /// The two JSON values must be exactly equal.
    Strict,
}

/// Configuration for how JSON values should be compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config<'a> {
    pub(crate) compare_mode: CompareMode,
    pub(crate) numeric_mode: NumericMode,
    pub(crate) ignore_paths: Vec<Path<'a>>,
}

impl<'a> Config<'a> {
    /// Create a new [`Config`] using the given [`CompareMode`].
    ///
    /// The default `numeric_mode` is [`NumericMode::Strict`].
    pub fn new(compare_mode: CompareMode) -> Self {
        Self {
            compare_mode,
            numeric_mode: NumericMode::Strict,
            ignore_paths: vec![],
        }
    }

    pub fn numeric_mode(mut self, numeric_mode: NumericMode) -> Self {
        self.numeric_mode = numeric_mode;
        self
    }

    pub fn compare_mode(mut self, compare_mode: CompareMode) -> Self {
        self.compare_mode = compare_mode;
        self
    }

    /// Add a path to the list of paths to ignore.
    pub fn ignore_path(mut self, path: Path<'a>) -> Self {
        self.ignore_paths.push(path);
        self
    }

    /// Checks if the given path should be ignored.
    pub fn to_ignore(&self, path: &Path<'a>) -> bool {
        self.ignore_paths.iter().any(|p| p.prefixes(path))
    }
}

/// Walks both documents and collects every difference.
pub fn diff<'a>(actual: &'a Value, expected: &'a Value, config: Config<'a>) -> Vec<Difference<'a>> {
    let mut acc = vec![];
    let mut folder = DiffFolder {
        config: &config,
        acc: &mut acc,
    };
    folder.fold(actual, expected, Path::Root);

    trace!(differences = acc.len(), "exact comparison");
    acc
}

/// [`diff`] with ignore paths given as JSONPath strings such as
/// `$.items[*].id`.
///
/// # Examples
///
/// ```
/// use json_expect::json_diff::exact::{exact_diff, CompareMode};
/// use serde_json::json;
///
/// let actual = json!({"id": 2, "name": "a"});
/// let expected = json!({"id": 1, "name": "a"});
///
/// let diffs = exact_diff(&actual, &expected, CompareMode::Strict, &["$.id"]).unwrap();
/// assert!(diffs.is_empty());
/// ```
pub fn exact_diff<'a>(
    actual: &'a Value,
    expected: &'a Value,
    compare_mode: CompareMode,
    ignore_paths: &[&'a str],
) -> Result<Vec<Difference<'a>>> {
    let mut config = Config::new(compare_mode).numeric_mode(NumericMode::AssumeFloat);
    for path in ignore_paths.iter().copied() {
        config = config.ignore_path(path.jsonpath()?);
    }

    Ok(diff(actual, expected, config))
}

struct DiffFolder<'a, 'b> {
    config: &'b Config<'a>,
    acc: &'b mut Vec<Difference<'a>>,
}

impl<'a, 'b> DiffFolder<'a, 'b> {
    fn push(&mut self, path: Path<'a>, actual: Option<&'a Value>, expected: Option<&'a Value>) {
        if self.config.to_ignore(&path) {
            return;
        }

        self.acc.push(Difference {
            path,
            actual,
            expected,
            compare_mode: self.config.compare_mode,
        });
    }

    fn fold(&mut self, actual: &'a Value, expected: &'a Value, path: Path<'a>) {
        match (actual, expected) {
            (Value::Number(_), Value::Number(_)) => {
                if !numbers_eq(actual, expected, self.config.numeric_mode) {
                    self.push(path, Some(actual), Some(expected));
                }
            }
            (Value::Array(actual), Value::Array(expected)) => {
                self.on_array(actual, expected, path)
            }
            (Value::Object(actual), Value::Object(expected)) => {
                self.on_object(actual, expected, path)
            }
            _ if actual != expected => self.push(path, Some(actual), Some(expected)),
            _ => {}
        }
    }

    fn on_array(&mut self, actual: &'a [Value], expected: &'a [Value], path: Path<'a>) {
        let len = match self.config.compare_mode {
            CompareMode::Inclusive => expected.len(),
            CompareMode::Strict => actual.len().max(expected.len()),
        };

        for idx in 0..len {
            let path = path.append(Key::Idx(idx));

            match (actual.get(idx), expected.get(idx)) {
                (Some(actual), Some(expected)) => self.fold(actual, expected, path),
                (actual, expected) => self.push(path, actual, expected),
            }
        }
    }

    fn on_object(
        &mut self,
        actual: &'a Map<String, Value>,
        expected: &'a Map<String, Value>,
        path: Path<'a>,
    ) {
        for (key, expected) in expected {
            let path = path.append(Key::Field(key));

            match actual.get(key) {
                Some(actual) => self.fold(actual, expected, path),
                None => self.push(path, None, Some(expected)),
            }
        }

        if self.config.compare_mode == CompareMode::Strict {
            for (key, actual) in actual {
                if !expected.contains_key(key) {
                    self.push(path.append(Key::Field(key)), Some(actual), None);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Difference<'a> {
    path: Path<'a>,
    actual: Option<&'a Value>,
    expected: Option<&'a Value>,
    compare_mode: CompareMode,
}

impl<'a> Difference<'a> {
    pub fn path(&self) -> &Path<'a> {
        &self.path
    }

    /// `None` when the node is missing from the actual document.
    pub fn actual(&self) -> Option<&'a Value> {
        self.actual
    }

    /// `None` when the node only exists in the actual document.
    pub fn expected(&self) -> Option<&'a Value> {
        self.expected
    }
}

impl<'a> fmt::Display for Difference<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let json_to_string =
            |json: &Value| serde_json::to_string_pretty(json).map_err(|_| fmt::Error);

        match (self.actual, self.expected) {
            (Some(actual), Some(expected)) => {
                writeln!(f, "json atoms at path \"{}\" are not equal:", self.path)?;
                writeln!(f, "    expected:")?;
                writeln!(f, "{}", json_to_string(expected)?.indent(8))?;
                writeln!(f, "    actual:")?;
                write!(f, "{}", json_to_string(actual)?.indent(8))
            }
            (None, Some(_)) => write!(
                f,
                "json atom at path \"{}\" is missing from actual",
                self.path
            ),
            (Some(_), None) => write!(
                f,
                "json atom at path \"{}\" is not expected ({:?} comparison)",
                self.path, self.compare_mode
            ),
            (None, None) => write!(f, "json atom at path \"{}\" is missing", self.path),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn load_json_from_file(file_path: &str) -> Value {
        let data = fs::read_to_string(file_path).expect("Unable to read file");
        serde_json::from_str(&data).expect("Unable to parse file")
    }

    fn count(actual: Value, expected: Value, config: Config) -> usize {
        diff(&actual, &expected, config).len()
    }

    #[test]
    fn test_diffing_leaf_json() {
        let inclusive = || Config::new(CompareMode::Inclusive);

        assert_eq!(count(json!(null), json!(null), inclusive()), 0);
        assert_eq!(count(json!(true), json!(true), inclusive()), 0);
        assert_eq!(count(json!(false), json!(true), inclusive()), 1);
        assert_eq!(count(json!("a"), json!("a"), inclusive()), 0);
        assert_eq!(count(json!("a"), json!("b"), inclusive()), 1);
        assert_eq!(count(json!(1), json!(1), inclusive()), 0);
        assert_eq!(count(json!(2), json!(1), inclusive()), 1);
        assert_eq!(count(json!(1.0), json!(1.0), inclusive()), 0);
        assert_eq!(count(json!(1), json!(1.0), inclusive()), 1);
        assert_eq!(count(json!(1), json!("1"), inclusive()), 1);
        assert_eq!(
            count(
                json!(1),
                json!(1.0),
                inclusive().numeric_mode(NumericMode::AssumeFloat)
            ),
            0
        );
        assert_eq!(
            count(
                json!(1.0),
                json!(1),
                inclusive().numeric_mode(NumericMode::AssumeFloat)
            ),
            0
        );
    }

    #[test]
    fn test_diffing_array() {
        let inclusive = || Config::new(CompareMode::Inclusive);

        assert_eq!(count(json!([]), json!([]), inclusive()), 0);
        assert_eq!(count(json!([1]), json!([]), inclusive()), 0);
        assert_eq!(count(json!([]), json!([1]), inclusive()), 1);
        assert_eq!(count(json!([1, 2]), json!([1]), inclusive()), 0);
        assert_eq!(count(json!([1]), json!([1, 2]), inclusive()), 1);
        assert_eq!(count(json!([1, 3]), json!([1, 2]), inclusive()), 1);
        assert_eq!(count(json!(1), json!([1]), inclusive()), 1);
        assert_eq!(count(json!([1]), json!(1), inclusive()), 1);
    }

    #[test]
    fn test_array_strict() {
        let strict = || Config::new(CompareMode::Strict);

        assert_eq!(count(json!([]), json!([]), strict()), 0);
        assert_eq!(count(json!([1, 2]), json!([1, 2]), strict()), 0);
        assert_eq!(count(json!([1]), json!([1, 2]), strict()), 1);
        assert_eq!(count(json!([1, 2]), json!([1]), strict()), 1);
        assert_eq!(count(json!([2, 1]), json!([1, 2]), strict()), 2);
    }

    #[test]
    fn test_object() {
        let inclusive = || Config::new(CompareMode::Inclusive);

        assert_eq!(count(json!({}), json!({}), inclusive()), 0);
        assert_eq!(count(json!({"a": 1, "b": 123}), json!({"a": 1}), inclusive()), 0);
        assert_eq!(count(json!({"a": 1}), json!({"b": 1}), inclusive()), 1);
        assert_eq!(count(json!({"a": 1}), json!({"a": 2}), inclusive()), 1);
        assert_eq!(count(json!({"a": {"b": true}}), json!({"a": {}}), inclusive()), 0);
    }

    #[test]
    fn test_object_strict() {
        let strict = || Config::new(CompareMode::Strict);

        assert_eq!(count(json!({}), json!({"a": 1}), strict()), 1);
        assert_eq!(count(json!({"a": 1}), json!({}), strict()), 1);
        assert_eq!(count(json!({"a": 1}), json!({"a": 1}), strict()), 0);
        assert_eq!(count(json!({"a": 1}), json!({"b": 1}), strict()), 2);
    }

    #[test]
    fn test_missing_value_points_at_the_expected_node() {
        let actual = json!({"a": 1});
        let expected = json!({"a": 1, "b": {"c": 2}});
        let diffs = diff(&actual, &expected, Config::new(CompareMode::Inclusive));

        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path().to_string(), "$.b");
        assert_eq!(diffs[0].actual(), None);
        assert_eq!(diffs[0].expected(), Some(&json!({"c": 2})));
        assert_eq!(
            diffs[0].to_string(),
            "json atom at path \"$.b\" is missing from actual"
        );
    }

    #[test]
    fn test_display() {
        let actual = json!({"a": [1, 2]});
        let expected = json!({"a": [1, 3], "b": true});

        let diffs = diff(&actual, &expected, Config::new(CompareMode::Strict));
        let rendered: Vec<String> = diffs.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "json atoms at path \"$.a[1]\" are not equal:\n    expected:\n        3\n    actual:\n        2"
                    .to_string(),
                "json atom at path \"$.b\" is missing from actual".to_string(),
            ]
        );

        let diffs = diff(&expected, &actual, Config::new(CompareMode::Strict));
        assert_eq!(
            diffs[1].to_string(),
            "json atom at path \"$.b\" is not expected (Strict comparison)"
        );
    }

    #[test]
    fn test_object_deep_path() {
        let lhs = json!({ "a": { "b": [{"c": 0}, { "c": 1 }] } });
        let rhs = json!({ "a": { "b": [{"c": 0}, { "c": 2 }] } });
        let config = Config::new(CompareMode::Strict).ignore_path("$.a.b[*].c".jsonpath().unwrap());
        assert_eq!(diff(&lhs, &rhs, config).len(), 0);

        let lhs = json!({ "a": { "b": { "d": { "e": 3 } } } });
        let rhs = json!({ "a": { "b": { "d": { "e": 4 } } } });
        let config = Config::new(CompareMode::Strict).ignore_path("$.a.b.d.e".jsonpath().unwrap());
        assert_eq!(diff(&lhs, &rhs, config).len(), 0);

        let lhs = json!({ "a": { "b": [{ "d": [1, 2, 3] }] } });
        let rhs = json!({ "a": { "b": [{ "d": [1, 2, 4] }] } });
        let config = Config::new(CompareMode::Strict).ignore_path("$.a.b[*].d[*]".jsonpath().unwrap());
        assert_eq!(diff(&lhs, &rhs, config).len(), 0);

        let lhs = json!({ "a": [1, 2, 3, 4] });
        let rhs = json!({ "a": [1, 0, 0, 4] });
        let config = Config::new(CompareMode::Strict).ignore_path("$.a[1:3]".jsonpath().unwrap());
        assert_eq!(diff(&lhs, &rhs, config).len(), 0);

        let lhs = json!({ "a": { "x": 1, "y": 2, "z": 3 } });
        let rhs = json!({ "a": { "x": 1, "y": 3, "z": 3 } });
        let config = Config::new(CompareMode::Strict)
            .ignore_path("$.a.x".jsonpath().unwrap())
            .ignore_path("$.a.y".jsonpath().unwrap());
        assert_eq!(diff(&lhs, &rhs, config).len(), 0);

        let lhs = json!({ "a": { "b": 1, "c": 2 } });
        let rhs = json!({ "a": { "b": 1, "c": 3 } });
        let config = Config::new(CompareMode::Strict).ignore_path("$.a.d".jsonpath().unwrap());
        assert_ne!(diff(&lhs, &rhs, config).len(), 0);
    }

    #[test]
    fn test_exact_diff_rejects_bad_paths() {
        let value = json!({});
        let err = exact_diff(&value, &value, CompareMode::Strict, &["a.b"]).unwrap_err();
        assert_eq!(err.to_string(), "invalid JSON path 'a.b'");
    }

    #[test]
    fn test_complex_jsons() {
        let actual = load_json_from_file("tests/data/actual.json");
        let expected = load_json_from_file("tests/data/expected.json");

        let diffs = diff(&actual, &expected, Config::new(CompareMode::Inclusive));
        assert_eq!(diffs.len(), 6);

        let diffs = diff(&actual, &expected, Config::new(CompareMode::Strict));
        assert_eq!(diffs.len(), 7);

        let diffs = exact_diff(&actual, &expected, CompareMode::Strict, &["$.user.name"]).unwrap();
        assert_eq!(diffs.len(), 6);

        let diffs = exact_diff(
            &actual,
            &expected,
            CompareMode::Strict,
            &["$.user.name", "$.user.profile.age"],
        )
        .unwrap();
        assert_eq!(diffs.len(), 5);

        let diffs = exact_diff(
            &actual,
            &expected,
            CompareMode::Strict,
            &["$.user.name", "$.user.profile.age", "$.user.comments[*].timestamp"],
        )
        .unwrap();
        assert_eq!(diffs.len(), 3);

        let diffs = exact_diff(
            &actual,
            &expected,
            CompareMode::Strict,
            &["$.user.name", "$.user.profile.age", "$.user.comments[*].*"],
        )
        .unwrap();
        for diff in &diffs {
            assert!(!diff.path().to_string().starts_with("$.user.comments"));
        }
        assert_eq!(diffs.len(), 2);
    }
}
