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

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Recognition markers that turn an expected string into something special.
///
/// Every configured marker must be present for a string to be recognised:
/// `starts` as a prefix, `ends` as a suffix and `includes` anywhere.
/// A strategy with no markers recognises nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strategy {
    pub starts: Option<String>,
    pub ends: Option<String>,
    pub includes: Option<String>,
}

impl Strategy {
    pub fn starts(marker: impl Into<String>) -> Self {
        Self {
            starts: Some(marker.into()),
            ..Self::default()
        }
    }

    pub fn includes(marker: impl Into<String>) -> Self {
        Self {
            includes: Some(marker.into()),
            ..Self::default()
        }
    }

    /// Adds a suffix marker.
    pub fn ending_with(mut self, marker: impl Into<String>) -> Self {
        self.ends = Some(marker.into());
        self
    }

    pub fn matches(&self, candidate: &str) -> bool {
        if self.starts.is_none() && self.ends.is_none() && self.includes.is_none() {
            return false;
        }

        let starts = self.starts.as_deref().map_or(true, |m| candidate.starts_with(m));
        let ends = self.ends.as_deref().map_or(true, |m| candidate.ends_with(m));
        let includes = self.includes.as_deref().map_or(true, |m| candidate.contains(m));

        starts && ends && includes
    }

    /// Removes the prefix and suffix markers from a recognised string.
    pub fn strip<'a>(&self, candidate: &'a str) -> &'a str {
        let mut stripped = candidate;

        if let Some(starts) = self.starts.as_deref() {
            stripped = stripped.strip_prefix(starts).unwrap_or(stripped);
        }

        if let Some(ends) = self.ends.as_deref() {
            stripped = stripped.strip_suffix(ends).unwrap_or(stripped);
        }

        stripped
    }

    fn validate(&self, name: &str) -> Result<()> {
        let empty = |marker: &Option<String>| marker.as_deref() == Some("");

        if empty(&self.starts) || empty(&self.ends) || empty(&self.includes) {
            return Err(Error::Configuration(format!(
                "{} strategy markers must not be empty",
                name
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertSettings {
    /// Recognises `#handlerName:arg1,arg2` strings.
    pub handler: Strategy,
    /// Recognises `$V > 10` strings.
    pub expression: Strategy,
}

impl Default for AssertSettings {
    fn default() -> Self {
        Self {
            handler: Strategy::starts("#"),
            expression: Strategy::includes("$V"),
        }
    }
}

/// Process-wide comparison settings.
///
/// # Examples
///
/// ```
/// use json_expect::{Settings, Strategy};
///
/// let settings = Settings::default().with_handler_strategy(Strategy::starts("@"));
/// assert!(settings.assert.handler.matches("@isEven"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub assert: AssertSettings,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a JSON document such as
    /// `{"assert": {"handler": {"starts": "#"}, "expression": {"includes": "$V"}}}`.
    ///
    /// Sections left out keep their defaults.
    pub fn from_json(json: &Value) -> Result<Self> {
        if !json.is_object() {
            return Err(Error::Configuration(
                "settings must be an object".to_string(),
            ));
        }

        let settings: Settings = serde_json::from_value(json.clone())
            .map_err(|e| Error::Configuration(e.to_string()))?;
        settings.assert.handler.validate("handler")?;
        settings.assert.expression.validate("expression")?;

        Ok(settings)
    }

    pub fn with_handler_strategy(mut self, strategy: Strategy) -> Self {
        self.assert.handler = strategy;
        self
    }

    pub fn with_expression_strategy(mut self, strategy: Strategy) -> Self {
        self.assert.expression = strategy;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_strategies() {
        let settings = Settings::default();
        assert!(settings.assert.handler.matches("#isPositive"));
        assert!(!settings.assert.handler.matches("isPositive"));
        assert!(settings.assert.expression.matches("$V > 1"));
        assert!(!settings.assert.expression.matches("V > 1"));
    }

    #[test]
    fn test_strategy_strip() {
        let strategy = Strategy::starts("<<").ending_with(">>");
        assert!(strategy.matches("<<isEven>>"));
        assert!(!strategy.matches("<<isEven"));
        assert_eq!(strategy.strip("<<isEven>>"), "isEven");
    }

    #[test]
    fn test_empty_strategy_matches_nothing() {
        assert!(!Strategy::default().matches(""));
        assert!(!Strategy::default().matches("anything"));
    }

    #[test]
    fn test_from_json() {
        let settings = Settings::from_json(&json!({
            "assert": { "handler": { "starts": "@" } }
        }))
        .unwrap();
        assert_eq!(settings.assert.handler, Strategy::starts("@"));
        assert_eq!(settings.assert.expression, Strategy::includes("$V"));

        assert!(Settings::from_json(&json!("nope")).is_err());
        assert!(Settings::from_json(&json!({ "assert": { "handler": 1 } })).is_err());
        assert!(Settings::from_json(&json!({
            "assert": { "expression": { "includes": "" } }
        }))
        .is_err());
    }
}
