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

//! Errors raised on misuse of the comparison engine.
//!
//! A structural mismatch between an actual and an expected value is not an
//! error: comparators report it as data through [`crate::Outcome`]. The
//! variants below abort a comparison because the caller supplied something
//! that cannot be interpreted.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A handler or settings document could not be accepted.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// No handler is registered under the requested name.
    #[error("{kind} handler '{name}' is not registered")]
    HandlerNotFound { kind: &'static str, name: String },

    /// A matching rule carried a pattern that does not compile.
    #[error("Invalid RegExp provided \"{pattern}\" at \"{path}\"")]
    InvalidRegex { pattern: String, path: String },

    /// The JSON Schema itself is malformed.
    #[error("invalid JSON schema: {0}")]
    InvalidSchema(String),

    /// A JSON path string could not be parsed.
    #[error("invalid JSON path '{0}'")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_regex_message() {
        let err = Error::InvalidRegex {
            pattern: "[a-".to_string(),
            path: "$.body.name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid RegExp provided \"[a-\" at \"$.body.name\""
        );
    }

    #[test]
    fn test_handler_not_found_message() {
        let err = Error::HandlerNotFound {
            kind: "assert",
            name: "isPositive".to_string(),
        };
        assert_eq!(err.to_string(), "assert handler 'isPositive' is not registered");
    }
}
