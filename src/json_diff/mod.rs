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

//! The comparison engine.
//!
//! Three comparators share the helpers in this module:
//!
//! * [`exact`] reports every difference between two documents, optionally
//!   ignoring paths;
//! * [`like`] checks that the actual value contains an expected template,
//!   matching arrays without regard to order;
//! * [`rules`] compares positionally but lets a table of matching rules
//!   relax the comparison at specific paths.

pub mod exact;
mod expected;
pub mod like;
mod misc;
pub mod path;
pub mod rules;

use std::fmt;

pub use expected::Expected;

/// How numbers are compared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NumericMode {
    /// Integers and floats are different values (`1` is not `1.0`).
    Strict,
    /// All numbers are converted to float before comparison.
    AssumeFloat,
}

/// Result of a comparison: equal, or the first mismatch found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    message: Option<String>,
}

impl Outcome {
    pub fn equal() -> Self {
        Self { message: None }
    }

    pub fn mismatch(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn is_equal(&self) -> bool {
        self.message.is_none()
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The message, or an empty string on success.
    pub fn message_or_empty(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    pub fn into_result(self) -> Result<(), String> {
        match self.message {
            None => Ok(()),
            Some(message) => Err(message),
        }
    }
}

impl From<Result<(), String>> for Outcome {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Outcome::equal(),
            Err(message) => Outcome::mismatch(message),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            None => write!(f, "equal"),
            Some(message) => write!(f, "{}", message),
        }
    }
}
