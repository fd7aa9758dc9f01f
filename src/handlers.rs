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

//! Named extension points consulted while comparing.
//!
//! Handlers are registered once, before comparisons start, and are looked up
//! by exact name. Registering a name twice replaces the earlier handler.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};

/// What an assertion handler sees: the actual value and the arguments
/// written after the handler name (`#isWithin:1,10` gives `["1", "10"]`).
#[derive(Debug, Clone, Copy)]
pub struct AssertContext<'a> {
    pub data: &'a Value,
    pub args: &'a [String],
}

/// Raised by a handler that cannot judge the value it was given.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

pub type AssertHandler =
    Arc<dyn Fn(&AssertContext<'_>) -> std::result::Result<bool, HandlerError> + Send + Sync>;

/// A name → handler table for one kind of handler.
pub struct Registry<H> {
    kind: &'static str,
    handlers: HashMap<String, H>,
}

impl<H> Registry<H> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            handlers: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn register(&mut self, name: &str, handler: H) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::Configuration(format!(
                "{} handler name must be a non-empty string",
                self.kind
            )));
        }

        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&H> {
        self.handlers.get(name).ok_or_else(|| Error::HandlerNotFound {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names = self.handlers.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

impl<H> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("names", &self.names())
            .finish()
    }
}

/// Every handler registry the comparators consult.
#[derive(Debug)]
pub struct Handlers {
    pub(crate) assert: Registry<AssertHandler>,
}

impl Handlers {
    pub fn new() -> Self {
        Self {
            assert: Registry::new("assert"),
        }
    }

    /// Registers an assertion handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use json_expect::Handlers;
    ///
    /// let mut handlers = Handlers::new();
    /// handlers
    ///     .add_assert_handler("isPositive", |ctx| Ok(ctx.data.as_f64().unwrap_or(0.0) > 0.0))
    ///     .unwrap();
    /// assert!(handlers.assert_handler("isPositive").is_ok());
    /// ```
    pub fn add_assert_handler<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&AssertContext<'_>) -> std::result::Result<bool, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.assert.register(name, Arc::new(handler))
    }

    pub fn assert_handler(&self, name: &str) -> Result<&AssertHandler> {
        self.assert.lookup(name)
    }

    pub fn assert_handlers(&self) -> &Registry<AssertHandler> {
        &self.assert
    }
}

impl Default for Handlers {
    fn default() -> Self {
        Self::new()
    }
}
