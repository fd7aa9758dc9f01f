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

use serde_json::Value;

use crate::error::Result;
use crate::handlers::{AssertContext, HandlerError, Handlers};
use crate::json_diff::like::{like, LikeOptions};
use crate::json_diff::{Expected, Outcome};
use crate::settings::Settings;

/// Settings and handlers shared by every comparison that runs against it.
///
/// A context is built once, filled with handlers, and then passed by
/// reference; comparisons never mutate it, so one context can serve
/// concurrent comparisons from several threads.
///
/// # Examples
///
/// ```
/// use json_expect::{Context, Expected};
/// use serde_json::json;
///
/// let mut ctx = Context::new();
/// ctx.add_assert_handler("isEven", |c| Ok(c.data.as_i64().is_some_and(|n| n % 2 == 0)))
///     .unwrap();
///
/// let outcome = ctx.like(&json!({"n": 4}), &Expected::from(json!({"n": "#isEven"})));
/// assert!(outcome.is_equal());
/// ```
#[derive(Debug, Default)]
pub struct Context {
    settings: Settings,
    handlers: Handlers,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_handlers(mut self, handlers: Handlers) -> Self {
        self.handlers = handlers;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn handlers(&self) -> &Handlers {
        &self.handlers
    }

    pub fn handlers_mut(&mut self) -> &mut Handlers {
        &mut self.handlers
    }

    /// Shorthand for [`Handlers::add_assert_handler`].
    pub fn add_assert_handler<F>(&mut self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&AssertContext<'_>) -> std::result::Result<bool, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.handlers.add_assert_handler(name, handler)
    }

    /// Runs [`like`] with default options.
    pub fn like(&self, actual: &Value, expected: &Expected) -> Outcome {
        like(self, actual, expected, &LikeOptions::default())
    }

    pub fn like_with(&self, actual: &Value, expected: &Expected, options: &LikeOptions) -> Outcome {
        like(self, actual, expected, options)
    }
}
