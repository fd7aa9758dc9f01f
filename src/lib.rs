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

#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod context;
mod error;
pub mod expression;
mod handlers;
pub mod json_diff;
pub mod matchers;
pub mod query;
pub mod schema;
mod settings;

pub use context::Context;
pub use error::{Error, Result};
pub use expression::EvalError;
pub use handlers::{AssertContext, AssertHandler, HandlerError, Handlers, Registry};
pub use json_diff::exact::{diff, exact_diff, CompareMode, Config, Difference};
pub use json_diff::like::{like, LikeOptions};
pub use json_diff::path::{JSONPath, Key, Location, Path};
pub use json_diff::rules::{match_json, MatchOptions, MatchingRule, MatchingRules, RuleKind};
pub use json_diff::{Expected, NumericMode, Outcome};
pub use schema::{validate, SchemaDraft, SchemaOptions, Violation};
pub use settings::{AssertSettings, Settings, Strategy};
