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

//! Addressing a sub-tree of a response by JSON path.

use serde_json::Value;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::json_diff::like::{like, LikeOptions};
use crate::json_diff::path::{JSONPath, Key, Path};
use crate::json_diff::{Expected, Outcome};
use crate::schema::{self, SchemaOptions, Violation};

/// Resolves a path made of field and index segments, e.g. `$.items[0].id`.
///
/// An absent node is `None`. Wildcards and ranges address more than one
/// node and are rejected with [`Error::InvalidPath`].
pub fn select<'v>(value: &'v Value, path: &str) -> Result<Option<&'v Value>> {
    let keys = match path.jsonpath()? {
        Path::Root => return Ok(Some(value)),
        Path::Keys(keys) => keys,
    };

    let mut current = value;
    for key in keys {
        let next = match key {
            Key::Field(field) => current.get(field),
            Key::Idx(index) => current.get(index),
            _ => return Err(Error::InvalidPath(path.to_string())),
        };

        match next {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    Ok(Some(current))
}

fn missing(target: &str, query: &str) -> String {
    format!("{} doesn't have a value at '{}'", target, query)
}

/// [`like`] applied to the node at `query`. Expected-side paths in
/// messages are rooted at the query, overriding `options.root_path`; the
/// target and numeric mode of `options` apply as usual.
///
/// ```
/// use json_expect::{query::like_at, Context, Expected, LikeOptions};
/// use serde_json::json;
///
/// let ctx = Context::new();
/// let actual = json!({"data": {"user": {"id": 1}}});
/// let expected = Expected::from(json!({"id": 2}));
///
/// let outcome = like_at(&ctx, &actual, "$.data.user", &expected, &LikeOptions::new()).unwrap();
/// assert_eq!(outcome.message(), Some("Json doesn't have value '2' at '$.data.user.id' but found '1'"));
/// ```
pub fn like_at(
    ctx: &Context,
    actual: &Value,
    query: &str,
    expected: &Expected,
    options: &LikeOptions,
) -> Result<Outcome> {
    let Some(node) = select(actual, query)? else {
        return Ok(Outcome::mismatch(missing(&options.target, query)));
    };

    Ok(like(ctx, node, expected, &options.clone().root_path(query)))
}

/// [`schema::validate`] applied to the node at `query`. A missing node is
/// reported as a single violation naming `target`, e.g. `Json`.
pub fn validate_at(
    schema: &Value,
    actual: &Value,
    query: &str,
    target: &str,
    options: &SchemaOptions,
) -> Result<Option<Vec<Violation>>> {
    let Some(node) = select(actual, query)? else {
        return Ok(Some(vec![Violation {
            instance_path: String::new(),
            schema_path: String::new(),
            message: missing(target, query),
        }]));
    };

    schema::validate(schema, node, options)
}
