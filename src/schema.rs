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

//! JSON Schema validation of a response or a sub-tree of it.

use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};

/// Which JSON Schema draft to compile the schema with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaDraft {
    /// Taken from the schema's `$schema` keyword, 2020-12 when absent.
    #[default]
    Auto,
    Draft4,
    Draft6,
    Draft7,
    Draft201909,
    Draft202012,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub(crate) draft: SchemaDraft,
}

impl SchemaOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(mut self, draft: SchemaDraft) -> Self {
        self.draft = draft;
        self
    }
}

/// One reason the target does not conform to the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer into the target, e.g. `/items/0/id`.
    pub instance_path: String,
    /// JSON pointer to the failing schema keyword.
    pub schema_path: String,
    pub message: String,
}

/// Validates `target` against `schema`.
///
/// Returns `None` when the target conforms, otherwise every violation
/// found. A schema that does not compile is an [`Error::InvalidSchema`].
///
/// # Examples
///
/// ```
/// use json_expect::schema::{validate, SchemaOptions};
/// use serde_json::json;
///
/// let schema = json!({"type": "object", "required": ["id"]});
/// assert_eq!(validate(&schema, &json!({"id": 1}), &SchemaOptions::new()).unwrap(), None);
/// assert!(validate(&schema, &json!({}), &SchemaOptions::new()).unwrap().is_some());
/// ```
pub fn validate(
    schema: &Value,
    target: &Value,
    options: &SchemaOptions,
) -> Result<Option<Vec<Violation>>> {
    trace!(draft = ?options.draft, "schema validation");

    let validator = compile(schema, options.draft)?;
    let violations: Vec<Violation> = validator
        .iter_errors(target)
        .map(|error| Violation {
            instance_path: error.instance_path.to_string(),
            schema_path: error.schema_path.to_string(),
            message: error.to_string(),
        })
        .collect();

    if violations.is_empty() {
        return Ok(None);
    }

    debug!(violations = violations.len(), "target does not conform to schema");
    Ok(Some(violations))
}

fn compile(schema: &Value, draft: SchemaDraft) -> Result<Validator> {
    let invalid = |e: jsonschema::ValidationError<'_>| Error::InvalidSchema(e.to_string());

    let draft = match draft {
        SchemaDraft::Auto => return jsonschema::validator_for(schema).map_err(invalid),
        SchemaDraft::Draft202012 => return jsonschema::draft202012::new(schema).map_err(invalid),
        SchemaDraft::Draft4 => Draft::Draft4,
        SchemaDraft::Draft6 => Draft::Draft6,
        SchemaDraft::Draft7 => Draft::Draft7,
        SchemaDraft::Draft201909 => Draft::Draft201909,
    };

    jsonschema::options()
        .with_draft(draft)
        .build(schema)
        .map_err(invalid)
}
