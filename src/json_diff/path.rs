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

use regex::Regex;
use std::fmt;

use crate::error::{Error, Result};

/// A parsed JSON path pattern, used to select sub-values and to ignore
/// parts of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Path<'a> {
    Root,
    Keys(Vec<Key<'a>>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key<'a> {
    Idx(usize),
    IdxRange(usize, usize),
    IdxRangeStart(usize),
    IdxRangeEnd(usize),
    Wildcard,
    WildcardArray,
    Field(&'a str),
}

// FromStr cannot borrow from its input, hence the extension trait.
pub trait JSONPath {
    fn jsonpath(&self) -> Result<Path<'_>>;
}

impl JSONPath for str {
    fn jsonpath(&self) -> Result<Path<'_>> {
        Path::from_jsonpath(self)
    }
}

impl<'a> fmt::Display for Key<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Idx(idx) => write!(f, "[{}]", idx),
            Key::Field(key) => write!(f, ".{}", key),
            Key::IdxRange(start, end) => write!(f, "[{}:{}]", start, end),
            Key::IdxRangeStart(start) => write!(f, "[{}:]", start),
            Key::IdxRangeEnd(end) => write!(f, "[:{}]", end),
            Key::Wildcard => write!(f, ".*"),
            Key::WildcardArray => write!(f, "[*]"),
        }
    }
}

impl<'a> Path<'a> {
    pub(crate) fn append(&self, next: Key<'a>) -> Path<'a> {
        match self {
            Path::Root => Path::Keys(vec![next]),
            Path::Keys(list) => {
                let mut copy = list.clone();
                copy.push(next);
                Path::Keys(copy)
            }
        }
    }

    /// Whether `self`, read as a pattern, covers `other` or one of its
    /// ancestors.
    pub(crate) fn prefixes(&self, other: &Path) -> bool {
        match (self, other) {
            (Path::Root, _) => true,
            (Path::Keys(_), Path::Root) => false,
            (Path::Keys(pattern), Path::Keys(concrete)) => {
                if pattern.len() > concrete.len() {
                    return false;
                }

                pattern
                    .iter()
                    .zip(concrete.iter())
                    .all(|(pattern, concrete)| match (pattern, concrete) {
                        _ if pattern == concrete => true,
                        (Key::Wildcard, Key::Field(_)) => true,
                        (Key::WildcardArray, Key::Idx(_)) => true,
                        (Key::IdxRange(a, b), Key::Idx(c)) => a <= c && c < b,
                        (Key::IdxRangeStart(a), Key::Idx(b)) => a <= b,
                        (Key::IdxRangeEnd(a), Key::Idx(b)) => b < a,
                        _ => false,
                    })
            }
        }
    }

    pub fn from_jsonpath(jsonpath: &'a str) -> Result<Self> {
        let re = Regex::new(
            r"^\$\.?(([a-zA-Z_][a-zA-Z0-9_]*)*(\[\d+\]|\[\d*:\d*\]|(\[\*\]))?)(\.((([a-zA-Z_][a-zA-Z0-9_]*)(\[\d+\]|\[\d*:\d*\]|(\[\*\]))?)|\*))*$",
        )
        .map_err(|e| Error::InvalidPath(e.to_string()))?;

        if !re.is_match(jsonpath) {
            return Err(Error::InvalidPath(jsonpath.to_string()));
        }

        if jsonpath == "$" {
            return Ok(Path::Root);
        }

        let mut keys = Vec::new();

        for segment in jsonpath
            .trim_start_matches('$')
            .split(|c| c == '.' || c == '[')
            .skip(1)
        {
            keys.push(Self::parse_token(segment, jsonpath)?);
        }

        Ok(Path::Keys(keys))
    }

    fn parse_token(token: &'a str, jsonpath: &str) -> Result<Key<'a>> {
        let invalid = |_| Error::InvalidPath(jsonpath.to_string());
        let (token, from_array) = match token.strip_suffix(']') {
            Some(inner) => (inner, true),
            None => (token, false),
        };

        if token == "*" || token == ":" {
            return Ok(if from_array {
                Key::WildcardArray
            } else {
                Key::Wildcard
            });
        }

        if !from_array {
            return Ok(Key::Field(token));
        }

        match token.split_once(':') {
            Some(("", end)) => Ok(Key::IdxRangeEnd(end.parse().map_err(invalid)?)),
            Some((start, "")) => Ok(Key::IdxRangeStart(start.parse().map_err(invalid)?)),
            Some((start, end)) => Ok(Key::IdxRange(
                start.parse().map_err(invalid)?,
                end.parse().map_err(invalid)?,
            )),
            None => Ok(Key::Idx(token.parse().map_err(invalid)?)),
        }
    }
}

impl<'a> fmt::Display for Path<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "$")?;
        if let Path::Keys(keys) = self {
            for key in keys {
                write!(f, "{}", key)?;
            }
        }
        Ok(())
    }
}

/// The address of a node as shown in failure messages, e.g. `$.items[2].id`.
///
/// Built by appending `.key` and `[index]` segments to a root marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    pub fn root(marker: &str) -> Self {
        Self(marker.to_string())
    }

    pub fn field(&self, key: &str) -> Self {
        Self(format!("{}.{}", self.0, key))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    /// Every element of the array at this location: `[*]`.
    pub fn each(&self) -> Self {
        Self(format!("{}[*]", self.0))
    }

    /// Every property of the object at this location: `.*`.
    pub fn any_field(&self) -> Self {
        Self(format!("{}.*", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
