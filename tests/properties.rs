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

//! Property-based tests for the comparators.
//!
//! Properties under test:
//! 1. reflexivity: every comparator accepts `compare(x, x)`
//! 2. subset tolerance: `like` accepts an expected value made by deleting
//!    object keys from the actual one
//! 3. order independence: `like` accepts any permutation of an array of
//!    distinct scalars

use json_expect::{
    diff, like, match_json, CompareMode, Config, Context, Expected, LikeOptions, MatchOptions,
    MatchingRules, NumericMode,
};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Arbitrary JSON without handler or expression markers in its strings.
fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        "[a-z ]{0,8}".prop_map(Value::String),
    ];

    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            proptest::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Copies `value`, leaving out each object key for which `drops` yields
/// `true`.
fn prune(value: &Value, drops: &mut dyn Iterator<Item = bool>) -> Value {
    match value {
        Value::Object(map) => {
            let mut kept = serde_json::Map::new();
            for (key, child) in map {
                if drops.next().unwrap_or(false) {
                    continue;
                }
                kept.insert(key.clone(), prune(child, drops));
            }
            Value::Object(kept)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| prune(item, drops)).collect()),
        other => other.clone(),
    }
}

fn distinct_scalars() -> impl Strategy<Value = (Vec<Value>, Vec<Value>)> {
    let numbers = proptest::collection::btree_set(-1000i64..1000, 0..12)
        .prop_map(|set| set.into_iter().map(Value::from).collect::<Vec<_>>());
    let strings = proptest::collection::btree_set("[a-z]{1,5}", 0..12)
        .prop_map(|set| set.into_iter().map(Value::from).collect::<Vec<_>>());

    prop_oneof![numbers, strings]
        .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, ..Default::default() })]

    #[test]
    fn like_is_reflexive(value in arb_json()) {
        let ctx = Context::new();
        let expected = Expected::from(&value);

        let outcome = like(&ctx, &value, &expected, &LikeOptions::new());
        prop_assert_eq!(outcome.message(), None);

        let outcome = like(
            &ctx,
            &value,
            &expected,
            &LikeOptions::new().numeric_mode(NumericMode::Strict),
        );
        prop_assert_eq!(outcome.message(), None);
    }

    #[test]
    fn match_is_reflexive(value in arb_json(), strict in any::<bool>()) {
        let outcome = match_json(
            &value,
            &value,
            &MatchingRules::new(),
            &MatchOptions::new().strict(strict),
        )
        .unwrap();
        prop_assert_eq!(outcome.message(), None);
    }

    #[test]
    fn exact_is_reflexive(value in arb_json()) {
        prop_assert!(diff(&value, &value, Config::new(CompareMode::Strict)).is_empty());
    }

    #[test]
    fn like_tolerates_missing_keys(
        value in arb_json(),
        mask in proptest::collection::vec(any::<bool>(), 0..32),
    ) {
        let expected = prune(&value, &mut mask.into_iter());
        let outcome = like(&Context::new(), &value, &Expected::from(expected), &LikeOptions::new());
        prop_assert_eq!(outcome.message(), None);
    }

    #[test]
    fn like_ignores_scalar_order((items, shuffled) in distinct_scalars()) {
        let outcome = like(
            &Context::new(),
            &Value::Array(items),
            &Expected::from(Value::Array(shuffled)),
            &LikeOptions::new(),
        );
        prop_assert_eq!(outcome.message(), None);
    }
}
