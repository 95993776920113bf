//! Transformation module.
//!
//! Groups flat records into a [`Nested`] tree:
//! - Iterative: one pass per record, descending with a cursor
//! - Recursive: one grouping pass per level, recursing into each group
//!
//! Both strategies share the [`transform`] contract and produce the same
//! tree for the same input.

pub mod iterative;
pub mod recursive;

use crate::error::{NestError, NestResult};
use crate::models::{FlatRecord, GroupKey, Nested, NestingLevels};

/// Grouping strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Iterative,
    Recursive,
}

impl Strategy {
    /// `true` selects the recursive strategy, `false` the iterative one.
    pub fn select(recursive: bool) -> Self {
        if recursive {
            Self::Recursive
        } else {
            Self::Iterative
        }
    }

    /// Group `records` by `levels` with this strategy.
    pub fn nest(self, levels: &NestingLevels, records: Vec<FlatRecord>) -> NestResult<Nested> {
        tracing::debug!(
            strategy = ?self,
            levels = levels.len(),
            records = records.len(),
            "nesting flat records"
        );
        match self {
            Self::Iterative => iterative::nest(levels, records),
            Self::Recursive => recursive::nest(levels, records),
        }
    }
}

/// Transform flat records into a nested tree.
///
/// Fails with [`NestError::EmptyNestingLevels`] before looking at `records`
/// when `levels` is empty, and with [`NestError::MissingField`] when a record
/// lacks a requested level. Records are consumed: grouping fields are
/// removed from them and they end up in the leaves.
pub fn transform(
    strategy: Strategy,
    levels: Vec<String>,
    records: Vec<FlatRecord>,
) -> NestResult<Nested> {
    let levels = NestingLevels::new(levels)?;
    strategy.nest(&levels, records)
}

/// Remove `level` from `record` and turn its value into a key.
pub(crate) fn take_group_key(record: &mut FlatRecord, level: &str) -> NestResult<GroupKey> {
    record
        .shift_remove(level)
        .map(GroupKey::from)
        .ok_or_else(|| {
            tracing::debug!(field = level, "record lacks nesting level");
            NestError::missing_field(level)
        })
}


#[cfg(test)]
mod tests {
    use super::test_support::{levels, records};
    use super::*;
    use serde_json::{json, Value};

    const BOTH: [Strategy; 2] = [Strategy::Iterative, Strategy::Recursive];

    fn task_records() -> Vec<FlatRecord> {
        records(json!([
            {"country": "US", "city": "Boston", "currency": "USD", "amount": 100},
            {"country": "FR", "city": "Paris", "currency": "EUR", "amount": 20},
            {"country": "FR", "city": "Lyon", "currency": "EUR", "amount": 11.4},
            {"country": "ES", "city": "Madrid", "currency": "EUR", "amount": 8.9},
            {"country": "UK", "city": "London", "currency": "GBP", "amount": 12.2},
            {"country": "UK", "city": "London", "currency": "FBP", "amount": 10.9},
        ]))
    }

    fn to_json(nested: &Nested) -> Value {
        serde_json::to_value(nested).unwrap()
    }

    #[test]
    fn test_select() {
        assert_eq!(Strategy::select(true), Strategy::Recursive);
        assert_eq!(Strategy::select(false), Strategy::Iterative);
        assert_eq!(Strategy::default(), Strategy::Iterative);
    }

    #[test]
    fn test_empty_levels() {
        for strategy in BOTH {
            assert_eq!(
                transform(strategy, vec![], vec![]),
                Err(NestError::EmptyNestingLevels)
            );
            assert_eq!(
                transform(strategy, vec![], records(json!([{"a": 1}]))),
                Err(NestError::EmptyNestingLevels)
            );
        }
    }

    #[test]
    fn test_one_nesting_level() {
        for strategy in BOTH {
            let nested = transform(strategy, levels(&["a"]), records(json!([{"a": 1, "b": 2}]))).unwrap();
            assert_eq!(to_json(&nested), json!({"1": [{"b": 2}]}));
            assert_eq!(nested.depth(), 1);
        }
    }

    #[test]
    fn test_two_nesting_levels() {
        for strategy in BOTH {
            let nested =
                transform(strategy, levels(&["a", "b"]), records(json!([{"a": 1, "b": 2}]))).unwrap();
            assert_eq!(to_json(&nested), json!({"1": {"2": [{}]}}));
        }
    }

    #[test]
    fn test_four_nesting_levels() {
        for strategy in BOTH {
            let nested = transform(
                strategy,
                levels(&["a", "b", "c", "d"]),
                records(json!([{"a": 1, "b": 2, "c": 3, "d": 4}])),
            )
            .unwrap();
            assert_eq!(to_json(&nested), json!({"1": {"2": {"3": {"4": [{}]}}}}));
            assert_eq!(nested.depth(), 4);
        }
    }

    #[test]
    fn test_task_example() {
        let expected = json!({
            "USD": {"US": {"Boston": [{"amount": 100}]}},
            "EUR": {
                "FR": {"Paris": [{"amount": 20}], "Lyon": [{"amount": 11.4}]},
                "ES": {"Madrid": [{"amount": 8.9}]},
            },
            "GBP": {"UK": {"London": [{"amount": 12.2}]}},
            "FBP": {"UK": {"London": [{"amount": 10.9}]}},
        });
        for strategy in BOTH {
            let nested =
                transform(strategy, levels(&["currency", "country", "city"]), task_records()).unwrap();
            assert_eq!(to_json(&nested), expected);
            assert_eq!(nested.record_count(), 6);
        }
    }

    #[test]
    fn test_unexpected_nesting_level_is_case_sensitive() {
        for strategy in BOTH {
            let err = transform(strategy, levels(&["a", "B"]), records(json!([{"a": 1, "b": 2}])))
                .unwrap_err();
            assert_eq!(err, NestError::missing_field("B"));
            assert_eq!(err.reason(), "no such nesting level");
        }
    }

    #[test]
    fn test_missing_field_in_later_record_aborts() {
        for strategy in BOTH {
            let input = records(json!([
                {"a": 1, "b": 2},
                {"a": 1, "b": 3},
                {"b": 4},
            ]));
            let err = transform(strategy, levels(&["a", "b"]), input).unwrap_err();
            assert_eq!(err, NestError::missing_field("a"));
        }
    }

    #[test]
    fn test_duplicate_level_is_missing_on_second_lookup() {
        for strategy in BOTH {
            let err = transform(strategy, levels(&["a", "a"]), records(json!([{"a": 1}]))).unwrap_err();
            assert_eq!(err, NestError::missing_field("a"));
        }
    }

    #[test]
    fn test_empty_records() {
        for strategy in BOTH {
            let nested = transform(strategy, levels(&["a", "b"]), vec![]).unwrap();
            assert_eq!(to_json(&nested), json!({}));
        }
    }

    #[test]
    fn test_leaf_order_is_stable() {
        let input = json!([
            {"k": "x", "n": 1},
            {"k": "y", "n": 2},
            {"k": "x", "n": 3},
            {"k": "x", "n": 4},
            {"k": "y", "n": 5},
        ]);
        for strategy in BOTH {
            let nested = transform(strategy, levels(&["k"]), records(input.clone())).unwrap();
            assert_eq!(
                to_json(&nested),
                json!({"x": [{"n": 1}, {"n": 3}, {"n": 4}], "y": [{"n": 2}, {"n": 5}]})
            );
        }
    }

    #[test]
    fn test_leaves_never_keep_level_fields() {
        let nesting = ["currency", "country", "city"];
        for strategy in BOTH {
            let nested = transform(strategy, levels(&nesting), task_records()).unwrap();
            let mut pending = vec![&nested];
            while let Some(node) = pending.pop() {
                match node {
                    Nested::Branch(children) => pending.extend(children.values()),
                    Nested::Leaf(rows) => {
                        for row in rows {
                            assert!(nesting.iter().all(|level| !row.contains_key(*level)));
                            assert!(row.contains_key("amount"));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_strategies_agree() {
        let input = json!([
            {"x": true, "y": null, "z": 1, "v": "a"},
            {"x": false, "y": null, "z": 2, "v": "b"},
            {"x": true, "y": "n", "z": 1, "v": "c"},
            {"x": true, "y": null, "z": 1.5, "v": "d"},
            {"x": true, "y": null, "z": 1, "v": "e"},
        ]);
        let iterative = transform(Strategy::Iterative, levels(&["x", "y", "z"]), records(input.clone())).unwrap();
        let recursive = transform(Strategy::Recursive, levels(&["x", "y", "z"]), records(input)).unwrap();
        assert_eq!(iterative, recursive);
        assert_eq!(
            serde_json::to_string(&iterative).unwrap(),
            serde_json::to_string(&recursive).unwrap()
        );
        assert_eq!(
            to_json(&iterative),
            json!({
                "true": {
                    "null": {"1": [{"v": "a"}, {"v": "e"}], "1.5": [{"v": "d"}]},
                    "n": {"1": [{"v": "c"}]},
                },
                "false": {"null": {"2": [{"v": "b"}]}},
            })
        );
    }

    #[test]
    fn test_repeated_runs_serialize_identically() {
        let first = transform(Strategy::Iterative, levels(&["currency", "country"]), task_records()).unwrap();
        let second = transform(Strategy::Iterative, levels(&["currency", "country"]), task_records()).unwrap();
        assert_eq!(
            serde_json::to_string(&first.sorted()).unwrap(),
            serde_json::to_string(&second.sorted()).unwrap()
        );
    }

    #[test]
    fn test_composite_values_group_by_json_text() {
        for strategy in BOTH {
            let input = records(json!([
                {"tags": ["a", "b"], "n": 1},
                {"tags": ["a", "b"], "n": 2},
            ]));
            let nested = transform(strategy, levels(&["tags"]), input).unwrap();
            assert_eq!(to_json(&nested), json!({r#"["a","b"]"#: [{"n": 1}, {"n": 2}]}));
        }
    }
}
