//! Iterative grouping.
//!
//! One pass over the records. Each record walks the nesting levels with a
//! cursor into the tree, creating nodes on first visit:
//!
//! ```text
//! levels = [a, b]            record {a: 1, b: 2, c: 3}
//!
//! root ──1──▶ branch ──2──▶ leaf [.., {c: 3}]
//! ```
//!
//! No recursion, so the number of levels is bounded by memory only.

use crate::error::NestResult;
use crate::models::{Branch, FlatRecord, Nested, NestingLevels};

use super::take_group_key;

/// Group `records` by `levels` in a single pass.
pub fn nest(levels: &NestingLevels, records: Vec<FlatRecord>) -> NestResult<Nested> {
    let (last, inner) = levels.split_last();
    let mut root = Branch::new();

    for mut record in records {
        let mut cursor = &mut root;

        for level in inner {
            let key = take_group_key(&mut record, level)?;
            cursor = match cursor
                .entry(key)
                .or_insert_with(|| Nested::Branch(Branch::new()))
            {
                Nested::Branch(children) => children,
                Nested::Leaf(_) => unreachable!("leaf above the final nesting level"),
            };
        }

        let key = take_group_key(&mut record, last)?;
        match cursor.entry(key).or_insert_with(|| Nested::Leaf(Vec::new())) {
            Nested::Leaf(rows) => rows.push(record),
            Nested::Branch(_) => unreachable!("branch at the final nesting level"),
        }
    }

    Ok(Nested::Branch(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NestError;
    use crate::transform::test_support::{deep_input, records};
    use serde_json::json;

    #[test]
    fn test_cursor_reuses_existing_nodes() {
        let levels = NestingLevels::new(vec!["a".into(), "b".into()]).unwrap();
        let nested = nest(
            &levels,
            records(json!([
                {"a": 1, "b": 1, "n": "first"},
                {"a": 1, "b": 2, "n": "second"},
                {"a": 1, "b": 1, "n": "third"},
            ])),
        )
        .unwrap();

        let children = nested.as_branch().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(
            serde_json::to_value(&nested).unwrap(),
            json!({"1": {"1": [{"n": "first"}, {"n": "third"}], "2": [{"n": "second"}]}})
        );
    }

    #[test]
    fn test_no_depth_limit() {
        let depth = 100_000;
        let (names, record) = deep_input(depth);
        let levels = NestingLevels::new(names).unwrap();

        let nested = nest(&levels, vec![record]).unwrap();

        assert_eq!(nested.depth(), depth);
        assert_eq!(nested.record_count(), 1);
        drop(nested);
    }

    #[test]
    fn test_missing_field_names_requested_level() {
        let levels = NestingLevels::new(vec!["currency".into(), "city".into()]).unwrap();
        let err = nest(&levels, records(json!([{"currency": "EUR", "country": "FR"}]))).unwrap_err();
        assert_eq!(err, NestError::MissingField { field: "city".into() });
    }
}
