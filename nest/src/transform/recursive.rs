//! Recursive grouping.
//!
//! Groups the whole record set by the first level, then recurses into each
//! group with the remaining levels:
//!
//! ```text
//! [r1, r2, r3]  ──a──▶  {1: [r1, r3], 2: [r2]}
//!               ──b──▶  {1: {x: [r1], y: [r3]}, 2: {x: [r2]}}
//! ```
//!
//! Call depth grows with the number of levels. Instead of exhausting the
//! thread stack the depth is bounded, failing with
//! [`NestError::RecursionLimit`] once the limit is passed.

use indexmap::IndexMap;

use crate::error::{NestError, NestResult};
use crate::models::{Branch, FlatRecord, GroupKey, Nested, NestingLevels};

use super::take_group_key;

/// Default bound on recursion depth, one frame per nesting level.
///
/// An unoptimized frame takes a few KiB; 256 of them fit a 2 MiB thread
/// stack with room left for the caller, which is what tokio workers and
/// test threads get.
pub const DEFAULT_RECURSION_LIMIT: usize = 256;

/// Group `records` by `levels`, recursing once per level.
pub fn nest(levels: &NestingLevels, records: Vec<FlatRecord>) -> NestResult<Nested> {
    nest_with_limit(levels, records, DEFAULT_RECURSION_LIMIT)
}

/// Same as [`nest`] with a caller-chosen recursion limit.
pub fn nest_with_limit(
    levels: &NestingLevels,
    records: Vec<FlatRecord>,
    limit: usize,
) -> NestResult<Nested> {
    nest_levels(levels.as_slice(), records, 1, limit)
}

fn nest_levels(
    levels: &[String],
    records: Vec<FlatRecord>,
    depth: usize,
    limit: usize,
) -> NestResult<Nested> {
    if depth > limit {
        tracing::warn!(limit, "recursion depth limit exceeded");
        return Err(NestError::RecursionLimit { limit });
    }

    let Some((level, rest)) = levels.split_first() else {
        return Ok(Nested::Leaf(records));
    };

    let groups = group_by_level(level, records)?;
    let mut nested = Branch::with_capacity(groups.len());

    for (key, group) in groups {
        let child = if rest.is_empty() {
            Nested::Leaf(group)
        } else {
            nest_levels(rest, group, depth + 1, limit)?
        };
        nested.insert(key, child);
    }

    Ok(Nested::Branch(nested))
}

/// One flat grouping pass: value of `level` → records carrying it.
fn group_by_level(
    level: &str,
    records: Vec<FlatRecord>,
) -> NestResult<IndexMap<GroupKey, Vec<FlatRecord>>> {
    let mut groups: IndexMap<GroupKey, Vec<FlatRecord>> = IndexMap::new();

    for mut record in records {
        let key = take_group_key(&mut record, level)?;
        groups.entry(key).or_default().push(record);
    }

    Ok(groups)
}
