//! Domain models for the grouping engine.
//!
//! - [`FlatRecord`] - One input record (field name → JSON value)
//! - [`NestingLevels`] - Non-empty, ordered list of grouping fields
//! - [`GroupKey`] - A record value used as a map key at one nesting depth
//! - [`Nested`] - The produced tree: branches keyed by [`GroupKey`], leaves of records
//!
//! # Output Shape
//!
//! ```text
//! levels = [currency, country]
//!
//! {"EUR": {"FR": [{"amount": 20}, {"amount": 11.4}],
//!          "ES": [{"amount": 8.9}]},
//!  "USD": {"US": [{"amount": 100}]}}
//! ```

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{NestError, NestResult};

/// A flat input record. Field order is preserved.
pub type FlatRecord = Map<String, Value>;

/// Children of a branch node, in first-seen order.
pub type Branch = IndexMap<GroupKey, Nested>;

/// Deepest tree the serializers accept.
///
/// Serialization takes a few stack frames per level. 256 levels fit a 2 MiB
/// thread stack (tokio workers, test threads) in an unoptimized build.
pub const MAX_SERIALIZE_DEPTH: usize = 256;

// =============================================================================
// Nesting levels
// =============================================================================

/// Ordered grouping fields; the first name is the outermost grouping.
///
/// Never empty: construction rejects an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestingLevels(Vec<String>);

impl NestingLevels {
    pub fn new(levels: Vec<String>) -> NestResult<Self> {
        if levels.is_empty() {
            return Err(NestError::EmptyNestingLevels);
        }
        Ok(Self(levels))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Final level and the levels above it.
    pub fn split_last(&self) -> (&String, &[String]) {
        match self.0.split_last() {
            Some(parts) => parts,
            None => unreachable!("nesting levels are never empty"),
        }
    }
}

impl TryFrom<Vec<String>> for NestingLevels {
    type Error = NestError;

    fn try_from(levels: Vec<String>) -> NestResult<Self> {
        Self::new(levels)
    }
}

// =============================================================================
// Group keys
// =============================================================================

/// A record value used as a map key.
///
/// Equality is JSON value equality. Arrays and objects are keyed by their
/// compact JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Composite(String),
}

impl From<Value> for GroupKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            composite @ (Value::Array(_) | Value::Object(_)) => Self::Composite(composite.to_string()),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::String(_) => 3,
            Self::Composite(_) => 4,
        }
    }
}

/// JSON object key text.
impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) | Self::Composite(s) => f.write_str(s),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numbers compare numerically, everything else by kind then value.
impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Number(a), Self::Number(b)) => compare_numbers(a, b),
            (Self::String(a), Self::String(b)) | (Self::Composite(a), Self::Composite(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    // Ties between distinct representations (1 vs 1.0) fall back to text
    // so the order stays consistent with Eq.
    x.total_cmp(&y).then_with(|| a.to_string().cmp(&b.to_string()))
}

// =============================================================================
// Nested result
// =============================================================================

/// Result of a transformation.
///
/// A branch per remaining nesting level; leaves once every level is consumed.
/// Equality ignores sibling order.
///
/// Dropping never recurses, so trees of any depth can be built and freed.
/// Serializing does recurse: check [`Nested::check_depth`] first.
#[derive(Debug, Clone, PartialEq)]
pub enum Nested {
    Branch(Branch),
    Leaf(Vec<FlatRecord>),
}

impl Nested {
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            Self::Branch(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }

    /// Number of branch levels above the leaves.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Self::Branch(children) = node {
            depth += 1;
            match children.values().next() {
                Some(child) => node = child,
                None => break,
            }
        }
        depth
    }

    /// Total number of records stored in the leaves.
    pub fn record_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::Branch(children) => pending.extend(children.values()),
                Self::Leaf(records) => count += records.len(),
            }
        }
        count
    }

    /// Fail with [`NestError::TooDeep`] when the tree has more than `max` levels.
    pub fn check_depth(&self, max: usize) -> NestResult<()> {
        let depth = self.depth();
        if depth > max {
            tracing::warn!(depth, max, "nested result too deep to serialize");
            return Err(NestError::TooDeep { depth, max });
        }
        Ok(())
    }

    /// Serialization view with keys sorted at every depth.
    pub fn sorted(&self) -> Sorted<'_> {
        Sorted(self)
    }
}

impl Drop for Nested {
    fn drop(&mut self) {
        let Self::Branch(children) = self else {
            return;
        };
        if children.is_empty() {
            return;
        }
        // Detach grandchildren before each child is dropped, so every
        // drop sees an empty branch.
        let mut pending = vec![std::mem::take(children)];
        while let Some(mut branch) = pending.pop() {
            for (_, mut child) in branch.drain(..) {
                if let Self::Branch(grandchildren) = &mut child {
                    pending.push(std::mem::take(grandchildren));
                }
            }
        }
    }
}

impl Serialize for Nested {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(&key.to_string(), child)?;
                }
                map.end()
            }
            Self::Leaf(records) => records.serialize(serializer),
        }
    }
}

/// Serializes a [`Nested`] with branch keys sorted.
pub struct Sorted<'a>(&'a Nested);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Nested::Branch(children) => {
                let mut entries: Vec<_> = children.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, child) in entries {
                    map.serialize_entry(&key.to_string(), &Sorted(child))?;
                }
                map.end()
            }
            Nested::Leaf(records) => {
                let mut seq = Vec::with_capacity(records.len());
                for record in records {
                    let mut fields: Vec<_> = record.iter().collect();
                    fields.sort_by(|a, b| a.0.cmp(b.0));
                    seq.push(SortedFields(fields));
                }
                seq.serialize(serializer)
            }
        }
    }
}

struct SortedFields<'a>(Vec<(&'a String, &'a Value)>);

impl Serialize for SortedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
