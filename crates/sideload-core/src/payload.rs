//! Nested payload tree and dotted-key flattening.
//!
//! Table headers such as `treatment.H.probe.concentration` describe a path
//! into a nested object. [`flatten`] turns a flat sequence of such entries into
//! a [`PayloadMap`] tree, merging fragments that share a prefix instead of
//! replacing whole subtrees.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Separator between path segments in a dotted header.
pub const KEY_SEPARATOR: char = '.';

pub type PayloadMap = BTreeMap<String, PayloadNode>;

/// A node of the payload tree: a scalar leaf or a nested object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadNode {
    Leaf(CellValue),
    Branch(PayloadMap),
}

impl PayloadNode {
    #[must_use]
    pub const fn as_leaf(&self) -> Option<&CellValue> {
        match self {
            Self::Leaf(cell) => Some(cell),
            Self::Branch(_) => None,
        }
    }

    #[must_use]
    pub const fn as_branch(&self) -> Option<&PayloadMap> {
        match self {
            Self::Branch(children) => Some(children),
            Self::Leaf(_) => None,
        }
    }
}

impl From<CellValue> for PayloadNode {
    fn from(cell: CellValue) -> Self {
        Self::Leaf(cell)
    }
}

/// Expand dotted keys into nested branches and prune blank leaves.
///
/// Entries are applied in iteration order. Where two entries reach the same
/// leaf the later one wins; where both reach a branch the branches are merged
/// key by key. Branch values are flattened recursively, so running `flatten`
/// on its own output is a no-op.
pub fn flatten<I>(entries: I) -> PayloadMap
where
    I: IntoIterator<Item = (String, PayloadNode)>,
{
    let mut merged = PayloadMap::new();

    for (key, value) in entries {
        let Some(value) = prune(value) else {
            continue;
        };

        let (root, node) = nest(&key, value);
        merge_entry(&mut merged, root, node);
    }

    merged
}

/// Recursively merge `incoming` into `target`.
///
/// Branches present on both sides are merged; any other collision is resolved
/// in favour of `incoming`.
pub fn merge(target: &mut PayloadMap, incoming: PayloadMap) {
    for (key, value) in incoming {
        merge_entry(target, key, value);
    }
}

fn merge_entry(target: &mut PayloadMap, key: String, value: PayloadNode) {
    match target.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
            (PayloadNode::Branch(existing), PayloadNode::Branch(incoming)) => {
                merge(existing, incoming);
            }
            (current, value) => *current = value,
        },
    }
}

/// Build the single-path fragment for `key`, returning its root segment and
/// the node hanging below it.
fn nest(key: &str, value: PayloadNode) -> (String, PayloadNode) {
    let mut segments = key.split(KEY_SEPARATOR);
    // split always yields at least one segment
    let root = segments.next().unwrap_or_default().to_string();

    let node = segments.rev().fold(value, |child, segment| {
        PayloadNode::Branch(BTreeMap::from([(segment.to_string(), child)]))
    });

    (root, node)
}

/// Drop blank leaves and branches left empty after pruning.
fn prune(value: PayloadNode) -> Option<PayloadNode> {
    match value {
        PayloadNode::Leaf(cell) if cell.is_blank() => None,
        PayloadNode::Leaf(cell) => Some(PayloadNode::Leaf(cell)),
        PayloadNode::Branch(children) => {
            let children = flatten(children);
            (!children.is_empty()).then_some(PayloadNode::Branch(children))
        }
    }
}
