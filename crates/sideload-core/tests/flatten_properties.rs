//! Property tests for dotted-key flattening.

use std::collections::BTreeMap;

use proptest::prelude::*;
use sideload_core::{CellValue, PayloadMap, PayloadNode, flatten};

fn segment() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

/// Keys of a fixed depth, so no key is a strict prefix of another.
fn same_depth_record(depth: usize) -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        prop::collection::vec(segment(), depth).prop_map(|segments| segments.join(".")),
        "[a-z0-9]{1,4}",
        1..12,
    )
}

fn any_record() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop::collection::vec(segment(), 1..4).prop_map(|segments| segments.join(".")),
            "[a-z0-9 ]{0,3}",
        ),
        0..12,
    )
}

fn lookup<'a>(map: &'a PayloadMap, dotted: &str) -> Option<&'a CellValue> {
    let mut segments = dotted.split('.').peekable();
    let mut current = map;
    while let Some(segment) = segments.next() {
        let node = current.get(segment)?;
        if segments.peek().is_none() {
            return node.as_leaf();
        }
        current = node.as_branch()?;
    }
    None
}

fn count_leaves(map: &PayloadMap) -> usize {
    map.values()
        .map(|node| match node {
            PayloadNode::Leaf(_) => 1,
            PayloadNode::Branch(children) => count_leaves(children),
        })
        .sum()
}

fn to_entries<'a>(
    pairs: impl IntoIterator<Item = (&'a String, &'a String)>,
) -> Vec<(String, PayloadNode)> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.clone(), CellValue::from_text(value).into()))
        .collect()
}

proptest! {
    #[test]
    fn every_leaf_survives_merging(record in (1usize..4).prop_flat_map(same_depth_record)) {
        let flat = flatten(to_entries(&record));

        prop_assert_eq!(count_leaves(&flat), record.len());
        for (key, value) in &record {
            prop_assert_eq!(lookup(&flat, key), Some(&CellValue::Text(value.clone())));
        }
    }

    #[test]
    fn flattening_is_idempotent(record in any_record()) {
        let once = flatten(to_entries(record.iter().map(|(k, v)| (k, v))));
        let twice = flatten(once.clone());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn output_has_no_dotted_keys_or_blank_leaves(record in any_record()) {
        fn check(map: &PayloadMap) -> bool {
            map.iter().all(|(key, node)| {
                !key.contains('.')
                    && match node {
                        PayloadNode::Leaf(cell) => !cell.is_blank(),
                        PayloadNode::Branch(children) => !children.is_empty() && check(children),
                    }
            })
        }

        let flat = flatten(to_entries(record.iter().map(|(k, v)| (k, v))));
        prop_assert!(check(&flat));
    }
}
