use serde_json::{Map, Value};

use super::name::{go_name, unique_name};
use crate::ir::Node;

/// Merge one observed object into `node`'s children.
///
/// Children are matched by original key; a new key gets a fresh name that
/// doesn't clash with any sibling.
pub(super) fn merge_object(node: &mut Node, map: &Map<String, Value>, path: &str) {
    node.objects_seen += 1;

    for (key, value) in map {
        let existing = node
            .children
            .iter()
            .find(|(_, c)| c.key == *key)
            .map(|(name, _)| name.clone());
        let name = match existing {
            Some(name) => name,
            None => {
                let name = unique_name(go_name(key), |n| node.children.contains_key(n));
                node.children.insert(name.clone(), Node::field(name.clone(), key.clone()));
                name
            }
        };
        let Some(child) = node.children.get_mut(&name) else { continue };
        child.present_in += 1;
        super::observe(child, value, &format!("{path}.{key}"));
    }
}
