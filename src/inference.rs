//! Node tree builder.
//!
//! Stream JSON samples in; each one is walked alongside the merged tree,
//! widening every node it touches through [`grow_type`]. Array wrappers are
//! peeled off first so the lattice only ever sees element values.
//!
//! Bookkeeping kept per node while samples stream in:
//! - `objects_seen` / `present_in`: turned into `required` by [`Inference::solve`].
//! - `nullable`: an explicit `null` at this position.
//! - `observed_level`: the first array level seen with leaves; any other
//!   level collapses the node to `interface`.
//! - `level_floor`: deepest leafless array seen (`[]`, `[[]]`, `[null]`).
//!   Those fit any level at least that deep.
pub mod arr;
pub mod name;
mod obj;

use serde_json::Value;
use tracing::debug;

use crate::ir::Node;
use crate::lattice::{NodeType, grow_type};
use arr::ArrayShape;

// ------------------------------ Observe ---------------------------------- //

fn observe(node: &mut Node, value: &Value, path: &str) {
    match value {
        Value::Null => {
            node.nullable = true;
            node.ty = grow_type(&node.ty, value);
        }
        Value::Array(xs) => {
            let shape = ArrayShape::of(xs);
            if !shape.has_leaves() {
                record_floor(node, shape.depth, path);
                return;
            }
            record_level(node, shape.level(), path);
            if shape.is_ragged() {
                collapse(node, path, "array leaves at mixed depths");
                return;
            }
            if node.ty == NodeType::Interface {
                return;
            }
            for leaf in shape.leaves {
                observe_element(node, leaf, path);
            }
        }
        _ => {
            record_level(node, 0, path);
            observe_element(node, value, path);
        }
    }
}

/// Widen with one non-array, non-null value.
fn observe_element(node: &mut Node, value: &Value, path: &str) {
    let before = node.ty.clone();
    node.ty = grow_type(&before, value);
    if node.ty == NodeType::Interface && before != NodeType::Interface {
        debug!(path, from = %before, value = %kind_of(value), "collapsed to interface");
    }

    if node.ty != NodeType::Object {
        node.children.clear();
    } else if let Value::Object(map) = value {
        obj::merge_object(node, map, path);
    }
}

fn record_level(node: &mut Node, level: u32, path: &str) {
    match node.observed_level {
        None => {
            node.observed_level = Some(level);
            node.array_level = level;
            if node.level_floor.is_some_and(|floor| level < floor) {
                collapse(node, path, "array shallower than an earlier empty array");
            }
        }
        Some(prev) if prev != level => {
            node.array_level = node.array_level.min(level);
            collapse(node, path, "array level changed between samples");
        }
        Some(_) => {}
    }
}

/// A leafless array only bounds the level from below.
fn record_floor(node: &mut Node, depth: u32, path: &str) {
    match node.observed_level {
        None => {
            let floor = node.level_floor.map_or(depth, |f| f.max(depth));
            node.level_floor = Some(floor);
            node.array_level = floor;
        }
        Some(level) if level < depth => {
            collapse(node, path, "empty array deeper than the recorded level");
        }
        Some(_) => {}
    }
}

fn collapse(node: &mut Node, path: &str, reason: &str) {
    if node.ty != NodeType::Interface {
        debug!(path, from = %node.ty, reason, "collapsed to interface");
    }
    node.ty = NodeType::Interface;
    node.children.clear();
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------- Front API -------------------------------- //

#[derive(Debug, Clone)]
pub struct Inference {
    root: Node,
    samples: u64,
}

impl Inference {
    /// `root_name` is used verbatim as the declaration name.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self { root: Node::root(root_name), samples: 0 }
    }

    pub fn observe_value(&mut self, v: &Value) {
        self.samples += 1;
        observe(&mut self.root, v, "$");
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Finalized copy of the merged tree; observing can continue afterwards.
    pub fn solve(&self) -> Node {
        let mut root = self.root.clone();
        root.finalize();
        root.root = true;
        root.required = true;
        root
    }
}

pub fn infer_from_values<'a, I>(root_name: &str, values: I) -> Node
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut inf = Inference::new(root_name);
    for v in values {
        inf.observe_value(v);
    }
    inf.solve()
}

// ------------------------------- Tests ------------------------------------ //
