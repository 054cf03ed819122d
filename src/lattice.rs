//! Type lattice + widening.
//!
//! A node's classification only ever moves up this chain:
//!
//! `init → bool → int → float → time → string → object → interface`
//!
//! `fit` cascades from the current variant toward more general ones until a
//! variant accepts the value. `expands` says whether switching from one
//! variant to another keeps every earlier observation representable. When it
//! doesn't, [`grow_type`] collapses the node to `interface`.
//!
//! `extracted`, `map` and `other` are sealed: they are assigned by whoever
//! builds the tree and never take part in widening.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Init,
    Bool,
    Int,
    Float,
    Time,
    String,
    Object,
    Interface,

    // sealed
    Extracted,
    Map,
    /// Opaque type reference; the payload is emitted verbatim.
    Other(String),
}

impl NodeType {
    pub fn id(&self) -> &str {
        match self {
            NodeType::Init => "init",
            NodeType::Bool => "bool",
            NodeType::Int => "int",
            NodeType::Float => "float",
            NodeType::Time => "time",
            NodeType::String => "string",
            NodeType::Object => "object",
            NodeType::Interface => "interface",
            NodeType::Extracted => "extracted",
            NodeType::Map => "map",
            NodeType::Other(name) => name,
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self, NodeType::Extracted | NodeType::Map | NodeType::Other(_))
    }

    /// Most specific variant, starting at `self`, that can represent `v`.
    pub fn fit(&self, v: &Value) -> NodeType {
        match self {
            NodeType::Init => NodeType::Bool.fit(v),
            NodeType::Bool => match v {
                Value::Bool(_) => NodeType::Bool,
                _ => NodeType::Int.fit(v),
            },
            NodeType::Int => {
                if is_integral(v) {
                    NodeType::Int
                } else {
                    NodeType::Float.fit(v)
                }
            }
            NodeType::Float => match v {
                Value::Number(_) => NodeType::Float,
                _ => NodeType::Time.fit(v),
            },
            NodeType::Time => match v {
                Value::String(s) if is_timestamp(s) => NodeType::Time,
                _ => NodeType::String.fit(v),
            },
            NodeType::String => match v {
                Value::String(_) => NodeType::String,
                _ => NodeType::Object.fit(v),
            },
            NodeType::Object => match v {
                Value::Object(_) => NodeType::Object,
                _ => NodeType::Interface,
            },
            NodeType::Interface => NodeType::Interface,
            sealed @ (NodeType::Extracted | NodeType::Map | NodeType::Other(_)) => sealed.clone(),
        }
    }

    /// True if `self` can stand in for `previous` without losing anything
    /// `previous` could represent.
    pub fn expands(&self, previous: &NodeType) -> bool {
        match (self, previous) {
            (NodeType::Float, NodeType::Int) => true,
            (NodeType::String, NodeType::Time) => true,
            (a, b) => a == b,
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Fold one observed value into a running classification.
///
/// `null` never changes the type, and sealed types never widen. Anything `current` cannot absorb
/// collapses to [`NodeType::Interface`], which is absorbing.
pub fn grow_type(current: &NodeType, value: &Value) -> NodeType {
    if value.is_null() || current.is_sealed() {
        return current.clone();
    }

    let candidate = current.fit(value);
    if *current != NodeType::Init && !candidate.expands(current) {
        return NodeType::Interface;
    }

    candidate
}

// ------------------------------- Helpers ---------------------------------- //

/// Whole number that fits in an `int64`. Larger magnitudes are left to `float`.
fn is_integral(v: &Value) -> bool {
    let Value::Number(n) = v else { return false };
    if n.is_i64() {
        return true;
    }
    if n.is_u64() {
        return false;
    }
    match n.as_f64() {
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        Some(f) => f.is_finite() && f == f.trunc() && f >= i64::MIN as f64 && f < i64::MAX as f64,
        None => false,
    }
}

fn is_timestamp(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

// ------------------------------- Tests ------------------------------------ //
