// Merged node tree. Built by `inference`, read by `lower`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::lattice::NodeType;

/// One position in the merged tree: a field (or the top-level document)
/// across every sample seen so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Go identifier for this field/type.
    pub name: String,
    /// Original key, verbatim; ends up in the field tag.
    pub key: String,
    #[serde(rename = "type")]
    pub ty: NodeType,
    /// Keyed by child `name`. Only populated for `object` and `map` nodes.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, Node>,
    /// Number of `[]` wrappers around the element type.
    pub array_level: u32,
    pub required: bool,
    pub nullable: bool,
    pub root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_type_id: Option<String>,

    // builder bookkeeping, see `inference`
    #[serde(skip)]
    pub(crate) objects_seen: u64,
    #[serde(skip)]
    pub(crate) present_in: u64,
    #[serde(skip)]
    pub(crate) observed_level: Option<u32>,
    #[serde(skip)]
    pub(crate) level_floor: Option<u32>,
}

impl Node {
    /// A top-level declaration target.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: true,
            required: true,
            ..Self::default()
        }
    }

    pub fn field(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: NodeType) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn with_array_level(mut self, level: u32) -> Self {
        self.array_level = level;
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    #[must_use]
    pub fn with_external_type_id(mut self, id: impl Into<String>) -> Self {
        self.external_type_id = Some(id.into());
        self
    }

    /// Insert (or replace) a child under its own name.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.insert(child.name.clone(), child);
        self
    }

    /// Child whose original key is `key`.
    pub fn child_by_key(&self, key: &str) -> Option<&Node> {
        self.children.values().find(|c| c.key == key)
    }

    /// Drop builder-only state and anything that can't hold children.
    pub(crate) fn finalize(&mut self) {
        if !matches!(self.ty, NodeType::Object | NodeType::Map) {
            self.children.clear();
        }
        let objects_seen = self.objects_seen;
        let is_object = self.ty == NodeType::Object;
        for child in self.children.values_mut() {
            if is_object {
                child.required = child.present_in == objects_seen;
            }
            child.finalize();
        }
    }
}
