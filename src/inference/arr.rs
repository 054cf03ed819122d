use serde_json::Value;

/// Nesting shape of one observed array: how deep the `[]` wrappers go and
/// which non-array, non-null values sit at the bottom.
#[derive(Debug, Default)]
pub struct ArrayShape<'a> {
    /// Deepest nesting seen, counting empty arrays.
    pub depth: u32,
    pub leaves: Vec<&'a Value>,
    leaf_min: Option<u32>,
    leaf_max: Option<u32>,
}

impl<'a> ArrayShape<'a> {
    pub fn of(xs: &'a [Value]) -> Self {
        let mut shape = Self::default();
        shape.walk(xs, 1);
        shape
    }

    fn walk(&mut self, xs: &'a [Value], depth: u32) {
        self.depth = self.depth.max(depth);
        for el in xs {
            match el {
                Value::Null => {}
                Value::Array(inner) => self.walk(inner, depth + 1),
                leaf => {
                    self.leaf_min = Some(self.leaf_min.map_or(depth, |d| d.min(depth)));
                    self.leaf_max = Some(self.leaf_max.map_or(depth, |d| d.max(depth)));
                    self.leaves.push(leaf);
                }
            }
        }
    }

    /// Leaves at different depths (`[1, [2]]`), or a leaf above a deeper
    /// empty array (`[[1], [[]]]`).
    pub fn is_ragged(&self) -> bool {
        match (self.leaf_min, self.leaf_max) {
            (Some(lo), Some(hi)) => lo != hi || hi != self.depth,
            _ => false,
        }
    }

    pub fn has_leaves(&self) -> bool {
        !self.leaves.is_empty()
    }

    /// Array level to record for this observation. For ragged arrays this is
    /// the shallowest leaf, the only level all elements agree on.
    pub fn level(&self) -> u32 {
        if self.is_ragged() {
            self.leaf_min.unwrap_or(self.depth)
        } else {
            self.depth
        }
    }
}
