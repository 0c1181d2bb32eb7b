//! Sprite bookkeeping for the DOM front end
//!
//! Each food item is one element that lives from spawn to pickup. Elements
//! are never rebuilt, so their CSS fall animation runs uninterrupted.

/// Element changes needed to match the current food list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteDiff {
    /// Ids to create, in current order
    pub added: Vec<u32>,
    /// Ids whose elements should be removed
    pub removed: Vec<u32>,
}

impl SpriteDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare the ids on screen with the ids in the latest snapshot
pub fn diff_ids(rendered: &[u32], current: &[u32]) -> SpriteDiff {
    SpriteDiff {
        added: current
            .iter()
            .filter(|id| !rendered.contains(id))
            .copied()
            .collect(),
        removed: rendered
            .iter()
            .filter(|id| !current.contains(id))
            .copied()
            .collect(),
    }
}

/// DOM id for a food element
pub fn food_element_id(id: u32) -> String {
    format!("food-{}", id)
}
