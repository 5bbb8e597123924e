use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geom::AnchorId;

/// Identifier of the visual handle a host draws for an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(u64);

impl HandleId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Maps anchors to their handles. The geometry layer never sees this table.
#[derive(Debug, Clone, Default)]
pub struct HandleTable {
    handles: BTreeMap<AnchorId, HandleId>,
    next_id: u64,
}

impl HandleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh handle for `anchor`, replacing any previous one.
    pub fn attach(&mut self, anchor: AnchorId) -> HandleId {
        let handle = HandleId(self.next_id);
        self.next_id += 1;
        self.handles.insert(anchor, handle);
        handle
    }

    pub fn detach(&mut self, anchor: AnchorId) -> Option<HandleId> {
        self.handles.remove(&anchor)
    }

    #[must_use]
    pub fn get(&self, anchor: AnchorId) -> Option<HandleId> {
        self.handles.get(&anchor).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
