//! Event registry: bound handles per hook kind, indicators first.

use std::collections::HashMap;
use trading_core::types::Hook;

use crate::binder::BoundHandle;

/// Ordered handle lists, one per hook kind.
///
/// After every registration each list is stable-sorted so handles of
/// indicator modules come first; otherwise registration order is kept.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    lists: HashMap<Hook, Vec<BoundHandle>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the handles bound from one module.
    pub fn register(&mut self, handles: Vec<BoundHandle>) {
        for handle in handles {
            self.lists.entry(handle.hook()).or_default().push(handle);
        }
        for list in self.lists.values_mut() {
            list.sort_by_key(|handle| !handle.is_indicator());
        }
    }

    pub fn handles(&self, hook: Hook) -> &[BoundHandle] {
        self.lists.get(&hook).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, hook: Hook) -> bool {
        !self.handles(hook).is_empty()
    }

    /// Total number of handles across all hook kinds.
    pub fn len(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop handles whose module no longer exists. Returns how many went.
    pub fn prune(&mut self) -> usize {
        let before = self.len();
        for list in self.lists.values_mut() {
            list.retain(BoundHandle::is_live);
        }
        before - self.len()
    }
}
