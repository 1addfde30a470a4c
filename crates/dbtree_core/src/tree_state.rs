use crate::entity::EntityId;
use crate::node_key::{NodeKey, ObjectCategory, ObjectVersions};
use std::collections::{HashMap, HashSet};

/// Expansion and load bookkeeping for one resource tree.
///
/// Owned by whoever renders the tree and passed explicitly to the functions
/// that need it; there is no shared global instance.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    expanded: HashSet<NodeKey>,
    loaded: HashSet<NodeKey>,
    versions: HashMap<EntityId, ObjectVersions>,
    sessions: HashMap<EntityId, String>,
}

impl TreeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_expanded(&mut self, key: NodeKey) {
        self.expanded.insert(key);
    }

    pub fn collapse(&mut self, key: &NodeKey) -> bool {
        self.expanded.remove(key)
    }

    pub fn is_expanded(&self, key: &NodeKey) -> bool {
        self.expanded.contains(key)
    }

    pub fn expanded_keys(&self) -> &HashSet<NodeKey> {
        &self.expanded
    }

    pub fn mark_loaded(&mut self, key: NodeKey) {
        self.loaded.insert(key);
    }

    pub fn is_loaded(&self, key: &NodeKey) -> bool {
        self.loaded.contains(key)
    }

    pub fn loaded_keys(&self) -> &HashSet<NodeKey> {
        &self.loaded
    }

    /// Current version counters for a database. Empty until something loads.
    pub fn versions(&self, entity_id: EntityId) -> ObjectVersions {
        self.versions.get(&entity_id).cloned().unwrap_or_default()
    }

    pub fn set_session(&mut self, entity_id: EntityId, session_id: impl Into<String>) {
        self.sessions.insert(entity_id, session_id.into());
    }

    pub fn session(&self, entity_id: EntityId) -> Option<&str> {
        self.sessions.get(&entity_id).map(String::as_str)
    }

    /// Marks a category of a database as reloaded.
    ///
    /// Bumps its version counter and forgets every loaded or expanded key that
    /// belonged to the previous epoch of that category. Returns the new version.
    pub fn refresh_category(&mut self, entity_id: EntityId, category: ObjectCategory) -> u64 {
        let previous = self
            .versions
            .get(&entity_id)
            .and_then(|versions| versions.get(category));

        let stale = |key: &NodeKey| is_under_category(key, entity_id, category, previous);
        self.loaded.retain(|key| !stale(key));
        self.expanded.retain(|key| !stale(key));

        self.versions.entry(entity_id).or_default().bump(category)
    }

    /// Drops everything known about a database, e.g. after it was removed.
    pub fn forget_entity(&mut self, entity_id: EntityId) {
        let id = entity_id.to_string();
        let owned = |key: &NodeKey| !key.is_group() && key.parts().first() == Some(&id);

        self.loaded.retain(|key| !owned(key));
        self.expanded.retain(|key| !owned(key));
        self.versions.remove(&entity_id);
        self.sessions.remove(&entity_id);
    }
}

/// Whether `key` is an object (or a descendant of one) of `category` in the
/// given database and version epoch. Category roots are not included.
fn is_under_category(
    key: &NodeKey,
    entity_id: EntityId,
    category: ObjectCategory,
    version: Option<u64>,
) -> bool {
    let parts = key.parts();
    if parts.first().map(String::as_str) != Some(entity_id.to_string().as_str()) {
        return false;
    }

    // [id, version?, name, category, object, ...]
    let category_index = if version.is_some() { 3 } else { 2 };
    if let Some(version) = version
        && parts.get(1) != Some(&version.to_string())
    {
        return false;
    }

    parts.len() > category_index + 1
        && parts.get(category_index).map(String::as_str) == Some(category.literal())
}
