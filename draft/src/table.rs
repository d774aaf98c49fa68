//! Per-entity-set storage of active and draft versions.

use mockd_core::{DraftAdministrativeData, EntityKey, Record};
use std::collections::HashMap;

/// A draft version together with its administrative data.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRecord {
    pub record: Record,
    pub admin: DraftAdministrativeData,
}

/// Storage for one entity set.
///
/// At most one active and at most one draft record exist per business key.
/// `order` keeps natural (insertion) order of logical entities; a key stays
/// in it while either version exists.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    order: Vec<EntityKey>,
    active: HashMap<EntityKey, Record>,
    drafts: HashMap<EntityKey, DraftRecord>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self, key: &EntityKey) -> Option<&Record> {
        self.active.get(key)
    }

    pub fn draft(&self, key: &EntityKey) -> Option<&DraftRecord> {
        self.drafts.get(key)
    }

    pub(crate) fn active_mut(&mut self, key: &EntityKey) -> Option<&mut Record> {
        self.active.get_mut(key)
    }

    pub(crate) fn draft_mut(&mut self, key: &EntityKey) -> Option<&mut DraftRecord> {
        self.drafts.get_mut(key)
    }

    pub fn has_active(&self, key: &EntityKey) -> bool {
        self.active.contains_key(key)
    }

    pub fn has_draft(&self, key: &EntityKey) -> bool {
        self.drafts.contains_key(key)
    }

    /// Returns true if either version exists.
    pub fn contains(&self, key: &EntityKey) -> bool {
        self.has_active(key) || self.has_draft(key)
    }

    /// Keys of logical entities in natural order.
    pub fn keys(&self) -> impl Iterator<Item = &EntityKey> {
        self.order.iter()
    }

    /// Number of logical entities.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn put_active(&mut self, key: EntityKey, record: Record) {
        if !self.contains(&key) {
            self.order.push(key.clone());
        }
        self.active.insert(key, record);
    }

    pub(crate) fn put_draft(&mut self, key: EntityKey, draft: DraftRecord) {
        if !self.contains(&key) {
            self.order.push(key.clone());
        }
        self.drafts.insert(key, draft);
    }

    pub(crate) fn take_active(&mut self, key: &EntityKey) -> Option<Record> {
        let removed = self.active.remove(key);
        self.forget_if_gone(key);
        removed
    }

    pub(crate) fn take_draft(&mut self, key: &EntityKey) -> Option<DraftRecord> {
        let removed = self.drafts.remove(key);
        self.forget_if_gone(key);
        removed
    }

    fn forget_if_gone(&mut self, key: &EntityKey) {
        if !self.contains(key) {
            self.order.retain(|k| k != key);
        }
    }
}

/// Choose the version a reader sees when two records share an identity.
///
/// A draft (`IsActiveEntity = false`) supersedes an active record; otherwise
/// the first record is kept.
pub fn prefer_visible<'r>(first: &'r Record, second: &'r Record) -> &'r Record {
    let first_is_draft = first.is_active() == Some(false);
    let second_is_draft = second.is_active() == Some(false);
    if second_is_draft && !first_is_draft {
        second
    } else {
        first
    }
}
