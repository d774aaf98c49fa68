//! The draft store - owns all entity tables of one modeled service.

use crate::containment::matches_constraints;
use crate::ops;
use crate::{DraftError, DraftRecord, DraftResult, EntityTable};
use mockd_core::names::{
    DRAFT_ADMINISTRATIVE_DATA, DRAFT_FLAGS, HAS_ACTIVE_ENTITY, HAS_DRAFT_ENTITY, IN_PROCESS_BY_USER,
    IS_ACTIVE_ENTITY,
};
use mockd_core::{DraftAdministrativeData, EntityKey, Record, Value};
use mockd_registry::{EntitySetDef, Registry};
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory record store with a draft overlay.
#[derive(Debug)]
pub struct DraftStore {
    pub(crate) registry: Arc<Registry>,
    pub(crate) tables: HashMap<String, EntityTable>,
    /// Copy contained children into drafts on edit.
    pub(crate) copy_contained: bool,
}

impl DraftStore {
    /// Create an empty store with one table per entity set.
    pub fn new(registry: Arc<Registry>) -> Self {
        let tables = registry
            .entity_sets()
            .map(|set| (set.name.clone(), EntityTable::new()))
            .collect();
        Self {
            registry,
            tables,
            copy_contained: true,
        }
    }

    /// Enable or disable copying contained children on edit.
    pub fn with_contained_copy(mut self, enabled: bool) -> Self {
        self.copy_contained = enabled;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Look up an entity set definition.
    pub fn entity_set(&self, name: &str) -> DraftResult<&EntitySetDef> {
        self.registry
            .entity_set(name)
            .ok_or_else(|| DraftError::unknown_entity_set(name))
    }

    /// Look up the table of an entity set.
    pub fn table(&self, name: &str) -> DraftResult<&EntityTable> {
        self.tables
            .get(name)
            .ok_or_else(|| DraftError::unknown_entity_set(name))
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> DraftResult<&mut EntityTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DraftError::unknown_entity_set(name))
    }

    /// Extract the business key of a record.
    pub fn key_of(&self, set: &str, record: &Record) -> DraftResult<EntityKey> {
        key_of(self.entity_set(set)?, record)
    }

    // ==================== FIXTURES ====================

    /// Insert an active record. Fails with Conflict if the key is taken.
    pub fn insert_active(&mut self, set: &str, record: Record) -> DraftResult<Record> {
        ops::insert_active(self, set, record)
    }

    /// Load fixture records in order.
    ///
    /// Records flagged `IsActiveEntity = false` become drafts; all others
    /// become active records.
    pub fn load(&mut self, set: &str, records: impl IntoIterator<Item = Record>) -> DraftResult<usize> {
        let registry = Arc::clone(&self.registry);
        let def = registry
            .entity_set(set)
            .ok_or_else(|| DraftError::unknown_entity_set(set))?;

        let mut prepared = Vec::new();
        for record in records {
            let key = key_of(def, &record)?;
            let is_draft = def.draft_enabled && record.is_active() == Some(false);
            let principal = record
                .get(DRAFT_ADMINISTRATIVE_DATA)
                .and_then(Value::as_object)
                .and_then(|admin| admin.get(IN_PROCESS_BY_USER))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            prepared.push((key, is_draft, principal, strip_draft_properties(record)));
        }

        let table = self.table_mut(set)?;
        let count = prepared.len();
        for (key, is_draft, principal, record) in prepared {
            if is_draft {
                let admin = DraftAdministrativeData::new(uuid::Uuid::new_v4().to_string(), principal);
                table.put_draft(key, DraftRecord { record, admin });
            } else {
                table.put_active(key, record);
            }
        }
        tracing::debug!(entity_set = set, rows = count, "loaded fixtures");
        Ok(count)
    }

    // ==================== READS ====================

    /// The visible version: the draft if present, else the active record.
    pub fn resolve(&self, set: &str, key: &EntityKey) -> DraftResult<Record> {
        let def = self.entity_set(set)?;
        let table = self.table(set)?;
        if let Some(draft) = table.draft(key) {
            return Ok(stamp_draft(def, table, key, draft));
        }
        match table.active(key) {
            Some(active) => Ok(stamp_active(def, table, key, active)),
            None => Err(DraftError::not_found(set, key)),
        }
    }

    /// The explicitly addressed version.
    pub fn resolve_version(&self, set: &str, key: &EntityKey, is_active: bool) -> DraftResult<Record> {
        let def = self.entity_set(set)?;
        let table = self.table(set)?;
        let found = if is_active {
            table.active(key).map(|r| stamp_active(def, table, key, r))
        } else {
            table.draft(key).map(|d| stamp_draft(def, table, key, d))
        };
        found.ok_or_else(|| DraftError::not_found(set, key))
    }

    /// All records of a set in natural order; each logical entity yields its
    /// active row followed by its draft row.
    pub fn rows(&self, set: &str) -> DraftResult<Vec<Record>> {
        let def = self.entity_set(set)?;
        let table = self.table(set)?;
        let mut rows = Vec::with_capacity(table.len());
        for key in table.keys() {
            if let Some(active) = table.active(key) {
                rows.push(stamp_active(def, table, key, active));
            }
            if let Some(draft) = table.draft(key) {
                rows.push(stamp_draft(def, table, key, draft));
            }
        }
        Ok(rows)
    }

    /// Targets of a navigation property, in the target set's natural order.
    ///
    /// `is_active` addresses the parent version; None means the visible one.
    /// From a draft parent each target is read in its visible version; from
    /// an active parent only active targets are returned.
    pub fn children(
        &self,
        set: &str,
        key: &EntityKey,
        is_active: Option<bool>,
        navigation: &str,
    ) -> DraftResult<Vec<Record>> {
        let def = self.entity_set(set)?;
        let nav = def
            .navigation(navigation)
            .ok_or_else(|| DraftError::unknown_navigation(set, navigation))?;
        let table = self.table(set)?;

        let (parent, parent_is_draft) = match is_active {
            Some(true) => (table.active(key), false),
            Some(false) => (table.draft(key).map(|d| &d.record), true),
            None => match table.draft(key) {
                Some(draft) => (Some(&draft.record), true),
                None => (table.active(key), false),
            },
        };
        let parent = parent.ok_or_else(|| DraftError::not_found(set, key))?;

        let target_def = self.entity_set(&nav.target_set)?;
        let target = self.table(&nav.target_set)?;
        let mut rows = Vec::new();
        for child_key in target.keys() {
            let child = if parent_is_draft {
                match target.draft(child_key) {
                    Some(draft) => Some(stamp_draft(target_def, target, child_key, draft)),
                    None => target
                        .active(child_key)
                        .map(|r| stamp_active(target_def, target, child_key, r)),
                }
            } else {
                target
                    .active(child_key)
                    .map(|r| stamp_active(target_def, target, child_key, r))
            };
            if let Some(child) = child {
                if matches_constraints(parent, &child, &nav.constraints) {
                    rows.push(child);
                }
            }
        }
        Ok(rows)
    }

    // ==================== DRAFT LIFECYCLE ====================

    /// Create a draft from an active record (`draftEdit`).
    pub fn create_draft(&mut self, set: &str, key: &EntityKey, principal: &str) -> DraftResult<Record> {
        ops::create_draft(self, set, key, principal)
    }

    /// Create a draft-only entity (POST to a draft-enabled set).
    pub fn create_new_draft(&mut self, set: &str, record: Record, principal: &str) -> DraftResult<Record> {
        ops::create_new_draft(self, set, record, principal)
    }

    /// Merge a patch into the draft version.
    pub fn update_draft(&mut self, set: &str, key: &EntityKey, patch: &Record) -> DraftResult<Record> {
        ops::update_draft(self, set, key, patch)
    }

    /// Merge a patch into the active version.
    pub fn update_active(&mut self, set: &str, key: &EntityKey, patch: &Record) -> DraftResult<Record> {
        ops::update_active(self, set, key, patch)
    }

    /// Discard the draft version. Returns the remaining active record, if any.
    pub fn delete_draft(&mut self, set: &str, key: &EntityKey) -> DraftResult<Option<Record>> {
        ops::delete_draft(self, set, key)
    }

    /// Replace the active version by the draft (`draftActivate`).
    pub fn merge_draft(&mut self, set: &str, key: &EntityKey) -> DraftResult<Record> {
        ops::merge_draft(self, set, key)
    }

    /// Remove the active version and any draft of it.
    pub fn delete_active(&mut self, set: &str, key: &EntityKey) -> DraftResult<()> {
        ops::delete_active(self, set, key)
    }
}

// ==================== RECORD HELPERS ====================

/// Extract the business key of a record for an entity set.
pub(crate) fn key_of(def: &EntitySetDef, record: &Record) -> DraftResult<EntityKey> {
    for property in &def.key_properties {
        if record.get(property).map_or(true, Value::is_null) {
            return Err(DraftError::missing_key(&def.name, property));
        }
    }
    record
        .key(&def.key_properties)
        .ok_or_else(|| DraftError::missing_key(&def.name, def.key_properties.join(",")))
}

/// Remove properties the store computes itself.
pub(crate) fn strip_draft_properties(mut record: Record) -> Record {
    for flag in DRAFT_FLAGS {
        record.remove(flag);
    }
    record.remove(DRAFT_ADMINISTRATIVE_DATA);
    record
}

pub(crate) fn stamp_active(def: &EntitySetDef, table: &EntityTable, key: &EntityKey, record: &Record) -> Record {
    let mut out = record.clone();
    if def.draft_enabled {
        out.set(IS_ACTIVE_ENTITY, true);
        out.set(HAS_ACTIVE_ENTITY, false);
        out.set(HAS_DRAFT_ENTITY, table.has_draft(key));
    }
    out
}

pub(crate) fn stamp_draft(def: &EntitySetDef, table: &EntityTable, key: &EntityKey, draft: &DraftRecord) -> Record {
    let mut out = draft.record.clone();
    if def.draft_enabled {
        out.set(IS_ACTIVE_ENTITY, false);
        out.set(HAS_ACTIVE_ENTITY, table.has_active(key));
        out.set(HAS_DRAFT_ENTITY, false);
        out.set(DRAFT_ADMINISTRATIVE_DATA, draft.admin.to_value());
    }
    out
}
