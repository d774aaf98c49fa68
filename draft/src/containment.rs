//! Traversal of contained (composition) children.
//!
//! Draft lifecycle operations on a parent extend to every record reachable
//! through navigation properties marked as containment.

use crate::DraftStore;
use mockd_core::{EntityKey, Record};
use mockd_registry::EntitySetDef;
use std::collections::HashSet;

/// Which version of the records to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Active,
    Draft,
}

/// Returns true if `child` satisfies the referential constraints relative to `parent`.
pub(crate) fn matches_constraints(
    parent: &Record,
    child: &Record,
    constraints: &[(String, String)],
) -> bool {
    constraints.iter().all(|(source, target)| {
        match (parent.get(source), child.get(target)) {
            (Some(p), Some(c)) => !p.is_null() && p == c,
            _ => false,
        }
    })
}

/// Collect `(entity set, key)` of every contained descendant of `parent`,
/// depth first, following the given version.
pub(crate) fn contained_descendants(
    store: &DraftStore,
    set: &EntitySetDef,
    parent: &Record,
    side: Side,
) -> Vec<(String, EntityKey)> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    collect(store, set, parent, side, &mut out, &mut seen);
    out
}

fn collect(
    store: &DraftStore,
    set: &EntitySetDef,
    parent: &Record,
    side: Side,
    out: &mut Vec<(String, EntityKey)>,
    seen: &mut HashSet<(String, EntityKey)>,
) {
    let registry = store.registry();
    for nav in set.contained_navigations() {
        let (Some(target_def), Ok(table)) = (
            registry.entity_set(&nav.target_set),
            store.table(&nav.target_set),
        ) else {
            continue;
        };

        for key in table.keys() {
            let child = match side {
                Side::Active => table.active(key),
                Side::Draft => table.draft(key).map(|d| &d.record),
            };
            let Some(child) = child else {
                continue;
            };
            if !matches_constraints(parent, child, &nav.constraints) {
                continue;
            }
            let entry = (nav.target_set.clone(), key.clone());
            if !seen.insert(entry.clone()) {
                continue;
            }
            out.push(entry);
            collect(store, target_def, child, side, out, seen);
        }
    }
}
