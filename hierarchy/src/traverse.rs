//! Ancestor and descendant closures.

use mockd_core::Record;
use std::collections::{HashMap, HashSet};

use crate::{HierarchyError, HierarchyIndex, HierarchyResult};

/// Seeds plus every ancestor up to `max_distance` levels above them.
///
/// The result is in index order. A node that is also a seed is returned in
/// the seed's version; other nodes in the version held by the index. With
/// `keep_start = false` a seed is only kept if it is an ancestor of another
/// seed.
pub fn ancestors(
    index: &HierarchyIndex,
    seeds: &[Record],
    max_distance: Option<u32>,
    keep_start: bool,
) -> HierarchyResult<Vec<Record>> {
    closure(index, seeds, max_distance, keep_start, HierarchyIndex::parent_link)
}

/// Seeds plus every descendant up to `max_distance` levels below them.
pub fn descendants(
    index: &HierarchyIndex,
    seeds: &[Record],
    max_distance: Option<u32>,
    keep_start: bool,
) -> HierarchyResult<Vec<Record>> {
    closure(index, seeds, max_distance, keep_start, HierarchyIndex::children)
}

fn closure<'i>(
    index: &'i HierarchyIndex,
    seeds: &[Record],
    max_distance: Option<u32>,
    keep_start: bool,
    next: impl Fn(&'i HierarchyIndex, usize) -> &'i [usize],
) -> HierarchyResult<Vec<Record>> {
    let mut seed_records: HashMap<usize, &Record> = HashMap::new();
    for seed in seeds {
        match index.position_of(seed) {
            Some(pos) => {
                seed_records.entry(pos).or_insert(seed);
            }
            None => tracing::debug!(qualifier = index.qualifier(), "seed is not part of the hierarchy"),
        }
    }

    let mut included = vec![false; index.len()];
    let mut starts: Vec<usize> = seed_records.keys().copied().collect();
    starts.sort_unstable();

    for start in starts {
        if keep_start {
            included[start] = true;
        }
        let mut visited = HashSet::from([start]);
        let mut pending = vec![(start, 0u32)];
        while let Some((pos, distance)) = pending.pop() {
            if max_distance.is_some_and(|max| distance >= max) {
                continue;
            }
            for &reached in next(index, pos) {
                if !visited.insert(reached) {
                    return Err(HierarchyError::cycle(index.qualifier(), index.node_id(reached)));
                }
                included[reached] = true;
                pending.push((reached, distance + 1));
            }
        }
    }

    let rows: Vec<Record> = included
        .iter()
        .enumerate()
        .filter(|(_, keep)| **keep)
        .map(|(pos, _)| {
            seed_records
                .get(&pos)
                .map_or_else(|| index.record(pos).clone(), |seed| (*seed).clone())
        })
        .collect();
    tracing::debug!(qualifier = index.qualifier(), seeds = seeds.len(), rows = rows.len(), "hierarchy closure");
    Ok(rows)
}
