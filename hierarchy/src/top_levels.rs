//! Depth-limited expansion of a hierarchy (`TopLevels`).

use mockd_core::names::{DISTANCE_FROM_ROOT, DRILL_STATE, LIMITED_DESCENDANT_COUNT};
use mockd_core::{KeyValue, Record, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::{HierarchyError, HierarchyIndex, HierarchyResult};

/// Expansion state of a node in a TopLevels result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillState {
    /// No children in the hierarchy.
    Leaf,
    /// Has children, none of them shown.
    Collapsed,
    /// At least one child shown.
    Expanded,
}

impl DrillState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrillState::Leaf => "leaf",
            DrillState::Collapsed => "collapsed",
            DrillState::Expanded => "expanded",
        }
    }
}

impl fmt::Display for DrillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-node override of the expansion depth.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandLevel {
    pub node_id: KeyValue,
    /// Levels shown below the node; `Some(0)` collapses it, None expands fully.
    pub levels: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopLevelsParams {
    /// Number of levels shown from the roots; None shows all.
    pub levels: Option<u32>,
    pub expand_levels: Vec<ExpandLevel>,
}

/// A visited node with its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyRow {
    pub record: Record,
    pub distance_from_root: u32,
    pub drill_state: DrillState,
    pub limited_descendant_count: usize,
}

impl HierarchyRow {
    /// The record with `DistanceFromRoot`, `DrillState` and
    /// `LimitedDescendantCount` set.
    pub fn into_record(self) -> Record {
        let mut record = self.record;
        record.set(DISTANCE_FROM_ROOT, Value::Int(i64::from(self.distance_from_root)));
        record.set(DRILL_STATE, self.drill_state.as_str());
        record.set(
            LIMITED_DESCENDANT_COUNT,
            Value::Int(i64::try_from(self.limited_descendant_count).unwrap_or(i64::MAX)),
        );
        record
    }
}

/// Preorder walk from every root, descending while the level budget allows.
pub fn top_levels(index: &HierarchyIndex, params: &TopLevelsParams) -> HierarchyResult<Vec<HierarchyRow>> {
    top_levels_within(index, index, params)
}

/// Like [`top_levels`], walking `index` while `hierarchy` (the untruncated
/// node set) decides whether a node has children at all.
///
/// A node with children in `hierarchy` but none in `index` is `collapsed`.
pub fn top_levels_within(
    index: &HierarchyIndex,
    hierarchy: &HierarchyIndex,
    params: &TopLevelsParams,
) -> HierarchyResult<Vec<HierarchyRow>> {
    let overrides: HashMap<usize, Option<u32>> = params
        .expand_levels
        .iter()
        .filter_map(|expand| index.position(&expand.node_id).map(|pos| (pos, expand.levels)))
        .collect();

    let mut visited = HashSet::new();
    let mut rows: Vec<HierarchyRow> = Vec::new();
    // Levels counts the roots themselves
    let below_roots = params.levels.map(|levels| levels.saturating_sub(1));
    let mut stack: Vec<Frame> = index
        .roots()
        .iter()
        .rev()
        .map(|&pos| Frame::Enter {
            pos,
            distance: 0,
            budget: below_roots,
        })
        .collect();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter { pos, distance, budget } => {
                if !visited.insert(pos) {
                    return Err(HierarchyError::cycle(index.qualifier(), index.node_id(pos)));
                }
                stack.push(Frame::Exit { pos, slot: rows.len() });
                rows.push(HierarchyRow {
                    record: index.record(pos).clone(),
                    distance_from_root: distance,
                    drill_state: DrillState::Leaf,
                    limited_descendant_count: 0,
                });

                let budget = overrides.get(&pos).copied().unwrap_or(budget);
                if budget != Some(0) {
                    let below = budget.map(|levels| levels - 1);
                    stack.extend(index.children(pos).iter().rev().map(|&child| Frame::Enter {
                        pos: child,
                        distance: distance + 1,
                        budget: below,
                    }));
                }
            }
            Frame::Exit { pos, slot } => {
                // Everything emitted after the slot so far sits below it
                let shown = rows.len() - slot - 1;
                let row = &mut rows[slot];
                row.limited_descendant_count = shown;
                row.drill_state = if shown > 0 {
                    DrillState::Expanded
                } else if has_children(index, hierarchy, pos) {
                    DrillState::Collapsed
                } else {
                    DrillState::Leaf
                };
            }
        }
    }

    tracing::debug!(
        qualifier = index.qualifier(),
        levels = ?params.levels,
        overrides = params.expand_levels.len(),
        rows = rows.len(),
        "top levels"
    );
    Ok(rows)
}

enum Frame {
    Enter { pos: usize, distance: u32, budget: Option<u32> },
    Exit { pos: usize, slot: usize },
}

fn has_children(index: &HierarchyIndex, hierarchy: &HierarchyIndex, pos: usize) -> bool {
    if !index.children(pos).is_empty() {
        return true;
    }
    hierarchy
        .position(index.node_id(pos))
        .is_some_and(|full| !hierarchy.children(full).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::{def, node, sales_rows};
    use crate::ancestors;

    fn summary(rows: &[HierarchyRow]) -> Vec<(String, u32, DrillState, usize)> {
        rows.iter()
            .map(|row| {
                (
                    row.record.get("ID").and_then(Value::as_str).unwrap_or_default().to_string(),
                    row.distance_from_root,
                    row.drill_state,
                    row.limited_descendant_count,
                )
            })
            .collect()
    }

    fn levels(levels: u32) -> TopLevelsParams {
        TopLevelsParams {
            levels: Some(levels),
            expand_levels: Vec::new(),
        }
    }

    #[test]
    fn test_two_levels() {
        // GIVEN
        let index = HierarchyIndex::build(sales_rows(), &def()).unwrap();

        // WHEN
        let rows = top_levels(&index, &levels(2)).unwrap();

        // THEN
        assert_eq!(
            summary(&rows),
            vec![
                ("Sales".to_string(), 0, DrillState::Expanded, 2),
                ("EMEA".to_string(), 1, DrillState::Collapsed, 0),
                ("US".to_string(), 1, DrillState::Collapsed, 0),
            ]
        );
    }

    #[test]
    fn test_expand_levels_override() {
        // GIVEN
        let index = HierarchyIndex::build(sales_rows(), &def()).unwrap();
        let params = TopLevelsParams {
            levels: Some(2),
            expand_levels: vec![ExpandLevel {
                node_id: KeyValue::from("EMEA"),
                levels: Some(1),
            }],
        };

        // WHEN
        let rows = top_levels(&index, &params).unwrap();

        // THEN
        assert_eq!(
            summary(&rows),
            vec![
                ("Sales".to_string(), 0, DrillState::Expanded, 3),
                ("EMEA".to_string(), 1, DrillState::Expanded, 1),
                ("EMEA Central".to_string(), 2, DrillState::Leaf, 0),
                ("US".to_string(), 1, DrillState::Collapsed, 0),
            ]
        );
    }

    #[test]
    fn test_collapse_override_and_unlimited() {
        let index = HierarchyIndex::build(sales_rows(), &def()).unwrap();
        let params = TopLevelsParams {
            levels: None,
            expand_levels: vec![ExpandLevel {
                node_id: KeyValue::from("US"),
                levels: Some(0),
            }],
        };
        let rows = top_levels(&index, &params).unwrap();
        let ids: Vec<_> = summary(&rows).into_iter().map(|(id, ..)| id).collect();
        assert_eq!(ids, vec!["Sales", "EMEA", "EMEA Central", "US"]);
        assert_eq!(rows[3].drill_state, DrillState::Collapsed);
    }

    #[test]
    fn test_full_expansion_from_override() {
        let index = HierarchyIndex::build(sales_rows(), &def()).unwrap();
        let params = TopLevelsParams {
            levels: Some(1),
            expand_levels: vec![ExpandLevel {
                node_id: KeyValue::from("Sales"),
                levels: None,
            }],
        };
        let rows = top_levels(&index, &params).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].limited_descendant_count, 4);
    }

    #[test]
    fn test_active_view_with_draft_in_root_collection() {
        // GIVEN: EMEA has a draft, the seeds are the active rows
        let mut all = sales_rows();
        all.insert(2, node("EMEA", Some("Sales")).with("IsActiveEntity", false));
        let root_index = HierarchyIndex::build(all, &def()).unwrap();
        let nodes = ancestors(&root_index, &sales_rows(), None, true).unwrap();

        // WHEN
        let index = HierarchyIndex::build(nodes, &def()).unwrap();
        let rows = top_levels(&index, &levels(2)).unwrap();

        // THEN
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.record.is_active() == Some(true)));
        assert_eq!(rows[0].drill_state, DrillState::Expanded);
        assert_eq!(rows[0].limited_descendant_count, 2);
    }

    #[test]
    fn test_into_record_annotations() {
        let row = HierarchyRow {
            record: node("Sales", None),
            distance_from_root: 0,
            drill_state: DrillState::Expanded,
            limited_descendant_count: 2,
        };
        let record = row.into_record();
        assert_eq!(record.get("DistanceFromRoot"), Some(&Value::Int(0)));
        assert_eq!(record.get("DrillState"), Some(&Value::from("expanded")));
        assert_eq!(record.get("LimitedDescendantCount"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_truncated_input_keeps_collapsed_nodes() {
        // GIVEN: only the path Sales -> EMEA survives an upstream restriction
        let full = HierarchyIndex::build(sales_rows(), &def()).unwrap();
        let input = vec![node("Sales", None), node("EMEA", Some("Sales"))];
        let index = HierarchyIndex::build(input, &def()).unwrap();

        // WHEN
        let rows = top_levels_within(&index, &full, &levels(3)).unwrap();

        // THEN
        assert_eq!(
            summary(&rows),
            vec![
                ("Sales".to_string(), 0, DrillState::Expanded, 1),
                ("EMEA".to_string(), 1, DrillState::Collapsed, 0),
            ]
        );
        let alone = top_levels(&index, &levels(3)).unwrap();
        assert_eq!(alone[1].drill_state, DrillState::Leaf);
    }

    #[test]
    fn test_deep_chain() {
        // GIVEN
        let depth = 20_000;
        let ids: Vec<String> = (0..depth).map(|n| format!("N{}", n)).collect();
        let rows: Vec<Record> = ids
            .iter()
            .enumerate()
            .map(|(n, id)| node(id, n.checked_sub(1).map(|p| ids[p].as_str())))
            .collect();
        let index = HierarchyIndex::build(rows, &def()).unwrap();

        // WHEN
        let rows = top_levels(&index, &TopLevelsParams::default()).unwrap();

        // THEN
        assert_eq!(rows.len(), depth);
        assert_eq!(rows[0].limited_descendant_count, depth - 1);
        assert_eq!(rows[0].drill_state, DrillState::Expanded);
        let last = &rows[depth - 1];
        assert_eq!(last.distance_from_root, (depth - 1) as u32);
        assert_eq!(last.drill_state, DrillState::Leaf);
    }

    #[test]
    fn test_leaf_count_is_zero() {
        let index = HierarchyIndex::build(vec![node("Solo", None)], &def()).unwrap();
        let rows = top_levels(&index, &TopLevelsParams::default()).unwrap();
        assert_eq!(summary(&rows), vec![("Solo".to_string(), 0, DrillState::Leaf, 0)]);
    }
}
