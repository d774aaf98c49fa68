//! Adjacency index over a flat record set.

use mockd_core::{KeyValue, Record};
use mockd_draft::prefer_visible;
use mockd_registry::HierarchyDef;
use std::collections::HashMap;

use crate::{HierarchyError, HierarchyResult};

/// Parent/child structure of one hierarchy over a record set.
///
/// Nodes are kept in input order; the position of a node is the position
/// of the first row carrying its id. Children are listed in the same order,
/// so an upstream sort carries over to siblings.
#[derive(Debug, Clone)]
pub struct HierarchyIndex {
    qualifier: String,
    node_property: String,
    nodes: Vec<Record>,
    ids: Vec<KeyValue>,
    positions: HashMap<KeyValue, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl HierarchyIndex {
    /// Build the index for `def` over `rows`.
    ///
    /// Rows sharing a node id collapse into one node, the draft version
    /// winning. A parent reference that is null, absent or unknown makes the
    /// node a root.
    pub fn build(rows: impl IntoIterator<Item = Record>, def: &HierarchyDef) -> HierarchyResult<Self> {
        let mut nodes: Vec<Record> = Vec::new();
        let mut ids = Vec::new();
        let mut positions = HashMap::new();

        for row in rows {
            let id = row
                .get(&def.node_property)
                .and_then(KeyValue::from_value)
                .ok_or_else(|| HierarchyError::unknown_property(&def.qualifier, &def.node_property))?;
            match positions.get(&id) {
                Some(&pos) => {
                    if std::ptr::eq(prefer_visible(&nodes[pos], &row), &row) {
                        nodes[pos] = row;
                    }
                }
                None => {
                    positions.insert(id.clone(), nodes.len());
                    ids.push(id);
                    nodes.push(row);
                }
            }
        }

        let parents: Vec<Option<usize>> = nodes
            .iter()
            .map(|node| {
                node.get(&def.parent_property)
                    .and_then(KeyValue::from_value)
                    .and_then(|parent| positions.get(&parent).copied())
            })
            .collect();

        let mut children = vec![Vec::new(); nodes.len()];
        let mut roots = Vec::new();
        for (pos, parent) in parents.iter().enumerate() {
            match parent {
                Some(parent) => children[*parent].push(pos),
                None => roots.push(pos),
            }
        }

        let index = Self {
            qualifier: def.qualifier.clone(),
            node_property: def.node_property.clone(),
            nodes,
            ids,
            positions,
            parents,
            children,
            roots,
        };
        index.check_acyclic()?;
        tracing::debug!(qualifier = %index.qualifier, nodes = index.len(), roots = index.roots.len(), "built hierarchy index");
        Ok(index)
    }

    /// Follow every parent chain once; a chain that re-enters itself is a cycle.
    fn check_acyclic(&self) -> HierarchyResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unseen,
            OnPath,
            Done,
        }

        let mut marks = vec![Mark::Unseen; self.len()];
        for start in 0..self.len() {
            let mut path = Vec::new();
            let mut current = Some(start);
            while let Some(pos) = current {
                match marks[pos] {
                    Mark::Done => break,
                    Mark::OnPath => return Err(HierarchyError::cycle(&self.qualifier, &self.ids[pos])),
                    Mark::Unseen => {
                        marks[pos] = Mark::OnPath;
                        path.push(pos);
                        current = self.parents[pos];
                    }
                }
            }
            for pos in path {
                marks[pos] = Mark::Done;
            }
        }
        Ok(())
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn node_property(&self) -> &str {
        &self.node_property
    }

    /// Number of distinct nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of the node with the given id.
    pub fn position(&self, id: &KeyValue) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Position of the node a record belongs to.
    pub fn position_of(&self, record: &Record) -> Option<usize> {
        record
            .get(&self.node_property)
            .and_then(KeyValue::from_value)
            .and_then(|id| self.position(&id))
    }

    pub fn node_id(&self, pos: usize) -> &KeyValue {
        &self.ids[pos]
    }

    pub fn record(&self, pos: usize) -> &Record {
        &self.nodes[pos]
    }

    pub fn parent(&self, pos: usize) -> Option<usize> {
        self.parents[pos]
    }

    /// The parent link as a slice of zero or one positions.
    pub(crate) fn parent_link(&self, pos: usize) -> &[usize] {
        self.parents[pos].as_slice()
    }

    pub fn children(&self, pos: usize) -> &[usize] {
        &self.children[pos]
    }

    /// Root nodes in input order.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }
}
