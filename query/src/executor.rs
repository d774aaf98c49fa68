//! Pipeline execution.

use mockd_core::Record;
use mockd_hierarchy::{ancestors, descendants, top_levels_within, HierarchyError, HierarchyIndex, HierarchyRow};
use mockd_parser::{HierarchyTraversal, PathSegment, ResourcePath, TransformationStep};
use mockd_registry::{EntitySetDef, HierarchyDef, Registry};

use crate::operators::{filter_rows, order_rows, skip_rows, top_rows};
use crate::plan::{HierarchyFunction, TopLevelsCall};
use crate::source::{target_entity_set, RecordSource};
use crate::{QueryError, QueryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ancestors,
    Descendants,
}

/// Runs transformation steps over the rows of one entity set.
pub struct PipelineEvaluator<'a, S: RecordSource + ?Sized> {
    registry: &'a Registry,
    source: &'a S,
    entity_set: &'a EntitySetDef,
}

impl<'a, S: RecordSource + ?Sized> PipelineEvaluator<'a, S> {
    pub fn new(registry: &'a Registry, source: &'a S, entity_set: &'a EntitySetDef) -> Self {
        Self {
            registry,
            source,
            entity_set,
        }
    }

    /// Apply `steps` in order; each step consumes the previous step's output.
    pub fn evaluate(&self, steps: &[TransformationStep], rows: Vec<Record>) -> QueryResult<Vec<Record>> {
        let mut rows = rows;
        for step in steps {
            let before = rows.len();
            rows = self.execute_step(step, rows)?;
            tracing::debug!(
                entity_set = %self.entity_set.name,
                step = step.kind(),
                before,
                rows = rows.len(),
                "applied transformation"
            );
        }
        Ok(rows)
    }

    fn execute_step(&self, step: &TransformationStep, rows: Vec<Record>) -> QueryResult<Vec<Record>> {
        match step {
            TransformationStep::Filter(expr) => filter_rows(rows, expr, self.entity_set),
            TransformationStep::Ancestors(traversal) => self.traverse(traversal, rows, Direction::Ancestors),
            TransformationStep::Descendants(traversal) => self.traverse(traversal, rows, Direction::Descendants),
            TransformationStep::CustomFunction { name, parameters } => {
                match HierarchyFunction::resolve(self.registry, name, parameters)? {
                    HierarchyFunction::TopLevels(call) => self.top_levels(&call, rows),
                }
            }
            TransformationStep::OrderBy(terms) => {
                let mut rows = rows;
                order_rows(&mut rows, terms, self.entity_set)?;
                Ok(rows)
            }
            TransformationStep::Skip(count) => Ok(skip_rows(rows, *count)),
            TransformationStep::Top(count) => Ok(top_rows(rows, *count)),
        }
    }

    /// Seeds come from the input transformations applied to the current
    /// rows; the closure runs over the hierarchy root collection.
    fn traverse(
        &self,
        traversal: &HierarchyTraversal,
        rows: Vec<Record>,
        direction: Direction,
    ) -> QueryResult<Vec<Record>> {
        let root_set = target_entity_set(self.registry, &traversal.hierarchy_root)?;
        let def = hierarchy_def(root_set, &traversal.qualifier, &traversal.node_property)?;

        let seeds = self.evaluate(&traversal.input_transformations, rows)?;
        let nodes = self.source.collection(&traversal.hierarchy_root)?;
        let index = HierarchyIndex::build(nodes, def)?;

        let rows = match direction {
            Direction::Ancestors => ancestors(&index, &seeds, traversal.maximum_distance, traversal.keep_start)?,
            Direction::Descendants => {
                descendants(&index, &seeds, traversal.maximum_distance, traversal.keep_start)?
            }
        };
        Ok(rows)
    }

    /// Annotate the current rows. The walk covers only these rows, while
    /// the has-children test consults the whole `HierarchyNodes` collection.
    fn top_levels(&self, call: &TopLevelsCall, rows: Vec<Record>) -> QueryResult<Vec<Record>> {
        let (set, nodes_path) = match &call.hierarchy_nodes {
            Some(path) => (target_entity_set(self.registry, path)?, path.clone()),
            None => (
                self.entity_set,
                ResourcePath {
                    rooted: true,
                    segments: vec![PathSegment::new(&self.entity_set.name)],
                },
            ),
        };
        let def = hierarchy_def(set, &call.qualifier, &call.node_property)?;
        let index = HierarchyIndex::build(rows, def)?;
        let hierarchy = HierarchyIndex::build(self.source.collection(&nodes_path)?, def)?;
        Ok(top_levels_within(&index, &hierarchy, &call.params)?
            .into_iter()
            .map(HierarchyRow::into_record)
            .collect())
    }
}

fn hierarchy_def<'d>(set: &'d EntitySetDef, qualifier: &str, node_property: &str) -> QueryResult<&'d HierarchyDef> {
    let def = set
        .hierarchy(qualifier)
        .ok_or_else(|| QueryError::unknown_hierarchy(&set.name, qualifier))?;
    if def.node_property != node_property {
        return Err(HierarchyError::unknown_property(qualifier, node_property).into());
    }
    Ok(def)
}
