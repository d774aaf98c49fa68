//! Request dispatch over a shared draft store.

use mockd_core::Record;
use mockd_draft::DraftStore;
use mockd_parser::ResourcePath;
use mockd_query::{
    entity_address, select_rows, target_entity_set, EntityAddress, PipelineEvaluator, QueryError,
    QueryOptions, RecordSource,
};
use mockd_registry::Registry;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::{Method, Request, Response, ServiceConfig, ServiceError, ServiceResult};

/// Store shared by every request of one service.
pub type SharedStore = Arc<RwLock<DraftStore>>;

/// Bound draft actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftAction {
    Edit,
    Activate,
    Prepare,
    Discard,
}

impl DraftAction {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "draftEdit" => Some(DraftAction::Edit),
            "draftActivate" => Some(DraftAction::Activate),
            "draftPrepare" => Some(DraftAction::Prepare),
            "draftDiscard" => Some(DraftAction::Discard),
            _ => None,
        }
    }
}

/// One modeled service: schema, data and settings.
pub struct Service {
    registry: Arc<Registry>,
    store: SharedStore,
    config: ServiceConfig,
}

impl Service {
    pub fn new(store: DraftStore, config: ServiceConfig) -> Self {
        let store = store.with_contained_copy(config.copy_contained_on_edit);
        Self {
            registry: store.shared_registry(),
            store: Arc::new(RwLock::new(store)),
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Execute one request. Mutations are committed before this returns.
    pub fn execute(&self, request: &Request) -> ServiceResult<Response> {
        let result = match request.method {
            Method::Get => self.read(request),
            Method::Post => match &request.action {
                Some(action) => self.perform_action(request, action),
                None => self.create(request),
            },
            Method::Patch => self.update(request),
            Method::Delete => self.delete(request),
        };
        if let Err(err) = &result {
            tracing::warn!(method = %request.method, path = %request.path, error = %err, "request rejected");
        }
        result.map(|response| response.for_principal(self.principal(request)))
    }

    // ==================== READS ====================

    fn read(&self, request: &Request) -> ServiceResult<Response> {
        if let Some(action) = &request.action {
            return Err(ServiceError::unsupported_action(action));
        }
        let store = self.store.read();

        if let Some(address) = entity_address(&self.registry, &request.path)? {
            tracing::debug!(entity_set = %address.entity_set, key = %address.key, "read entity");
            let record = resolve(&store, &address)?;
            return Ok(Response::Entity(self.project(record, &request.options, &address.entity_set)?));
        }

        let entity_set = target_entity_set(&self.registry, &request.path)?;
        let rows = store.collection(&request.path)?;
        tracing::debug!(
            entity_set = %entity_set.name,
            rows = rows.len(),
            steps = request.options.apply.len(),
            "read collection"
        );
        let evaluator = PipelineEvaluator::new(&self.registry, &*store, entity_set);
        let rows = evaluator.evaluate(&request.options.apply, rows)?;
        let page = request
            .options
            .clone()
            .with_page_limit(self.config.max_page_size)
            .apply(rows, entity_set)?;
        Ok(Response::Rows {
            rows: page.rows,
            count: page.count,
        })
    }

    fn project(&self, record: Record, options: &QueryOptions, entity_set: &str) -> ServiceResult<Record> {
        let Some(names) = &options.select else {
            return Ok(record);
        };
        let def = self
            .registry
            .entity_set(entity_set)
            .ok_or_else(|| QueryError::unknown_entity_set(entity_set))?;
        let mut rows = select_rows(vec![record], names, def)?;
        rows.pop()
            .ok_or_else(|| ServiceError::invalid_request("projection dropped the entity"))
    }

    // ==================== ACTIONS ====================

    fn perform_action(&self, request: &Request, action: &str) -> ServiceResult<Response> {
        let address = self.address(request)?;
        let local = self.action_name(action)?;
        let draft_action = DraftAction::from_name(local).ok_or_else(|| ServiceError::unsupported_action(action))?;
        let principal = self.principal(request);

        let mut store = self.store.write();
        let set = address.entity_set.as_str();
        let record = match draft_action {
            DraftAction::Edit => store.create_draft(set, &address.key, principal)?,
            DraftAction::Activate => store.merge_draft(set, &address.key)?,
            DraftAction::Prepare => store.resolve_version(set, &address.key, false)?,
            DraftAction::Discard => match store.delete_draft(set, &address.key)? {
                Some(active) => active,
                None => return Ok(Response::Deleted(address.key)),
            },
        };
        Ok(Response::Entity(self.project(record, &request.options, set)?))
    }

    /// Strip the action's namespace qualifier.
    fn action_name<'a>(&self, action: &'a str) -> ServiceResult<&'a str> {
        if self.config.strict_actions {
            let local = self.registry.local_action_name(action);
            if local.contains('.') {
                return Err(ServiceError::unsupported_action(action));
            }
            Ok(local)
        } else {
            Ok(action.rsplit('.').next().unwrap_or(action))
        }
    }

    // ==================== WRITES ====================

    /// POST to a collection: a draft-only entity for draft-enabled sets,
    /// an active one otherwise. Posting through a navigation property fills
    /// the referential constraints from the parent.
    fn create(&self, request: &Request) -> ServiceResult<Response> {
        if entity_address(&self.registry, &request.path)?.is_some() {
            return Err(ServiceError::method_not_allowed(request.method, &request.path));
        }
        let mut record = self.body(request)?.clone();
        let def = target_entity_set(&self.registry, &request.path)?;

        let mut store = self.store.write();
        if let Some((parent_path, navigation)) = split_navigation(&request.path) {
            let parent_set = target_entity_set(&self.registry, &parent_path)?;
            let nav = parent_set
                .navigation(navigation)
                .ok_or_else(|| QueryError::unknown_navigation(&parent_set.name, navigation))?;
            let parent = store
                .collection(&parent_path)?
                .into_iter()
                .next()
                .ok_or_else(|| ServiceError::invalid_request(format!("no parent at {}", parent_path)))?;
            for (source, target) in &nav.constraints {
                if let Some(value) = parent.get(source) {
                    record.set(target.clone(), value.clone());
                }
            }
        }

        let created = if def.is_draft_enabled() {
            store.create_new_draft(&def.name, record, self.principal(request))?
        } else {
            store.insert_active(&def.name, record)?
        };
        Ok(Response::Entity(created))
    }

    /// PATCH the addressed version; without a version flag, the visible one.
    fn update(&self, request: &Request) -> ServiceResult<Response> {
        let address = self.address(request)?;
        let patch = self.body(request)?;
        let set = address.entity_set.as_str();

        let mut store = self.store.write();
        let is_active = match address.is_active {
            Some(is_active) => is_active,
            None => !store.table(set)?.has_draft(&address.key),
        };
        let record = if is_active {
            store.update_active(set, &address.key, patch)?
        } else {
            store.update_draft(set, &address.key, patch)?
        };
        Ok(Response::Entity(record))
    }

    fn delete(&self, request: &Request) -> ServiceResult<Response> {
        let address = self.address(request)?;
        let set = address.entity_set.as_str();

        let mut store = self.store.write();
        if address.is_active == Some(false) {
            store.delete_draft(set, &address.key)?;
        } else {
            store.delete_active(set, &address.key)?;
        }
        Ok(Response::Deleted(address.key))
    }

    // ==================== HELPERS ====================

    fn address(&self, request: &Request) -> ServiceResult<EntityAddress> {
        entity_address(&self.registry, &request.path)?
            .ok_or_else(|| ServiceError::method_not_allowed(request.method, &request.path))
    }

    fn body<'r>(&self, request: &'r Request) -> ServiceResult<&'r Record> {
        request
            .body
            .as_ref()
            .ok_or_else(|| ServiceError::invalid_request("request body required"))
    }

    fn principal<'r>(&'r self, request: &'r Request) -> &'r str {
        request
            .principal
            .as_deref()
            .unwrap_or(&self.config.default_principal)
    }
}

fn resolve(store: &DraftStore, address: &EntityAddress) -> ServiceResult<Record> {
    let record = match address.is_active {
        Some(is_active) => store.resolve_version(&address.entity_set, &address.key, is_active)?,
        None => store.resolve(&address.entity_set, &address.key)?,
    };
    Ok(record)
}

/// `Set(key)/_Nav` -> (`Set(key)`, `_Nav`)
fn split_navigation(path: &ResourcePath) -> Option<(ResourcePath, &str)> {
    let (last, parent) = path.segments.split_last()?;
    if parent.is_empty() {
        return None;
    }
    Some((
        ResourcePath {
            rooted: path.rooted,
            segments: parent.to_vec(),
        },
        last.name.as_str(),
    ))
}
