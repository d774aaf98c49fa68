//! Service responses.

use mockd_core::names::{CREATED_BY_USER, DRAFT_ADMINISTRATIVE_DATA, DRAFT_IS_CREATED_BY_ME};
use mockd_core::{EntityKey, Record, Value};
use serde_json::{json, Value as Json};

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// A collection read; `count` is set when `$count=true` was requested.
    Rows { rows: Vec<Record>, count: Option<usize> },
    Entity(Record),
    Deleted(EntityKey),
}

impl Response {
    /// Rows of a collection response, or the single entity.
    pub fn rows(&self) -> &[Record] {
        match self {
            Response::Rows { rows, .. } => rows,
            Response::Entity(record) => std::slice::from_ref(record),
            Response::Deleted(_) => &[],
        }
    }

    pub fn entity(&self) -> Option<&Record> {
        match self {
            Response::Entity(record) => Some(record),
            _ => None,
        }
    }

    /// Recompute `DraftIsCreatedByMe` on every draft for the requesting principal.
    pub(crate) fn for_principal(self, principal: &str) -> Self {
        match self {
            Response::Rows { rows, count } => Response::Rows {
                rows: rows.into_iter().map(|row| mark_draft_owner(row, principal)).collect(),
                count,
            },
            Response::Entity(record) => Response::Entity(mark_draft_owner(record, principal)),
            deleted @ Response::Deleted(_) => deleted,
        }
    }

    /// JSON payload in the shape the protocol uses.
    pub fn to_json(&self) -> Json {
        match self {
            Response::Rows { rows, count } => {
                let value: Vec<Json> = rows.iter().map(Record::to_json).collect();
                match count {
                    Some(count) => json!({ "@odata.count": count, "value": value }),
                    None => json!({ "value": value }),
                }
            }
            Response::Entity(record) => record.to_json(),
            Response::Deleted(_) => Json::Null,
        }
    }
}

fn mark_draft_owner(mut record: Record, principal: &str) -> Record {
    let Some(Value::Object(admin)) = record.get(DRAFT_ADMINISTRATIVE_DATA) else {
        return record;
    };
    let mut admin = admin.clone();
    let created_by_me = admin.get(CREATED_BY_USER).and_then(Value::as_str) == Some(principal);
    admin.insert(DRAFT_IS_CREATED_BY_ME.to_string(), Value::Bool(created_by_me));
    record.set(DRAFT_ADMINISTRATIVE_DATA, Value::Object(admin));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockd_core::{props, DraftAdministrativeData};

    #[test]
    fn test_collection_json() {
        let response = Response::Rows {
            rows: vec![props! { "ID" => "Sales", "DistanceFromRoot" => 0i64 }],
            count: Some(3),
        };
        assert_eq!(
            response.to_json(),
            json!({ "@odata.count": 3, "value": [{ "ID": "Sales", "DistanceFromRoot": 0 }] })
        );
        assert_eq!(response.rows().len(), 1);
    }

    #[test]
    fn test_deleted_has_no_payload() {
        let response = Response::Deleted(EntityKey::single("ID", "US"));
        assert!(response.rows().is_empty());
        assert_eq!(response.to_json(), Json::Null);
    }

    #[test]
    fn test_draft_ownership_follows_principal() {
        // GIVEN
        let admin = DraftAdministrativeData::new("uuid-1", "alice").to_value();
        let draft = props! { "ID" => "EMEA", "IsActiveEntity" => false }.with(DRAFT_ADMINISTRATIVE_DATA, admin);

        // WHEN
        let mine = Response::Entity(draft.clone()).for_principal("alice");
        let theirs = Response::Rows {
            rows: vec![draft],
            count: None,
        }
        .for_principal("bob");

        // THEN
        let created_by_me = |response: &Response| {
            response.rows()[0]
                .get(DRAFT_ADMINISTRATIVE_DATA)
                .and_then(Value::as_object)
                .and_then(|admin| admin.get(DRAFT_IS_CREATED_BY_ME))
                .cloned()
        };
        assert_eq!(created_by_me(&mine), Some(Value::Bool(true)));
        assert_eq!(created_by_me(&theirs), Some(Value::Bool(false)));
    }
}
