//! `orders` collection mapping on top of the Firestore client.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::firestore::{self, Document, FirestoreClient};
use super::types::BackendError;
use super::{ORDERS_COLLECTION, OrderStore};
use crate::model::{OrderStatus, OrderUpdate, ServiceOrder, TimestampWrite};

const FIELD_PATRIMONY: &str = "patrimony";
const FIELD_DESCRIPTION: &str = "description";
const FIELD_STATUS: &str = "status";
const FIELD_SOLUTION: &str = "solution";
const FIELD_CREATED_AT: &str = "created_at";
const FIELD_CLOSED_AT: &str = "closed_at";

#[async_trait]
impl OrderStore for FirestoreClient {
    async fn get_order(&self, id: &str) -> Result<ServiceOrder, BackendError> {
        let doc = self.get_document(ORDERS_COLLECTION, id).await?;
        decode_order(&doc)
    }

    async fn update_order(&self, id: &str, update: &OrderUpdate) -> Result<(), BackendError> {
        firestore::check_document_id(ORDERS_COLLECTION, id)?;
        if update.is_empty() {
            return Ok(());
        }
        let name = self.config().document_name(ORDERS_COLLECTION, id);
        let write = encode_update(&name, update)?;
        self.commit(vec![write], &format!("{ORDERS_COLLECTION}/{id}")).await
    }

    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<ServiceOrder>, BackendError> {
        let docs = self.run_query(status_query(status)).await?;
        let mut orders = docs.iter().map(decode_order).collect::<Result<Vec<_>, _>>()?;
        newest_first(&mut orders);
        Ok(orders)
    }
}

/// Most recently registered orders first.
pub(crate) fn newest_first(orders: &mut [ServiceOrder]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Map a stored document onto `ServiceOrder`.
pub(crate) fn decode_order(doc: &Document) -> Result<ServiceOrder, BackendError> {
    let status = doc
        .string(FIELD_STATUS)?
        .parse::<OrderStatus>()
        .map_err(BackendError::Parse)?;

    Ok(ServiceOrder {
        id: doc.id().to_owned(),
        patrimony: doc.string(FIELD_PATRIMONY)?,
        description: doc.optional_string(FIELD_DESCRIPTION)?.unwrap_or_default(),
        status,
        solution: doc.optional_string(FIELD_SOLUTION)?.unwrap_or_default(),
        created_at: doc.timestamp(FIELD_CREATED_AT)?,
        closed_at: doc.optional_timestamp(FIELD_CLOSED_AT)?,
    })
}

/// Build one commit write for a partial update.
///
/// Plain fields go through `updateMask` so untouched fields survive.
/// `ServerTime` becomes a `REQUEST_TIME` transform instead of a value, and
/// the write requires the document to already exist.
pub(crate) fn encode_update(name: &str, update: &OrderUpdate) -> Result<Value, BackendError> {
    let mut fields = Map::new();
    let mut mask = Vec::new();
    let mut transforms = Vec::new();

    if let Some(status) = update.status {
        fields.insert(FIELD_STATUS.to_owned(), firestore::string_value(status.as_str()));
        mask.push(FIELD_STATUS);
    }
    if let Some(solution) = &update.solution {
        fields.insert(FIELD_SOLUTION.to_owned(), firestore::string_value(solution));
        mask.push(FIELD_SOLUTION);
    }
    match update.closed_at {
        Some(TimestampWrite::ServerTime) => transforms.push(firestore::server_time_transform(FIELD_CLOSED_AT)),
        Some(TimestampWrite::At(ts)) => {
            fields.insert(FIELD_CLOSED_AT.to_owned(), firestore::timestamp_value(ts)?);
            mask.push(FIELD_CLOSED_AT);
        }
        None => {}
    }

    let mut write = serde_json::json!({
        "update": { "name": name, "fields": fields },
        "updateMask": { "fieldPaths": mask },
        "currentDocument": { "exists": true },
    });
    if !transforms.is_empty() {
        write["updateTransforms"] = Value::Array(transforms);
    }
    Ok(write)
}

/// Structured query selecting every order with the given status.
pub(crate) fn status_query(status: OrderStatus) -> Value {
    serde_json::json!({
        "from": [{ "collectionId": ORDERS_COLLECTION }],
        "where": {
            "fieldFilter": {
                "field": { "fieldPath": FIELD_STATUS },
                "op": "EQUAL",
                "value": firestore::string_value(status.as_str()),
            }
        }
    })
}

#[cfg(test)]
#[path = "orders_test.rs"]
mod tests;
