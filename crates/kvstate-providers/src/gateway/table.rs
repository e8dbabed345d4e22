//! Table gateway
//!
//! Maps records onto backend items in one table and back. Every field is
//! written on upsert; on read every attribute must be present and well
//! formed, otherwise the read fails with `MalformedAttribute`.

use async_trait::async_trait;
use kvstate_domain::constants::{
    ATTR_PERSISTENCE_ID, ATTR_SHARD_NUMBER, ATTR_STATE_MANIFEST, ATTR_STATE_PAYLOAD,
    ATTR_TIMESTAMP, ATTR_VERSION_NUMBER,
};
use kvstate_domain::error::{Error, Result};
use kvstate_domain::ports::{KeyValueBackend, StateGateway};
use kvstate_domain::value_objects::{AttributeValue, Item, Record};
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Record gateway over a single backend table
#[derive(Clone)]
pub struct TableGateway {
    table: String,
    backend: Arc<dyn KeyValueBackend>,
}

impl TableGateway {
    /// Create a gateway for `table` on `backend`
    pub fn new<S: Into<String>>(table: S, backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            table: table.into(),
            backend,
        }
    }

    /// Table this gateway reads and writes
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// Encode a record as a backend item
pub fn record_to_item(record: &Record) -> Item {
    let mut item = Item::new();
    item.insert(
        ATTR_PERSISTENCE_ID.to_string(),
        AttributeValue::S(record.persistence_id.clone()),
    );
    item.insert(
        ATTR_VERSION_NUMBER.to_string(),
        AttributeValue::number(record.version),
    );
    item.insert(
        ATTR_STATE_PAYLOAD.to_string(),
        AttributeValue::B(record.payload.clone()),
    );
    item.insert(
        ATTR_STATE_MANIFEST.to_string(),
        AttributeValue::S(record.type_tag.clone()),
    );
    item.insert(
        ATTR_TIMESTAMP.to_string(),
        AttributeValue::number(record.timestamp),
    );
    item.insert(
        ATTR_SHARD_NUMBER.to_string(),
        AttributeValue::number(record.shard),
    );
    item
}

/// Decode a backend item fetched under `persistence_id`
pub fn item_to_record(persistence_id: &str, item: &Item) -> Result<Record> {
    let stored_id = string_attr(persistence_id, item, ATTR_PERSISTENCE_ID)?;
    if stored_id != persistence_id {
        return Err(Error::malformed_attribute(
            persistence_id,
            ATTR_PERSISTENCE_ID,
            format!("item is keyed by '{persistence_id}' but names '{stored_id}'"),
        ));
    }

    Ok(Record {
        persistence_id: persistence_id.to_string(),
        version: number_attr(persistence_id, item, ATTR_VERSION_NUMBER)?,
        payload: binary_attr(persistence_id, item, ATTR_STATE_PAYLOAD)?.to_vec(),
        type_tag: string_attr(persistence_id, item, ATTR_STATE_MANIFEST)?.to_string(),
        timestamp: number_attr(persistence_id, item, ATTR_TIMESTAMP)?,
        shard: number_attr(persistence_id, item, ATTR_SHARD_NUMBER)?,
    })
}

fn attr<'a>(persistence_id: &str, item: &'a Item, name: &str) -> Result<&'a AttributeValue> {
    item.get(name)
        .ok_or_else(|| Error::malformed_attribute(persistence_id, name, "attribute is missing"))
}

fn wrong_kind(persistence_id: &str, name: &str, expected: &str, found: &AttributeValue) -> Error {
    Error::malformed_attribute(
        persistence_id,
        name,
        format!("expected {expected} attribute, found {}", found.kind()),
    )
}

fn string_attr<'a>(persistence_id: &str, item: &'a Item, name: &str) -> Result<&'a str> {
    let value = attr(persistence_id, item, name)?;
    value
        .as_s()
        .ok_or_else(|| wrong_kind(persistence_id, name, "S", value))
}

fn binary_attr<'a>(persistence_id: &str, item: &'a Item, name: &str) -> Result<&'a [u8]> {
    let value = attr(persistence_id, item, name)?;
    value
        .as_b()
        .ok_or_else(|| wrong_kind(persistence_id, name, "B", value))
}

fn number_attr<T>(persistence_id: &str, item: &Item, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let value = attr(persistence_id, item, name)?;
    let text = value
        .as_n()
        .ok_or_else(|| wrong_kind(persistence_id, name, "N", value))?;
    text.parse::<T>().map_err(|e| {
        Error::malformed_attribute(persistence_id, name, format!("invalid number '{text}': {e}"))
    })
}

#[async_trait]
impl StateGateway for TableGateway {
    async fn upsert(&self, record: &Record) -> Result<()> {
        let item = record_to_item(record);
        self.backend
            .put_item(&self.table, &record.persistence_id, item)
            .await?;
        debug!(
            table = %self.table,
            persistence_id = %record.persistence_id,
            version = record.version,
            "Upserted state record"
        );
        Ok(())
    }

    async fn get(&self, persistence_id: &str) -> Result<Option<Record>> {
        match self.backend.get_item(&self.table, persistence_id).await? {
            Some(item) => item_to_record(persistence_id, &item).map(Some),
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for TableGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableGateway")
            .field("table", &self.table)
            .field("backend", &self.backend.provider_name())
            .finish()
    }
}
