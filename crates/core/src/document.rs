//! Dynamic document representation
//!
//! A [`Document`] is the unit of storage and of mutation: an opaque id plus
//! a JSON object body. Field order is preserved (serde_json's
//! `preserve_order`), so snapshots and exports keep a stable column order.
//!
//! Typed entity structs (see [`crate::model`]) convert to and from
//! documents through serde; the `id` field of the body is the source of
//! truth and must agree with the document id.

use crate::error::{Error, Result};
use crate::types::DocId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Ordered JSON object: the body of a document and the payload of a patch.
pub type Fields = serde_json::Map<String, Value>;

/// Wire name of the write timestamp stamped by the mutation gateway.
pub const UPDATED_AT: &str = "updatedAt";

/// A keyed record: id plus JSON object body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: DocId,
    body: Fields,
}

impl Document {
    /// Create a document from an id and a field map.
    pub fn new(id: DocId, body: Fields) -> Self {
        Document { id, body }
    }

    /// Create a document from an id and any JSON value.
    ///
    /// Fails with [`Error::Validation`] unless the value is an object.
    pub fn from_value(id: DocId, value: Value) -> Result<Self> {
        match value {
            Value::Object(body) => Ok(Document { id, body }),
            other => Err(Error::Validation(format!(
                "document body must be an object, got {other}"
            ))),
        }
    }

    /// Serialize a typed entity into a document.
    ///
    /// The entity must serialize to an object carrying a string `id` field;
    /// that id becomes the document id.
    pub fn from_typed<T: Serialize>(entity: &T) -> Result<Self> {
        let value = serde_json::to_value(entity)?;
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .map(DocId::from)
            .ok_or_else(|| Error::Serialization("entity has no string id field".to_string()))?;
        Document::from_value(id, value)
    }

    /// Deserialize the body into a typed entity.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(self.body.clone()))?)
    }

    /// The document identifier.
    pub fn id(&self) -> &DocId {
        &self.id
    }

    /// The field map.
    pub fn body(&self) -> &Fields {
        &self.body
    }

    /// Consume into the field map.
    pub fn into_body(self) -> Fields {
        self.body
    }

    /// Read one field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    /// Read one field as a string slice.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.body.get(field).and_then(Value::as_str)
    }

    /// The write timestamp, if the document has been through the gateway.
    pub fn updated_at(&self) -> Option<i64> {
        self.body.get(UPDATED_AT).and_then(Value::as_i64)
    }

    /// Stamp the write timestamp. Called by the mutation gateway only;
    /// caller-provided values are overwritten.
    pub fn set_updated_at(&mut self, millis: i64) {
        self.body.insert(UPDATED_AT.to_string(), Value::from(millis));
    }

    /// Merge-write: replace exactly the named fields, preserving all others.
    pub fn merge_from(&mut self, fields: &Fields) {
        for (k, v) in fields {
            self.body.insert(k.clone(), v.clone());
        }
    }

    /// A copy of this document with the named fields merged in.
    pub fn merged(&self, fields: &Fields) -> Document {
        let mut doc = self.clone();
        doc.merge_from(fields);
        doc
    }
}
