// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Process-local document collection.
//!
//! Documents are stored as JSON objects keyed by a generated id and decoded
//! on read, so the typed layer above sees the same shapes Firestore returns.

use crate::error::AppError;
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

type Document = Map<String, Value>;

/// In-memory collection of JSON documents.
#[derive(Clone, Default)]
pub struct MemoryCollection {
    docs: Arc<DashMap<String, Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Decode every document.
    pub fn all<T: DeserializeOwned>(&self) -> Result<Vec<T>, AppError> {
        self.docs
            .iter()
            .map(|entry| decode(entry.key(), entry.value()))
            .collect()
    }

    pub fn get<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, AppError> {
        self.docs
            .get(id)
            .map(|doc| decode(id, doc.value()))
            .transpose()
    }

    /// Documents whose `field` equals `value`.
    pub fn find_eq<T: DeserializeOwned>(&self, field: &str, value: &str) -> Result<Vec<T>, AppError> {
        self.docs
            .iter()
            .filter(|entry| entry.value().get(field).and_then(Value::as_str) == Some(value))
            .map(|entry| decode(entry.key(), entry.value()))
            .collect()
    }

    /// Store a new document under a fresh id and return that id.
    pub fn insert<T: Serialize>(&self, doc: &T) -> Result<String, AppError> {
        let doc = encode(doc)?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.docs.insert(id.clone(), doc);
        Ok(id)
    }

    /// Overwrite only the named fields of an existing document.
    pub fn update_fields<T: Serialize>(
        &self,
        id: &str,
        fields: &[&str],
        doc: &T,
    ) -> Result<(), AppError> {
        let incoming = encode(doc)?;
        let mut existing = self
            .docs
            .get_mut(id)
            .ok_or_else(|| AppError::Database(format!("No document to update: {}", id)))?;

        for field in fields {
            match incoming.get(*field) {
                Some(value) => {
                    existing.insert((*field).to_string(), value.clone());
                }
                None => {
                    existing.remove(*field);
                }
            }
        }
        Ok(())
    }

    /// Remove a document. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        self.docs.remove(id).is_some()
    }
}

fn encode<T: Serialize>(doc: &T) -> Result<Document, AppError> {
    match serde_json::to_value(doc).map_err(|e| AppError::Database(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Database(format!(
            "Document must be an object, got {}",
            other
        ))),
    }
}

fn decode<T: DeserializeOwned>(id: &str, doc: &Document) -> Result<T, AppError> {
    let mut doc = doc.clone();
    doc.insert("id".to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(doc)).map_err(|e| AppError::Database(e.to_string()))
}
