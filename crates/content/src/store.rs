use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::auth::AdminGate;
use crate::blob::ensure_image;
use crate::model::Collection;

/// One row as it crosses the store boundary.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),
    #[error("could not decode record: {0}")]
    Decode(String),
    #[error("unsupported upload: {0}")]
    InvalidUpload(String),
    #[error("not signed in")]
    Unauthorized,
    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

/// CRUD and blob upload against wherever the site content lives.
///
/// Futures are not required to be `Send`: the browser implementation is
/// single-threaded, and server implementations are used through concrete
/// types so their futures keep whatever auto traits they have.
#[allow(async_fn_in_trait)]
pub trait ContentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Record>, ContentError>;

    /// Returns the stored record with backend-assigned fields filled in.
    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, ContentError>;

    /// Merges `patch` over the stored record and returns the result.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError>;

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), ContentError>;

    /// Stores `bytes` at `path` and returns its public URL. Non-image types are rejected.
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>, mime: &str)
    -> Result<String, ContentError>;

    async fn sign_in(&self, password: &str) -> Result<bool, ContentError>;

    async fn sign_out(&self) -> Result<(), ContentError>;
}

pub(crate) fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn record_has_id(record: &Record, id: &str) -> bool {
    record.get("id").and_then(id_text).as_deref() == Some(id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct Tables {
    rows: BTreeMap<Collection, Vec<Record>>,
    blobs: BTreeMap<String, StoredBlob>,
    next_id: u64,
    next_stamp: u64,
}

/// Process-local store: tests, and the server when no hosted backend is configured.
#[derive(Debug)]
pub struct InMemoryContentStore {
    tables: Mutex<Tables>,
    gate: AdminGate,
    public_base: String,
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            gate: AdminGate::locked(),
            public_base: "memory://blobs".to_string(),
        }
    }

    pub fn with_gate(mut self, gate: AdminGate) -> Self {
        self.gate = gate;
        self
    }

    /// URL prefix returned for uploaded blobs.
    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = base.into();
        self
    }

    /// Insert rows as-is, assigning ids only where missing.
    pub fn seed(&self, collection: Collection, rows: impl IntoIterator<Item = Record>) {
        let mut tables = self.tables.lock();
        for row in rows {
            let row = tables.stamp(row);
            tables.rows.entry(collection).or_default().push(row);
        }
    }

    pub fn blob(&self, path: &str) -> Option<StoredBlob> {
        self.tables.lock().blobs.get(path).cloned()
    }

    pub fn row_count(&self, collection: Collection) -> usize {
        self.tables.lock().rows.get(&collection).map_or(0, Vec::len)
    }
}

impl Tables {
    fn stamp(&mut self, mut row: Record) -> Record {
        match row.get("id") {
            Some(Value::Number(n)) => {
                self.next_id = self.next_id.max(n.as_u64().unwrap_or(0));
            }
            Some(Value::String(_)) => {}
            _ => {
                self.next_id += 1;
                row.insert("id".to_string(), Value::from(self.next_id));
            }
        }
        if !row.contains_key("created_at") {
            // Sortable and unique within the process; real timestamps come from the hosted backend.
            self.next_stamp += 1;
            row.insert(
                "created_at".to_string(),
                Value::from(format!("memory-{:012}", self.next_stamp)),
            );
        }
        row
    }
}

impl ContentStore for InMemoryContentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Record>, ContentError> {
        Ok(self
            .tables
            .lock()
            .rows
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, ContentError> {
        let mut tables = self.tables.lock();
        let row = tables.stamp(record);
        tables.rows.entry(collection).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError> {
        let mut tables = self.tables.lock();
        let row = tables
            .rows
            .get_mut(&collection)
            .and_then(|rows| rows.iter_mut().find(|r| record_has_id(r, id)))
            .ok_or_else(|| ContentError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        for (key, value) in patch {
            if key != "id" {
                row.insert(key, value);
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), ContentError> {
        let mut tables = self.tables.lock();
        let rows = tables.rows.entry(collection).or_default();
        let before = rows.len();
        rows.retain(|r| !record_has_id(r, id));
        if rows.len() == before {
            return Err(ContentError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn upload_blob(
        &self,
        path: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, ContentError> {
        ensure_image(mime)?;
        let path = path.trim_start_matches('/');
        self.tables.lock().blobs.insert(
            path.to_string(),
            StoredBlob {
                mime: mime.to_string(),
                bytes,
            },
        );
        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), path))
    }

    async fn sign_in(&self, password: &str) -> Result<bool, ContentError> {
        Ok(self.gate.check(password))
    }

    async fn sign_out(&self) -> Result<(), ContentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn insert_assigns_id_and_timestamp() {
        let store = InMemoryContentStore::new();
        let a = block_on(store.insert(Collection::Projects, record(json!({"title": "A"})))).unwrap();
        let b = block_on(store.insert(Collection::Projects, record(json!({"title": "B"})))).unwrap();
        assert_eq!(a["id"], json!(1));
        assert_eq!(b["id"], json!(2));
        assert!(a["created_at"].as_str() < b["created_at"].as_str());
        assert_eq!(block_on(store.list(Collection::Projects)).unwrap().len(), 2);
        assert!(block_on(store.list(Collection::BlogPosts)).unwrap().is_empty());
    }

    #[test]
    fn update_merges_patch_and_keeps_id() {
        let store = InMemoryContentStore::new();
        store.seed(
            Collection::BlogPosts,
            [record(json!({"id": "p1", "title": "T", "views": 4}))],
        );
        let merged = block_on(store.update(
            Collection::BlogPosts,
            "p1",
            record(json!({"views": 5, "id": "hijack"})),
        ))
        .unwrap();
        assert_eq!(merged["id"], json!("p1"));
        assert_eq!(merged["title"], json!("T"));
        assert_eq!(merged["views"], json!(5));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let store = InMemoryContentStore::new();
        let err = block_on(store.update(Collection::Projects, "9", Record::new())).unwrap_err();
        assert_eq!(
            err,
            ContentError::NotFound {
                collection: Collection::Projects,
                id: "9".into()
            }
        );
        assert!(block_on(store.delete(Collection::Projects, "9")).is_err());
    }

    #[test]
    fn numeric_ids_match_textual_lookups() {
        let store = InMemoryContentStore::new();
        block_on(store.insert(Collection::Projects, record(json!({"title": "A"})))).unwrap();
        block_on(store.delete(Collection::Projects, "1")).unwrap();
        assert_eq!(store.row_count(Collection::Projects), 0);
    }

    #[test]
    fn uploads_reject_non_images_and_keep_bytes() {
        let store = InMemoryContentStore::new().with_public_base("/api/blobs/");
        let err = block_on(store.upload_blob("a.pdf", vec![1], "application/pdf")).unwrap_err();
        assert!(matches!(err, ContentError::InvalidUpload(_)));
        assert!(store.blob("a.pdf").is_none());

        let url = block_on(store.upload_blob("/covers/a.png", vec![1, 2], "image/png")).unwrap();
        assert_eq!(url, "/api/blobs/covers/a.png");
        assert_eq!(store.blob("covers/a.png").unwrap().bytes, vec![1, 2]);
    }

    #[test]
    fn sign_in_uses_the_gate() {
        let store = InMemoryContentStore::new().with_gate(AdminGate::new("pw"));
        assert!(block_on(store.sign_in("pw")).unwrap());
        assert!(!block_on(store.sign_in("nope")).unwrap());
        assert!(!block_on(InMemoryContentStore::new().sign_in("pw")).unwrap());
    }
}
