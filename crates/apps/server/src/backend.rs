use std::collections::BTreeMap;
use std::path::Path;

use content::store::StoredBlob;
use content::{AdminGate, Collection, ContentError, ContentStore, InMemoryContentStore, Record};
use tracing::info;

use crate::baas::BaasStore;
use crate::config::Config;

/// Where uploaded blobs are served from in memory mode.
pub const MEMORY_BLOB_BASE: &str = "/api/blobs";

#[derive(Debug)]
pub enum Backend {
    Baas(BaasStore),
    Memory(InMemoryContentStore),
}

impl Backend {
    pub async fn from_config(config: &Config) -> Result<Self, String> {
        let gate = AdminGate::new(config.admin_password.clone());
        if !gate.is_configured() {
            info!("ADMIN_PASSWORD is empty; admin sign-in is disabled");
        }
        if let Some(url) = &config.baas_url {
            return Ok(Backend::Baas(BaasStore::new(
                reqwest::Client::new(),
                url.clone(),
                config.baas_key.clone(),
                config.baas_bucket.clone(),
                gate,
            )));
        }
        let store = InMemoryContentStore::new()
            .with_gate(gate)
            .with_public_base(MEMORY_BLOB_BASE);
        if let Some(path) = &config.seed {
            seed_from_file(&store, path).await?;
        }
        Ok(Backend::Memory(store))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Baas(_) => "baas",
            Backend::Memory(_) => "memory",
        }
    }

    /// Blobs are only served locally in memory mode; the hosted bucket serves its own.
    pub fn blob(&self, path: &str) -> Option<StoredBlob> {
        match self {
            Backend::Baas(_) => None,
            Backend::Memory(s) => s.blob(path),
        }
    }
}

async fn seed_from_file(store: &InMemoryContentStore, path: &Path) -> Result<(), String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("read seed {path:?}: {e}"))?;
    let tables: BTreeMap<String, Vec<Record>> =
        serde_json::from_str(&text).map_err(|e| format!("parse seed {path:?}: {e}"))?;
    for (name, rows) in tables {
        let collection: Collection = name.parse().map_err(|e: ContentError| e.to_string())?;
        info!(%collection, rows = rows.len(), "seeded");
        store.seed(collection, rows);
    }
    Ok(())
}

impl ContentStore for Backend {
    async fn list(&self, collection: Collection) -> Result<Vec<Record>, ContentError> {
        match self {
            Backend::Baas(s) => s.list(collection).await,
            Backend::Memory(s) => s.list(collection).await,
        }
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, ContentError> {
        match self {
            Backend::Baas(s) => s.insert(collection, record).await,
            Backend::Memory(s) => s.insert(collection, record).await,
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError> {
        match self {
            Backend::Baas(s) => s.update(collection, id, patch).await,
            Backend::Memory(s) => s.update(collection, id, patch).await,
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), ContentError> {
        match self {
            Backend::Baas(s) => s.delete(collection, id).await,
            Backend::Memory(s) => s.delete(collection, id).await,
        }
    }

    async fn upload_blob(
        &self,
        path: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, ContentError> {
        match self {
            Backend::Baas(s) => s.upload_blob(path, bytes, mime).await,
            Backend::Memory(s) => s.upload_blob(path, bytes, mime).await,
        }
    }

    async fn sign_in(&self, password: &str) -> Result<bool, ContentError> {
        match self {
            Backend::Baas(s) => s.sign_in(password).await,
            Backend::Memory(s) => s.sign_in(password).await,
        }
    }

    async fn sign_out(&self) -> Result<(), ContentError> {
        match self {
            Backend::Baas(s) => s.sign_out().await,
            Backend::Memory(s) => s.sign_out().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[tokio::test]
    async fn memory_backend_reads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"projects": [{{"id": 1, "title": "Seeded"}}], "site_settings": []}}"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();
        let config = Config::try_parse_from(["server", "--seed", path.as_str()]).unwrap();

        let backend = Backend::from_config(&config).await.unwrap();
        assert_eq!(backend.kind(), "memory");
        let rows = backend.list(Collection::Projects).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Seeded");
    }

    #[tokio::test]
    async fn bad_seed_collection_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"users": []}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();
        let config = Config::try_parse_from(["server", "--seed", path.as_str()]).unwrap();
        assert!(Backend::from_config(&config).await.is_err());
    }

    #[tokio::test]
    async fn baas_url_selects_hosted_backend() {
        let config =
            Config::try_parse_from(["server", "--baas-url", "https://x.supabase.co"]).unwrap();
        let backend = Backend::from_config(&config).await.unwrap();
        assert_eq!(backend.kind(), "baas");
        assert!(backend.blob("anything").is_none());
    }
}
