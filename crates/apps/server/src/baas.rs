//! Hosted backend adapter: PostgREST tables plus an object storage bucket.

use content::{ensure_image, AdminGate, Collection, ContentError, ContentStore, Record};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BaasStore {
    http: Client,
    base: String,
    key: String,
    bucket: String,
    gate: AdminGate,
}

impl BaasStore {
    pub fn new(
        http: Client,
        base: impl Into<String>,
        key: impl Into<String>,
        bucket: impl Into<String>,
        gate: AdminGate,
    ) -> Self {
        Self {
            http,
            base: base.into().trim_end_matches('/').to_string(),
            key: key.into(),
            bucket: bucket.into(),
            gate,
        }
    }

    pub fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base, collection.as_str())
    }

    pub fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base,
            self.bucket,
            path.trim_start_matches('/')
        )
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&self.key) {
            headers.insert("apikey", v);
        }
        if let Ok(v) = HeaderValue::from_str(&format!("Bearer {}", self.key)) {
            headers.insert(AUTHORIZATION, v);
        }
        headers
    }

    fn rows_request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .headers(self.auth_headers())
            .header("Prefer", "return=representation")
    }

    async fn send_rows(&self, builder: RequestBuilder) -> Result<Vec<Record>, ContentError> {
        let resp = checked(self.rows_request(builder).send().await).await?;
        resp.json::<Vec<Record>>()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))
    }
}

/// Newest first where the table has a creation timestamp.
fn order_for(collection: Collection) -> Option<&'static str> {
    match collection {
        Collection::Projects | Collection::BlogPosts => Some("created_at.desc"),
        Collection::SiteSettings => None,
    }
}

fn id_filter(id: &str) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

fn single_row(rows: Vec<Record>, collection: Collection, id: &str) -> Result<Record, ContentError> {
    rows.into_iter().next().ok_or_else(|| ContentError::NotFound {
        collection,
        id: id.to_string(),
    })
}

async fn checked(sent: Result<Response, reqwest::Error>) -> Result<Response, ContentError> {
    let resp = sent.map_err(|e| ContentError::Transport(e.to_string()))?;
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let body = body.trim();
    Err(ContentError::Backend {
        status: status.as_u16(),
        message: if body.is_empty() {
            status.to_string()
        } else {
            body.to_string()
        },
    })
}

impl ContentStore for BaasStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Record>, ContentError> {
        let mut req = self
            .http
            .get(self.table_url(collection))
            .query(&[("select", "*")]);
        if let Some(order) = order_for(collection) {
            req = req.query(&[("order", order)]);
        }
        let rows = self.send_rows(req).await?;
        debug!(%collection, rows = rows.len(), "listed");
        Ok(rows)
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, ContentError> {
        let req = self.http.post(self.table_url(collection)).json(&record);
        let rows = self.send_rows(req).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ContentError::Decode("insert returned no rows".to_string()))
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError> {
        let req = self
            .http
            .patch(self.table_url(collection))
            .query(&id_filter(id))
            .json(&patch);
        single_row(self.send_rows(req).await?, collection, id)
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), ContentError> {
        let req = self
            .http
            .delete(self.table_url(collection))
            .query(&id_filter(id));
        single_row(self.send_rows(req).await?, collection, id).map(|_| ())
    }

    async fn upload_blob(
        &self,
        path: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, ContentError> {
        ensure_image(mime)?;
        let size = bytes.len();
        let req = self
            .http
            .post(self.object_url(path))
            .headers(self.auth_headers())
            .header(CONTENT_TYPE, mime)
            .header("x-upsert", "true")
            .body(bytes);
        checked(req.send().await).await?;
        debug!(path, size, "blob stored");
        Ok(self.public_url(path))
    }

    async fn sign_in(&self, password: &str) -> Result<bool, ContentError> {
        Ok(self.gate.check(password))
    }

    async fn sign_out(&self) -> Result<(), ContentError> {
        Ok(())
    }
}
