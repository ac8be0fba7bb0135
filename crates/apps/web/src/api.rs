//! `ContentStore` over this site's own `/api` endpoints.

use std::cell::RefCell;

use content::{Collection, ContentError, ContentStore, Record, ensure_image};
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Debug, Deserialize)]
struct UrlBody {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Talks to the site server; the admin session token lives only in memory.
#[derive(Debug, Default)]
pub struct HttpContentStore {
    base: String,
    token: RefCell<Option<String>>,
}

fn transport(err: gloo_net::Error) -> ContentError {
    ContentError::Transport(err.to_string())
}

impl HttpContentStore {
    /// `base` is prefixed to every `/api` path; empty for same-origin.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            token: RefCell::new(None),
        }
    }

    fn content_url(&self, collection: Collection) -> String {
        format!("{}/api/content/{collection}", self.base)
    }

    fn record_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{id}", self.content_url(collection))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.borrow().as_deref() {
            Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }

    async fn checked(
        &self,
        response: Result<Response, gloo_net::Error>,
        not_found: Option<(Collection, &str)>,
    ) -> Result<Response, ContentError> {
        let response = response.map_err(transport)?;
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        if let (404, Some((collection, id))) = (status, not_found) {
            return Err(ContentError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        if status == 401 {
            return Err(ContentError::Unauthorized);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => response.status_text(),
        };
        Err(ContentError::Backend { status, message })
    }

    async fn record(response: Response) -> Result<Record, ContentError> {
        response
            .json::<Record>()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))
    }
}

impl ContentStore for HttpContentStore {
    async fn list(&self, collection: Collection) -> Result<Vec<Record>, ContentError> {
        let response = Request::get(&self.content_url(collection)).send().await;
        self.checked(response, None)
            .await?
            .json::<Vec<Record>>()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))
    }

    async fn insert(&self, collection: Collection, record: Record) -> Result<Record, ContentError> {
        let request = self
            .authorized(Request::post(&self.content_url(collection)))
            .json(&record)
            .map_err(transport)?;
        let response = self.checked(request.send().await, None).await?;
        Self::record(response).await
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: Record,
    ) -> Result<Record, ContentError> {
        let request = self
            .authorized(Request::patch(&self.record_url(collection, id)))
            .json(&patch)
            .map_err(transport)?;
        let response = self
            .checked(request.send().await, Some((collection, id)))
            .await?;
        Self::record(response).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), ContentError> {
        let response = self
            .authorized(Request::delete(&self.record_url(collection, id)))
            .send()
            .await;
        self.checked(response, Some((collection, id))).await?;
        Ok(())
    }

    async fn upload_blob(
        &self,
        path: &str,
        bytes: Vec<u8>,
        mime: &str,
    ) -> Result<String, ContentError> {
        ensure_image(mime)?;
        let url = format!("{}/api/blobs/{}", self.base, path.trim_start_matches('/'));
        let body = js_sys::Uint8Array::from(bytes.as_slice());
        let request = self
            .authorized(Request::put(&url))
            .header("Content-Type", mime)
            .body(body)
            .map_err(transport)?;
        let response = self.checked(request.send().await, None).await?;
        let body: UrlBody = response
            .json()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))?;
        Ok(body.url)
    }

    async fn sign_in(&self, password: &str) -> Result<bool, ContentError> {
        let request = Request::post(&format!("{}/api/session", self.base))
            .json(&json!({ "password": password }))
            .map_err(transport)?;
        let response = match self.checked(request.send().await, None).await {
            Ok(response) => response,
            Err(ContentError::Unauthorized) => return Ok(false),
            Err(err) => return Err(err),
        };
        let body: TokenBody = response
            .json()
            .await
            .map_err(|e| ContentError::Decode(e.to_string()))?;
        *self.token.borrow_mut() = Some(body.token);
        Ok(true)
    }

    async fn sign_out(&self) -> Result<(), ContentError> {
        let Some(token) = self.token.borrow_mut().take() else {
            return Ok(());
        };
        let response = Request::delete(&format!("{}/api/session", self.base))
            .header("Authorization", &format!("Bearer {token}"))
            .send()
            .await;
        self.checked(response, None).await?;
        Ok(())
    }
}
