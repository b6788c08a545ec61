// HTTP gateway: one reqwest client, one shared bearer token, one error
// contract for every call.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use courtside_core::config::ApiConfig;

use crate::error::{extract_detail, ApiError};

/// Image accepted by the profile picture endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Only PNG and JPEG are accepted; the type is taken from the extension.
    pub fn image(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let file_name = file_name.into();
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            _ => {
                return Err(ApiError::invalid(
                    "file",
                    format!("{file_name}: only PNG and JPEG images are accepted"),
                ))
            }
        };
        if bytes.is_empty() {
            return Err(ApiError::invalid("file", format!("{file_name} is empty")));
        }
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ApiError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::invalid("file", format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self::image(name, bytes)
    }
}

/// Percent-encode one path segment (slugs, usernames).
pub fn segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: Url,
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.has_token())
            .finish()
    }
}

impl Gateway {
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("courtside/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(config.base_url.clone(), config.timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the bearer token attached to every subsequent request. All
    /// clones of this gateway see the change.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // -----------------------------------------------------------------------
    // Verbs
    // -----------------------------------------------------------------------

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::GET, path)?;
        self.send_json(path, req).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path)?.query(query);
        self.send_json(path, req).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::POST, path)?.json(body);
        self.send_json(path, req).await
    }

    /// POST without a body, expecting JSON back.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path)?;
        self.send_json(path, req).await
    }

    /// POST without a body, ignoring whatever comes back (204 endpoints).
    pub async fn post_unit(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::POST, path)?;
        self.send(path, req).await.map(|_| ())
    }

    /// `application/x-www-form-urlencoded` POST.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path)?.form(form);
        self.send_json(path, req).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let req = self.request(Method::PUT, path)?.json(body);
        self.send_json(path, req).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let req = self.request(Method::DELETE, path)?;
        self.send_json(path, req).await
    }

    pub async fn delete_unit(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, path)?;
        self.send(path, req).await.map(|_| ())
    }

    /// Multipart upload with the file under the `file` field.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        upload: Upload,
    ) -> Result<T, ApiError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(upload.mime)?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let req = self.request(Method::POST, path)?.multipart(form);
        self.send_json(path, req).await
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|e| ApiError::invalid("path", format!("{path}: {e}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%method, %path, "request");
        let mut req = self.http.request(method, url);
        if let Some(token) = self.token.read().expect("token lock poisoned").as_deref() {
            req = req.bearer_auth(token);
        }
        Ok(req)
    }

    async fn send(&self, path: &str, req: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = req.send().await.map_err(|e| {
            warn!(%path, "request failed: {e}");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            let detail = extract_detail(&String::from_utf8_lossy(&body));
            warn!(%path, status = status.as_u16(), detail = ?detail, "request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(path, req).await?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(%path, "malformed response: {e}");
            ApiError::Decode {
                path: path.to_string(),
                message: e.to_string(),
            }
        })
    }
}
