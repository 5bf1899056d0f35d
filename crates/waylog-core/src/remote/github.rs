//! GitHub contents API implementation of the remote store.

use async_trait::async_trait;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::util::compact_text;

use super::{RemoteConfig, RemoteFile, RemoteStore};

const API_BASE_URL: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("waylog/", env!("CARGO_PKG_VERSION"));

/// Remote store backed by a GitHub repository via the contents API.
#[derive(Clone)]
pub struct GithubRemote {
    config: RemoteConfig,
    client: reqwest::Client,
    base_url: String,
}

impl GithubRemote {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: reqwest::Client::builder().user_agent(USER_AGENT).build()?,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL (useful for testing against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn contents_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            self.config.owner,
            self.config.repo,
            encoded.join("/")
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
    }

    async fn get_metadata(&self, path: &str) -> Result<Option<FileMetadata>> {
        let response = self
            .request(reqwest::Method::GET, &self.contents_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(api_error("get", path, &response.status(), response.text().await.ok()));
        }

        Ok(Some(response.json::<FileMetadata>().await?))
    }
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: WrittenFile,
}

#[derive(Debug, Deserialize)]
struct WrittenFile {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

#[async_trait]
impl RemoteStore for GithubRemote {
    async fn list_entry_files(&self) -> Result<Vec<RemoteFile>> {
        let response = self
            .request(reqwest::Method::GET, &self.contents_url(&self.config.folder))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        // A repository without the entries folder yet is simply empty.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(api_error(
                "list",
                &self.config.folder,
                &response.status(),
                response.text().await.ok(),
            ));
        }

        let listing = response.json::<Vec<FileMetadata>>().await?;
        Ok(listing
            .into_iter()
            .filter(|item| item.kind.as_deref() == Some("file"))
            .map(|item| RemoteFile {
                path: item.path,
                sha: item.sha,
            })
            .collect())
    }

    async fn read_file(&self, path: &str) -> Result<String> {
        let metadata = self
            .get_metadata(path)
            .await?
            .ok_or_else(|| Error::Remote(format!("remote file not found: {path}")))?;

        let encoded = metadata
            .content
            .ok_or_else(|| Error::Remote(format!("remote file has no content payload: {path}")))?;

        // The API wraps base64 payloads across lines.
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|error| Error::Remote(format!("invalid base64 content for {path}: {error}")))?;

        String::from_utf8(bytes)
            .map_err(|error| Error::Remote(format!("remote file is not UTF-8: {path}: {error}")))
    }

    async fn update_token(&self, path: &str) -> Result<Option<String>> {
        Ok(self.get_metadata(path).await?.map(|metadata| metadata.sha))
    }

    async fn write_file(&self, path: &str, content: &str, token: Option<&str>) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(content.as_bytes());

        let mut payload = serde_json::json!({
            "message": format!("waylog: update {path}"),
            "content": encoded,
            "branch": self.config.branch,
        });
        if let Some(sha) = token {
            payload["sha"] = serde_json::Value::String(sha.to_string());
        }

        let response = self
            .request(reqwest::Method::PUT, &self.contents_url(path))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error("write", path, &response.status(), response.text().await.ok()));
        }

        let written = response.json::<WriteResponse>().await?;
        Ok(written.content.sha)
    }
}

fn api_error(operation: &str, path: &str, status: &StatusCode, body: Option<String>) -> Error {
    let detail = body
        .as_deref()
        .and_then(|raw| serde_json::from_str::<ApiErrorBody>(raw).ok())
        .and_then(|parsed| parsed.message)
        .or_else(|| body.map(|raw| compact_text(&raw)))
        .unwrap_or_default();

    if detail.is_empty() {
        Error::Remote(format!("{operation} {path}: HTTP {}", status.as_u16()))
    } else {
        Error::Remote(format!(
            "{operation} {path}: {} ({})",
            detail.trim(),
            status.as_u16()
        ))
    }
}
