use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{RelayError, RelayResult},
    models::UploadedFile,
    util::state::DropboxSettings,
};

use super::IFileStorage;

const API_ARG: &str = "Dropbox-API-Arg";

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
}

#[derive(Debug, Deserialize)]
struct UploadedMetadata {
    path_display: String,
}

#[derive(Debug, Serialize)]
struct SharedLinkArg<'a> {
    path: &'a str,
}

#[derive(Debug, Deserialize)]
struct SharedLink {
    url: String,
}

/// JSON for a header value: every char from 0x7F up is written as `\uXXXX`.
fn header_safe_json<T: Serialize>(value: &T) -> RelayResult<String> {
    let json = serde_json::to_string(value).map_err(|err| RelayError::Storage(err.to_string()))?;
    let mut escaped = String::with_capacity(json.len());
    for c in json.chars() {
        if (c as u32) < 0x7F {
            escaped.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    Ok(escaped)
}

pub struct DropboxFileStorage {
    client: reqwest::Client,
    settings: DropboxSettings,
}

impl DropboxFileStorage {
    pub fn new(client: reqwest::Client, settings: DropboxSettings) -> Self {
        DropboxFileStorage { client, settings }
    }

    fn target_path(&self, file_name: &str) -> String {
        let container = self.settings.container.trim_matches('/');
        if container.is_empty() {
            format!("/{}", file_name)
        } else {
            format!("/{}/{}", container, file_name)
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", &self.settings.access_token)
    }

    async fn upload(&self, file: &UploadedFile) -> RelayResult<UploadedMetadata> {
        let path = self.target_path(&file.file_name);
        let arg = header_safe_json(&UploadArg {
            path: &path,
            mode: "add",
            autorename: true,
        })?;

        let response = self
            .client
            .post(format!("{}/2/files/upload", self.settings.content_url.trim_end_matches('/')))
            .header(AUTHORIZATION, self.bearer())
            .header(CONTENT_TYPE, mime::APPLICATION_OCTET_STREAM.as_ref())
            .header(API_ARG, arg)
            .body(file.bytes.clone())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RelayError::Storage(format!("dropbox upload failed with {}", response.status())));
        }
        Ok(response.json().await?)
    }

    async fn share(&self, path: &str) -> RelayResult<String> {
        let response = self
            .client
            .post(format!("{}/2/sharing/create_shared_link_with_settings", self.settings.api_url.trim_end_matches('/')))
            .header(AUTHORIZATION, self.bearer())
            .json(&SharedLinkArg { path })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RelayError::Storage(format!("dropbox shared link failed with {}", response.status())));
        }
        let link: SharedLink = response.json().await?;
        Ok(link.url)
    }
}

#[async_trait::async_trait]
impl IFileStorage for DropboxFileStorage {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn store(&self, file: &UploadedFile) -> RelayResult<String> {
        let metadata = self.upload(file).await?;
        info!("Stored {} in dropbox", &metadata.path_display);
        self.share(&metadata.path_display).await
    }
}
