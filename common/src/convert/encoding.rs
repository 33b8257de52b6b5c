use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::{RelayError, RelayResult},
    models::{ConversionFormat, UploadedFile},
    util::state::EncodingSettings,
};

use super::IHostedEncoder;

const APP_ID_HEADER: &str = "X-App-Id";
const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

#[derive(Debug, Deserialize)]
struct EncodedMedia {
    url: Option<String>,
    error: Option<String>,
}

/// Client for the hosted encoding service, which transcodes and hosts the result in one call.
pub struct EncodingServiceConverter {
    client: reqwest::Client,
    settings: EncodingSettings,
}

impl EncodingServiceConverter {
    pub fn new(client: reqwest::Client, settings: EncodingSettings) -> Self {
        EncodingServiceConverter { client, settings }
    }

    fn form(format: ConversionFormat, file: &UploadedFile) -> RelayResult<Form> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(file.content_type.as_ref())?;
        Ok(Form::new().text("format", format.as_str()).part("file", part))
    }
}

#[async_trait::async_trait]
impl IHostedEncoder for EncodingServiceConverter {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn encode(&self, format: ConversionFormat, file: &UploadedFile) -> RelayResult<String> {
        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(APP_ID_HEADER, &self.settings.app_id)
            .header(ACCESS_TOKEN_HEADER, &self.settings.access_token)
            .multipart(Self::form(format, file)?)
            .send()
            .await?;
        let status = response.status();
        let media: EncodedMedia = response
            .json()
            .await
            .map_err(|err| RelayError::Encoding(format!("unreadable response ({}): {}", status, err)))?;

        match media {
            EncodedMedia { url: Some(url), .. } if status.is_success() => {
                info!("Encoded {} as {} at {}", &file.file_name, format, &url);
                Ok(url)
            }
            EncodedMedia { error: Some(error), .. } => Err(RelayError::Encoding(error)),
            _ => Err(RelayError::Encoding(format!("no url returned, status {}", status))),
        }
    }
}
