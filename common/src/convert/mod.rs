use std::sync::Arc;

use tracing::info;

use crate::{
    error::RelayResult,
    models::{ConversionFormat, ConversionResult, UploadedFile},
};

pub mod encoding;
pub mod ffmpeg;

#[async_trait::async_trait]
pub trait IFormatConverter: Send + Sync {
    async fn convert(&self, format: ConversionFormat, file: &UploadedFile) -> RelayResult<ConversionResult>;
}

/// Local transcoding to mp4; the result still has to be relayed.
#[async_trait::async_trait]
pub trait ITranscoder: Send + Sync {
    async fn transcode(&self, file: &UploadedFile) -> RelayResult<UploadedFile>;
}

/// Remote encoding that hosts the result itself and hands back its url.
#[async_trait::async_trait]
pub trait IHostedEncoder: Send + Sync {
    async fn encode(&self, format: ConversionFormat, file: &UploadedFile) -> RelayResult<String>;
}

pub struct FormatConvertService {
    pub transcoder: Arc<dyn ITranscoder>,
    pub hosted_encoder: Arc<dyn IHostedEncoder>,
}

#[async_trait::async_trait]
impl IFormatConverter for FormatConvertService {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn convert(&self, format: ConversionFormat, file: &UploadedFile) -> RelayResult<ConversionResult> {
        info!("Converting to {}", format);
        match format {
            ConversionFormat::Mp4 => Ok(ConversionResult::File(self.transcoder.transcode(file).await?)),
            ConversionFormat::Webm | ConversionFormat::Ogv => Ok(ConversionResult::Url(self.hosted_encoder.encode(format, file).await?)),
        }
    }
}
