use std::sync::Arc;

use crate::{
    convert::{encoding::EncodingServiceConverter, ffmpeg::FfmpegTranscoder, FormatConvertService, IFormatConverter},
    error::RelayResult,
    persistence::{dropbox::DropboxFileStorage, ftp::FtpFileStorage, s3::S3FileStorage, IUploadRelay, UploadRelayService},
};

pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Zero means plain public object urls.
    pub presign_seconds: u32,
}

pub struct FtpSettings {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub destination: String,
}

pub struct DropboxSettings {
    pub access_token: String,
    pub container: String,
    pub content_url: String,
    pub api_url: String,
}

pub struct EncodingSettings {
    pub endpoint: String,
    pub app_id: String,
    pub access_token: String,
}

pub struct FfmpegSettings {
    pub ffmpeg_path: String,
}

pub struct RelaySettings {
    pub s3: S3Settings,
    pub ftp: FtpSettings,
    pub dropbox: DropboxSettings,
    pub encoding: EncodingSettings,
    pub ffmpeg: FfmpegSettings,
}

pub struct RelayServiceCollection {
    pub format_converter: Arc<dyn IFormatConverter>,
    pub upload_relay: Arc<dyn IUploadRelay>,
}

impl RelayServiceCollection {
    pub fn build(settings: RelaySettings) -> RelayResult<Arc<Self>> {
        let client = reqwest::Client::builder().build()?;

        let upload_relay = Arc::new(UploadRelayService {
            s3: Arc::new(S3FileStorage::build(settings.s3)?),
            ftp: Arc::new(FtpFileStorage::new(settings.ftp)),
            dropbox: Arc::new(DropboxFileStorage::new(client.clone(), settings.dropbox)),
        });
        let format_converter = Arc::new(FormatConvertService {
            transcoder: Arc::new(FfmpegTranscoder::new(settings.ffmpeg)),
            hosted_encoder: Arc::new(EncodingServiceConverter::new(client, settings.encoding)),
        });

        Ok(Arc::new(RelayServiceCollection {
            format_converter,
            upload_relay,
        }))
    }
}
