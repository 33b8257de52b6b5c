use std::sync::Arc;

use tracing::info;

use crate::{
    error::RelayResult,
    models::{UploadTarget, UploadedFile},
};

pub mod dropbox;
pub mod ftp;
pub mod s3;

/// A single storage backend.
#[async_trait::async_trait]
pub trait IFileStorage: Send + Sync {
    /// Stores the file and returns its public url.
    async fn store(&self, file: &UploadedFile) -> RelayResult<String>;
}

#[async_trait::async_trait]
pub trait IUploadRelay: Send + Sync {
    async fn relay(&self, target: UploadTarget, file: &UploadedFile) -> RelayResult<String>;
}

pub struct UploadRelayService {
    pub s3: Arc<dyn IFileStorage>,
    pub ftp: Arc<dyn IFileStorage>,
    pub dropbox: Arc<dyn IFileStorage>,
}

impl UploadRelayService {
    fn storage(&self, target: UploadTarget) -> &Arc<dyn IFileStorage> {
        match target {
            UploadTarget::S3 => &self.s3,
            UploadTarget::Ftp => &self.ftp,
            UploadTarget::Dropbox => &self.dropbox,
        }
    }
}

#[async_trait::async_trait]
impl IUploadRelay for UploadRelayService {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name, size = file.len()))]
    async fn relay(&self, target: UploadTarget, file: &UploadedFile) -> RelayResult<String> {
        let url = self.storage(target).store(file).await?;
        info!("Relayed {} to {}", &file.file_name, &url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    struct NamedStorage(&'static str);

    #[async_trait::async_trait]
    impl IFileStorage for NamedStorage {
        async fn store(&self, file: &UploadedFile) -> RelayResult<String> {
            Ok(format!("{}://{}", self.0, file.file_name))
        }
    }

    #[tokio::test]
    async fn routes_each_target_to_its_storage() {
        let relay = UploadRelayService {
            s3: Arc::new(NamedStorage("s3")),
            ftp: Arc::new(NamedStorage("ftp")),
            dropbox: Arc::new(NamedStorage("dropbox")),
        };
        let file = UploadedFile::new("clip.mp4", None, Bytes::from_static(b"data"));

        assert_eq!(relay.relay(UploadTarget::S3, &file).await.unwrap(), "s3://clip.mp4");
        assert_eq!(relay.relay(UploadTarget::Ftp, &file).await.unwrap(), "ftp://clip.mp4");
        assert_eq!(relay.relay(UploadTarget::Dropbox, &file).await.unwrap(), "dropbox://clip.mp4");
    }
}
