use std::{io::Cursor, sync::Arc};

use suppaftp::{types::FileType, FtpStream};
use tracing::info;

use crate::{
    error::{RelayError, RelayResult},
    models::UploadedFile,
    util::state::FtpSettings,
};

use super::IFileStorage;

pub struct FtpFileStorage {
    settings: Arc<FtpSettings>,
}

impl FtpFileStorage {
    pub fn new(settings: FtpSettings) -> Self {
        FtpFileStorage { settings: Arc::new(settings) }
    }

    fn destination(&self) -> &str {
        self.settings.destination.trim_matches('/')
    }

    pub fn file_url(&self, file_name: &str) -> String {
        let destination = self.destination();
        if destination.is_empty() {
            format!("ftp://{}/{}", &self.settings.hostname, file_name)
        } else {
            format!("ftp://{}/{}/{}", &self.settings.hostname, destination, file_name)
        }
    }
}

fn upload_blocking(settings: &FtpSettings, destination: &str, file_name: &str, bytes: &[u8]) -> RelayResult<u64> {
    let mut ftp = FtpStream::connect((settings.hostname.as_str(), settings.port))?;
    ftp.login(&settings.username, &settings.password)?;
    if !destination.is_empty() {
        ftp.cwd(destination)?;
    }
    ftp.transfer_type(FileType::Binary)?;
    let written = ftp.put_file(file_name, &mut Cursor::new(bytes))?;
    ftp.quit()?;
    Ok(written)
}

#[async_trait::async_trait]
impl IFileStorage for FtpFileStorage {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name, host = %self.settings.hostname))]
    async fn store(&self, file: &UploadedFile) -> RelayResult<String> {
        let settings = self.settings.clone();
        let destination = self.destination().to_string();
        let file_name = file.file_name.clone();
        let bytes = file.bytes.clone();

        let written = tokio::task::spawn_blocking(move || upload_blocking(&settings, &destination, &file_name, &bytes))
            .await
            .map_err(|err| RelayError::Ftp(format!("upload task failed: {}", err)))??;
        info!("Wrote {} bytes", written);

        Ok(self.file_url(&file.file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(destination: &str) -> FtpFileStorage {
        FtpFileStorage::new(FtpSettings {
            hostname: "ftp.example.com".to_string(),
            port: 21,
            username: "user".to_string(),
            password: "secret".to_string(),
            destination: destination.to_string(),
        })
    }

    #[test]
    fn url_is_host_destination_file() {
        assert_eq!(storage("uploads").file_url("clip.mp4"), "ftp://ftp.example.com/uploads/clip.mp4");
        assert_eq!(storage("/media/videos/").file_url("clip.mp4"), "ftp://ftp.example.com/media/videos/clip.mp4");
        assert_eq!(storage("").file_url("clip.mp4"), "ftp://ftp.example.com/clip.mp4");
    }

    #[tokio::test]
    async fn unreachable_host_is_an_ftp_error() {
        let storage = FtpFileStorage::new(FtpSettings {
            hostname: "127.0.0.1".to_string(),
            port: 1,
            username: "user".to_string(),
            password: "secret".to_string(),
            destination: "uploads".to_string(),
        });
        let file = UploadedFile::new("clip.mp4", None, bytes::Bytes::from_static(b"data"));
        let err = storage.store(&file).await.unwrap_err();
        assert!(matches!(err, RelayError::Ftp(_)));
    }
}
