use std::collections::HashMap;

use s3::{creds::Credentials, region::Region, signing::uri_encode, Bucket};
use tracing::info;

use crate::{
    error::{RelayError, RelayResult},
    models::UploadedFile,
    util::{random::object_key, state::S3Settings},
};

use super::IFileStorage;

pub struct S3FileStorage {
    bucket: Bucket,
    presign_seconds: u32,
}

impl S3FileStorage {
    pub fn build(settings: S3Settings) -> RelayResult<Self> {
        let credentials = Credentials::new(Some(&settings.access_key_id), Some(&settings.secret_access_key), None, None, None)
            .map_err(|err| RelayError::Storage(format!("error with credentials: {}", err)))?;
        let region = Region::Custom {
            region: settings.region,
            endpoint: settings.endpoint,
        };
        let bucket = Bucket::new(&settings.bucket, region, credentials)?;
        let bucket = bucket.with_path_style();
        Ok(S3FileStorage {
            bucket,
            presign_seconds: settings.presign_seconds,
        })
    }

    /// Encoded the way the object path is encoded on put.
    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.bucket.url().trim_end_matches('/'), uri_encode(key, false))
    }

    fn presigned_url(&self, key: &str, file_name: &str) -> RelayResult<String> {
        let mut custom_queries = HashMap::new();
        custom_queries.insert("response-content-disposition".into(), content_disposition(file_name));
        Ok(self.bucket.presign_get(key, self.presign_seconds, Some(custom_queries))?)
    }

    fn stored_url(&self, key: &str, file_name: &str) -> RelayResult<String> {
        if self.presign_seconds == 0 {
            Ok(self.public_url(key))
        } else {
            self.presigned_url(key, file_name)
        }
    }
}

fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename*=UTF-8''{}", uri_encode(file_name, true))
}

#[async_trait::async_trait]
impl IFileStorage for S3FileStorage {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn store(&self, file: &UploadedFile) -> RelayResult<String> {
        let key = object_key(&file.file_name);
        info!("Storing {}", &key);
        let response = self.bucket.put_object_with_content_type(&key, &file.bytes, file.content_type.as_ref()).await?;
        if response.status_code() >= 300 {
            return Err(RelayError::Storage(format!("could not put blob, status {}", response.status_code())));
        }
        self.stored_url(&key, &file.file_name)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use axum::{http::StatusCode, Router};
    use bytes::Bytes;

    use super::*;

    fn settings(presign_seconds: u32) -> S3Settings {
        settings_at("http://localhost:9000", presign_seconds)
    }

    fn settings_at(endpoint: &str, presign_seconds: u32) -> S3Settings {
        S3Settings {
            endpoint: endpoint.to_string(),
            region: "us-east-1".to_string(),
            access_key_id: "minio123".to_string(),
            secret_access_key: "minio123".to_string(),
            bucket: "media".to_string(),
            presign_seconds,
        }
    }

    #[test]
    fn public_url_is_path_style() {
        let storage = S3FileStorage::build(settings(0)).unwrap();
        assert_eq!(storage.public_url("abc/clip.mp4"), "http://localhost:9000/media/abc/clip.mp4");
    }

    #[test]
    fn public_url_encodes_the_key() {
        let storage = S3FileStorage::build(settings(0)).unwrap();
        assert_eq!(
            storage.public_url("abc/my clip (1).mp4"),
            "http://localhost:9000/media/abc/my%20clip%20%281%29.mp4"
        );
    }

    #[test]
    fn presigned_url_expires_and_names_the_download() {
        let storage = S3FileStorage::build(settings(3600)).unwrap();
        let url = storage.stored_url("abc/clip.mp4", "clip.mp4").unwrap();

        assert!(url.starts_with("http://localhost:9000/media/abc/clip.mp4?"), "url was {}", url);
        assert!(url.contains("X-Amz-Expires=3600"), "url was {}", url);
        assert!(url.contains("X-Amz-Signature="), "url was {}", url);
        assert!(
            url.contains("response-content-disposition=attachment%3B%20filename%2A%3DUTF-8%27%27clip.mp4"),
            "url was {}",
            url
        );
    }

    #[test]
    fn disposition_escapes_quotes_and_unicode() {
        assert_eq!(
            content_disposition("say \"hi\" é.mp4"),
            "attachment; filename*=UTF-8''say%20%22hi%22%20%C3%A9.mp4"
        );
    }

    async fn spawn_fake_s3(status: StatusCode) -> SocketAddr {
        let app = Router::new().fallback(move || async move { status });
        let server = axum::Server::bind(&"127.0.0.1:0".parse().unwrap()).serve(app.into_make_service());
        let addr = server.local_addr();
        tokio::spawn(server);
        addr
    }

    #[tokio::test]
    async fn stores_under_a_random_prefix() {
        let addr = spawn_fake_s3(StatusCode::OK).await;
        let storage = S3FileStorage::build(settings_at(&format!("http://{}", addr), 0)).unwrap();
        let file = UploadedFile::new("clip.mp4", None, Bytes::from_static(b"video"));

        let url = storage.store(&file).await.unwrap();
        let key = url.strip_prefix(&format!("http://{}/media/", addr)).unwrap();
        let (prefix, name) = key.split_once('/').unwrap();
        assert_eq!(prefix.len(), 30);
        assert!(prefix.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(name, "clip.mp4");
    }

    #[tokio::test]
    async fn failed_put_is_a_storage_error() {
        let addr = spawn_fake_s3(StatusCode::INTERNAL_SERVER_ERROR).await;
        let storage = S3FileStorage::build(settings_at(&format!("http://{}", addr), 0)).unwrap();
        let file = UploadedFile::new("clip.mp4", None, Bytes::from_static(b"video"));

        let err = storage.store(&file).await.unwrap_err();
        assert!(matches!(err, RelayError::Storage(_)), "error was {}", err);
    }
}
