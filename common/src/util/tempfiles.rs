use std::{env, path::PathBuf};
use tokio::fs;
use tracing::warn;

use crate::error::RelayResult;

use super::random::random_alphanumeric;

/// Scratch directory for a single conversion, removed by `clean_up`.
#[derive(Debug)]
pub struct TempFileProvider {
    directory: PathBuf,
}

impl TempFileProvider {
    pub async fn build() -> RelayResult<TempFileProvider> {
        let directory = env::temp_dir().join(format!("mediarelay-{}", random_alphanumeric(12)));
        fs::create_dir_all(&directory).await?;
        Ok(TempFileProvider { directory })
    }

    pub async fn clean_up(&self) {
        if let Err(err) = fs::remove_dir_all(&self.directory).await {
            warn!("Error occured, while deleting temp files for {}: {}", self.directory.display(), &err)
        }
    }

    pub fn get_path(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clean_up_removes_directory() {
        let files = TempFileProvider::build().await.unwrap();
        let path = files.get_path("input.bin");
        fs::write(&path, b"data").await.unwrap();
        assert!(path.exists());

        files.clean_up().await;
        assert!(!path.exists());
        assert!(!files.directory.exists());
    }
}
