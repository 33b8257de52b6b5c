use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid file conversion format")]
    InvalidFormat(String),

    #[error("Invalid upload target")]
    InvalidTarget(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("FTP error: {0}")]
    Ftp(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Encoding service error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<s3::error::S3Error> for RelayError {
    fn from(err: s3::error::S3Error) -> Self {
        RelayError::Storage(err.to_string())
    }
}

impl From<suppaftp::FtpError> for RelayError {
    fn from(err: suppaftp::FtpError) -> Self {
        RelayError::Ftp(err.to_string())
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
