use std::{fmt, str::FromStr};

use bytes::Bytes;
use mime::Mime;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{error::RelayError, util::mime::get_content_type};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UploadTarget {
    S3,
    Ftp,
    Dropbox,
}

impl UploadTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadTarget::S3 => "s3",
            UploadTarget::Ftp => "ftp",
            UploadTarget::Dropbox => "dropbox",
        }
    }
}

impl FromStr for UploadTarget {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s3" => Ok(UploadTarget::S3),
            "ftp" => Ok(UploadTarget::Ftp),
            "dropbox" => Ok(UploadTarget::Dropbox),
            other => Err(RelayError::InvalidTarget(other.to_string())),
        }
    }
}

impl fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ConversionFormat {
    Mp4,
    Webm,
    Ogv,
}

impl ConversionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionFormat::Mp4 => "mp4",
            ConversionFormat::Webm => "webm",
            ConversionFormat::Ogv => "ogv",
        }
    }
}

impl FromStr for ConversionFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(ConversionFormat::Mp4),
            "webm" => Ok(ConversionFormat::Webm),
            "ogv" => Ok(ConversionFormat::Ogv),
            other => Err(RelayError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ConversionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded or converted file held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Mime,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: &str, mime_type: Option<&str>, bytes: Bytes) -> Self {
        UploadedFile {
            file_name: safe_file_name(file_name).to_string(),
            content_type: get_content_type(mime_type, file_name),
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("upload")
    }
}

/// Drops any client-side directories from an uploaded file name.
fn safe_file_name(file_name: &str) -> &str {
    file_name.rsplit(&['/', '\\'][..]).next().unwrap_or_default()
}

/// Raw inbound request, as extracted from the HTTP layer. Nothing in here is validated yet.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub method: Method,
    pub upload: Option<String>,
    pub formats: Vec<String>,
    pub file: Option<UploadedFile>,
}

impl UploadRequest {
    pub fn new(method: Method) -> Self {
        UploadRequest {
            method,
            upload: None,
            formats: Vec::new(),
            file: None,
        }
    }
}
