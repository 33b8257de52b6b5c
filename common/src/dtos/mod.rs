use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::UploadResult;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadResultDto {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<IndexMap<String, String>>,
}

impl From<UploadResult> for UploadResultDto {
    fn from(result: UploadResult) -> Self {
        UploadResultDto {
            url: result.url,
            formats: if result.formats.is_empty() { None } else { Some(result.formats) },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorDto {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ExceptionDto {
    pub url: String,
    pub exception: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ResponseDto {
    Uploaded(UploadResultDto),
    Error(ErrorDto),
    Exception(ExceptionDto),
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HealthDto<'a> {
    pub name: &'a str,
    pub version: &'a str,
}
