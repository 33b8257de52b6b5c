use std::sync::Arc;

use reqwest::{Method, StatusCode};
use tracing::{info, warn};

use crate::{
    convert::IFormatConverter,
    dtos::{ErrorDto, ExceptionDto, ResponseDto},
    error::RelayResult,
    models::{ConversionFormat, ConversionResult, UploadRequest, UploadResult, UploadTarget, UploadedFile},
    persistence::IUploadRelay,
};

pub const FILE_NOT_FOUND: &str = "File not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: Option<ResponseDto>,
}

impl DispatchResponse {
    fn empty(status: StatusCode) -> Self {
        DispatchResponse { status, body: None }
    }

    fn json(status: StatusCode, body: ResponseDto) -> Self {
        DispatchResponse { status, body: Some(body) }
    }

    /// Serialized body, empty when there is nothing to report.
    pub fn body_string(&self) -> String {
        match &self.body {
            Some(body) => serde_json::to_string(body).unwrap_or_default(),
            None => String::new(),
        }
    }
}

pub struct DispatchService {
    pub format_converter: Arc<dyn IFormatConverter>,
    pub upload_relay: Arc<dyn IUploadRelay>,
}

impl DispatchService {
    #[tracing::instrument(skip(self, request), fields(method = %request.method))]
    pub async fn handle(&self, request: UploadRequest) -> DispatchResponse {
        match request.method {
            Method::POST => self.handle_post(request).await,
            Method::GET => DispatchResponse::empty(StatusCode::METHOD_NOT_ALLOWED),
            _ => DispatchResponse::empty(StatusCode::BAD_REQUEST),
        }
    }

    async fn handle_post(&self, request: UploadRequest) -> DispatchResponse {
        let file = match request.file {
            Some(file) if !file.is_empty() => file,
            _ => {
                return DispatchResponse::json(
                    StatusCode::BAD_REQUEST,
                    ResponseDto::Error(ErrorDto {
                        error: FILE_NOT_FOUND.to_string(),
                    }),
                )
            }
        };
        let target = match request.upload.as_deref().map(str::parse::<UploadTarget>) {
            Some(Ok(target)) => target,
            _ => {
                info!("Rejected upload target {:?}", request.upload);
                return DispatchResponse::empty(StatusCode::BAD_REQUEST);
            }
        };
        if !request.formats.is_empty() {
            info!("Requested formats {:?}", &request.formats);
        }

        let mut result = UploadResult::default();
        match self.upload(target, &request.formats, &file, &mut result).await {
            Ok(()) => DispatchResponse::json(StatusCode::OK, ResponseDto::Uploaded(result.into())),
            Err(err) => {
                warn!("Upload of {} to {} failed: {}", &file.file_name, target, &err);
                DispatchResponse::json(
                    StatusCode::BAD_REQUEST,
                    ResponseDto::Exception(ExceptionDto {
                        url: result.url,
                        exception: err.to_string(),
                    }),
                )
            }
        }
    }

    /// Converts into every requested format, then relays the original. `result` keeps whatever
    /// was reached before a failure.
    async fn upload(&self, target: UploadTarget, formats: &[String], file: &UploadedFile, result: &mut UploadResult) -> RelayResult<()> {
        let formats = formats
            .iter()
            .map(|format| format.parse::<ConversionFormat>())
            .collect::<RelayResult<Vec<_>>>()?;

        for format in formats {
            let url = match self.format_converter.convert(format, file).await? {
                ConversionResult::Url(url) => url,
                ConversionResult::File(converted) => self.upload_relay.relay(target, &converted).await?,
            };
            result.formats.insert(format.to_string(), url);
        }

        result.url = self.upload_relay.relay(target, file).await?;
        Ok(())
    }
}
