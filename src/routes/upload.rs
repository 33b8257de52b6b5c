use axum::{
    body::Body,
    extract::{FromRequest, Multipart, State},
    http::{header::CONTENT_TYPE, Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use common::{
    dispatch::DispatchResponse,
    models::{UploadRequest, UploadedFile},
};
use tracing::{info, warn};

use crate::{consts::JSON_UTF8, state::Services};

pub fn create_route(services: Services) -> Router {
    Router::new().route("/", any(upload)).with_state(services)
}

#[tracing::instrument(skip(services, request))]
pub async fn upload(State(services): State<Services>, method: Method, request: Request<Body>) -> Response {
    let upload_request = read_upload_request(method, request).await;
    let response = services.dispatch_service.handle(upload_request).await;
    info!("Responding with {}", response.status);
    json_response(response)
}

pub fn json_response(response: DispatchResponse) -> Response {
    (response.status, [(CONTENT_TYPE, JSON_UTF8)], response.body_string()).into_response()
}

async fn read_upload_request(method: Method, request: Request<Body>) -> UploadRequest {
    let mut upload_request = UploadRequest::new(method);
    if upload_request.method != Method::POST {
        return upload_request;
    }

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(err) => {
            warn!("Not a multipart upload: {}", err);
            return upload_request;
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!("Could not read multipart body: {}", err);
                break;
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "upload" => upload_request.upload = field.text().await.ok(),
            "formats" | "formats[]" => {
                if let Ok(format) = field.text().await {
                    upload_request.formats.push(format);
                }
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => upload_request.file = Some(UploadedFile::new(&file_name, content_type.as_deref(), bytes)),
                    Err(err) => warn!("Could not read file {}: {}", &file_name, err),
                }
            }
            _ => info!("Ignoring field {}", &name),
        }
    }
    upload_request
}
