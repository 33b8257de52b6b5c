use common::util::state::{DropboxSettings, EncodingSettings, FfmpegSettings, FtpSettings, RelaySettings, S3Settings};
use mediarelay::{create_app, state::ServiceCollection};
use std::env;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let subscriber = tracing_subscriber::fmt().json().finish();
    tracing::subscriber::set_global_default(subscriber).expect("Could not init tracing.");

    let settings = RelaySettings {
        s3: get_s3_settings(),
        ftp: get_ftp_settings(),
        dropbox: get_dropbox_settings(),
        encoding: get_encoding_settings(),
        ffmpeg: get_ffmpeg_settings(),
    };

    let services = match ServiceCollection::build(settings) {
        Ok(services) => services,
        Err(err) => {
            error!("Could not build services: {}", err);
            process::exit(1);
        }
    };

    let app = create_app(services, get_max_upload_bytes());

    let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), get_port());
    info!("listening on {}", &addr);
    if let Err(err) = axum::Server::bind(&addr).serve(app.into_make_service()).await {
        error!("Server stopped: {}", err);
        process::exit(1);
    }
}

fn get_var(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_port() -> u16 {
    match env::var("PORT").map(|port| port.parse::<u16>()) {
        Ok(Ok(port)) => port,
        _ => 8000,
    }
}

fn get_max_upload_bytes() -> usize {
    match env::var("MAX_UPLOAD_BYTES").map(|max| max.parse::<usize>()) {
        Ok(Ok(max)) if max > 0 => max,
        _ => 100 * 1024 * 1024,
    }
}

fn get_s3_settings() -> S3Settings {
    let presign_seconds = match env::var("S3_PRESIGN_SECONDS").map(|expire| expire.parse::<u32>()) {
        Ok(Ok(presign_seconds)) => presign_seconds,
        _ => 0,
    };
    S3Settings {
        endpoint: get_var("S3_ENDPOINT", "http://localhost:9000"),
        region: get_var("S3_REGION", "us-east-1"),
        access_key_id: get_var("S3_ACCESS_KEY_ID", "minio123"),
        secret_access_key: get_var("S3_SECRET_ACCESS_KEY", "minio123"),
        bucket: get_var("S3_BUCKET", "bucket"),
        presign_seconds,
    }
}

fn get_ftp_settings() -> FtpSettings {
    let port = match env::var("FTP_PORT").map(|port| port.parse::<u16>()) {
        Ok(Ok(port)) => port,
        _ => 21,
    };
    FtpSettings {
        hostname: get_var("FTP_HOSTNAME", "localhost"),
        port,
        username: get_var("FTP_USERNAME", "anonymous"),
        password: get_var("FTP_PASSWORD", ""),
        destination: get_var("FTP_DESTINATION", "uploads"),
    }
}

fn get_dropbox_settings() -> DropboxSettings {
    DropboxSettings {
        access_token: get_var("DROPBOX_ACCESS_TOKEN", ""),
        container: get_var("DROPBOX_CONTAINER", "uploads"),
        content_url: get_var("DROPBOX_CONTENT_URL", "https://content.dropboxapi.com"),
        api_url: get_var("DROPBOX_API_URL", "https://api.dropboxapi.com"),
    }
}

fn get_encoding_settings() -> EncodingSettings {
    EncodingSettings {
        endpoint: get_var("ENCODING_ENDPOINT", "https://manage.encoding.com/api/encode"),
        app_id: get_var("ENCODING_APP_ID", ""),
        access_token: get_var("ENCODING_ACCESS_TOKEN", ""),
    }
}

fn get_ffmpeg_settings() -> FfmpegSettings {
    FfmpegSettings {
        ffmpeg_path: get_var("FFMPEG_PATH", "ffmpeg"),
    }
}
