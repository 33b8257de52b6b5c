use std::{path::Path, str::FromStr};

use mime::Mime;

pub fn get_content_type(mime_type: Option<&str>, filename: &str) -> Mime {
    if let Some(mime_type) = mime_type {
        if let Some(content_type) = Mime::from_str(mime_type).ok() {
            return content_type;
        }
    }
    if let Some(extension) = Path::new(filename).extension() {
        if let Some(extension) = extension.to_str() {
            let extension = extension.to_ascii_lowercase();
            return match extension.as_str() {
                "mp4" | "m4v" => video("mp4"),
                "webm" => video("webm"),
                "ogv" => video("ogg"),
                "mov" => video("quicktime"),
                "mkv" => video("x-matroska"),
                "avi" => video("x-msvideo"),
                "png" => mime::IMAGE_PNG,
                "jpg" | "jpeg" => mime::IMAGE_JPEG,
                "pdf" => mime::APPLICATION_PDF,
                _ => mime::APPLICATION_OCTET_STREAM,
            };
        }
    }
    mime::APPLICATION_OCTET_STREAM
}

fn video(subtype: &str) -> Mime {
    Mime::from_str(&format!("video/{}", subtype)).unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_mime_type_wins() {
        assert_eq!(get_content_type(Some("video/webm"), "clip.mp4").essence_str(), "video/webm");
    }

    #[test]
    fn falls_back_to_extension() {
        assert_eq!(get_content_type(Some("not a mime"), "clip.MP4").essence_str(), "video/mp4");
        assert_eq!(get_content_type(None, "clip.ogv").essence_str(), "video/ogg");
        assert_eq!(get_content_type(None, "clip"), mime::APPLICATION_OCTET_STREAM);
    }
}
