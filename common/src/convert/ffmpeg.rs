use std::process::Stdio;

use bytes::Bytes;
use tokio::{fs, process::Command};
use tracing::{info, warn};

use crate::{
    error::{RelayError, RelayResult},
    models::{ConversionFormat, UploadedFile},
    util::{state::FfmpegSettings, tempfiles::TempFileProvider},
};

use super::ITranscoder;

const MP4_ARGS: &[&str] = &["-c:v", "libx264", "-c:a", "aac", "-movflags", "+faststart"];

pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(settings: FfmpegSettings) -> Self {
        FfmpegTranscoder {
            ffmpeg_path: settings.ffmpeg_path,
        }
    }

    async fn run(&self, file: &UploadedFile, files: &TempFileProvider) -> RelayResult<UploadedFile> {
        let input = files.get_path(&format!("input-{}", &file.file_name));
        let output_name = format!("{}.{}", file.stem(), ConversionFormat::Mp4);
        let output = files.get_path(&output_name);
        fs::write(&input, &file.bytes).await?;

        let result = Command::new(&self.ffmpeg_path)
            .arg("-y")
            .arg("-i")
            .arg(&input)
            .args(MP4_ARGS)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| RelayError::Conversion(format!("could not start ffmpeg: {}", err)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let last_line = stderr.lines().last().unwrap_or_default();
            info!("ffmpeg failed with '{}'", &stderr);
            return Err(RelayError::Conversion(format!("ffmpeg exited with {}: {}", result.status, last_line)));
        }

        let bytes = fs::read(&output).await?;
        Ok(UploadedFile::new(&output_name, None, Bytes::from(bytes)))
    }
}

#[async_trait::async_trait]
impl ITranscoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn transcode(&self, file: &UploadedFile) -> RelayResult<UploadedFile> {
        let files = TempFileProvider::build().await?;
        let result = self.run(file, &files).await;
        files.clean_up().await;
        match &result {
            Ok(converted) => info!("Transcoded {} into {} ({} bytes)", &file.file_name, &converted.file_name, converted.len()),
            Err(err) => warn!("Transcoding {} failed: {}", &file.file_name, err),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_conversion_error() {
        let transcoder = FfmpegTranscoder::new(FfmpegSettings {
            ffmpeg_path: "/nonexistent/ffmpeg".to_string(),
        });
        let file = UploadedFile::new("clip.mov", None, Bytes::from_static(b"data"));

        let err = transcoder.transcode(&file).await.unwrap_err();
        assert!(matches!(err, RelayError::Conversion(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_binary_reports_exit_status() {
        let transcoder = FfmpegTranscoder::new(FfmpegSettings {
            ffmpeg_path: "false".to_string(),
        });
        let file = UploadedFile::new("clip.mov", None, Bytes::from_static(b"data"));

        let err = transcoder.transcode(&file).await.unwrap_err();
        assert!(err.to_string().starts_with("Conversion failed: ffmpeg exited with"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_is_read_back_as_mp4() {
        use std::os::unix::fs::PermissionsExt;

        // copies the input (third arg) to the output (last arg)
        let script = std::env::temp_dir().join(format!("fake-ffmpeg-{}", crate::util::random::random_alphanumeric(12)));
        std::fs::write(&script, "#!/bin/sh\neval out=\\${$#}\ncp \"$3\" \"$out\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let transcoder = FfmpegTranscoder::new(FfmpegSettings {
            ffmpeg_path: script.to_string_lossy().to_string(),
        });
        let file = UploadedFile::new("clip.mov", None, Bytes::from_static(b"data"));
        let converted = transcoder.transcode(&file).await;
        std::fs::remove_file(&script).unwrap();

        let converted = converted.unwrap();
        assert_eq!(converted.file_name, "clip.mp4");
        assert_eq!(converted.content_type.essence_str(), "video/mp4");
        assert_eq!(converted.bytes.as_ref(), b"data");
    }

    #[test]
    fn mp4_uses_h264_and_aac() {
        assert!(MP4_ARGS.windows(2).any(|w| w == ["-c:v", "libx264"]));
        assert!(MP4_ARGS.windows(2).any(|w| w == ["-c:a", "aac"]));
    }
}
