//! Audio extraction for transcription.

use std::path::Path;
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Demux the audio track to mono 16 kHz 16-bit PCM WAV, the input format
/// speech-to-text backends expect.
pub async fn extract_audio(input: &Path, output: &Path) -> MediaResult<()> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let cmd = FfmpegCommand::new(input, output).output_args([
        "-vn",
        "-acodec",
        "pcm_s16le",
        "-ar",
        "16000",
        "-ac",
        "1",
    ]);

    FfmpegRunner::new().run(&cmd).await?;
    debug!(output = %output.display(), "Audio extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_input_fails_before_spawn() {
        let err = extract_audio(Path::new("/nonexistent/in.mp4"), Path::new("/tmp/out.wav"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_pcm_args() {
        let cmd = FfmpegCommand::new("in.mp4", "out.wav").output_args([
            "-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1",
        ]);
        let args = cmd.build_args();
        assert!(args.contains(&"pcm_s16le".to_string()));
        assert!(args.contains(&"16000".to_string()));
    }
}
