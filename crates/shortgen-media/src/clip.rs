//! Clip rendering: vertical reframing plus burned-in subtitles.

use std::path::Path;
use tracing::info;

use shortgen_models::encoding::{OUTPUT_HEIGHT, OUTPUT_WIDTH};
use shortgen_models::{EncodingConfig, SubtitleCue};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::subtitles::build_subtitle_filter;

/// Scale to full output height, then center-crop anything wider than the
/// vertical frame.
const VERTICAL_REFRAME: &str = "scale=-1:1920,crop=min(iw\\,1080):1920";

fn validate_window(start: f64, end: f64) -> MediaResult<()> {
    if start < 0.0 || end <= start {
        return Err(MediaError::InvalidWindow { start, end });
    }
    Ok(())
}

fn build_render_command(
    input: &Path,
    output: &Path,
    start: f64,
    end: f64,
    cues: &[SubtitleCue],
    encoding: &EncodingConfig,
) -> FfmpegCommand {
    let subtitle_filter = build_subtitle_filter(cues);
    let vf = if subtitle_filter.is_empty() {
        VERTICAL_REFRAME.to_string()
    } else {
        format!("{},{}", VERTICAL_REFRAME, subtitle_filter)
    };

    FfmpegCommand::new(input, output)
        .seek(start)
        .duration(end - start)
        .video_filter(vf)
        .size(OUTPUT_WIDTH, OUTPUT_HEIGHT)
        .output_args(encoding.to_ffmpeg_args())
}

/// Render a delivery clip: the requested window reframed to 1080x1920
/// with the given subtitle cues burned in.
pub async fn render_clip(
    input: &Path,
    output: &Path,
    start: f64,
    end: f64,
    cues: &[SubtitleCue],
) -> MediaResult<()> {
    validate_window(start, end)?;
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        input = %input.display(),
        output = %output.display(),
        start,
        end,
        cues = cues.len(),
        "Rendering clip"
    );

    let cmd = build_render_command(
        input,
        output,
        start,
        end,
        cues,
        &EncodingConfig::final_delivery(),
    );
    FfmpegRunner::new().run(&cmd).await
}

/// Extract the raw window reframed to vertical, without subtitles, for
/// callers that will composite their own overlay.
pub async fn extract_raw_clip(
    input: &Path,
    output: &Path,
    start: f64,
    end: f64,
) -> MediaResult<()> {
    validate_window(start, end)?;
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        input = %input.display(),
        output = %output.display(),
        start,
        end,
        "Extracting raw clip"
    );

    let cmd = build_render_command(input, output, start, end, &[], &EncodingConfig::raw_extract());
    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inverted_window_rejected_before_spawn() {
        let err = render_clip(
            Path::new("/nonexistent/in.mp4"),
            Path::new("/tmp/out.mp4"),
            10.0,
            5.0,
            &[],
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            MediaError::InvalidWindow { start, end } if start == 10.0 && end == 5.0
        ));
    }

    #[tokio::test]
    async fn test_negative_start_rejected() {
        let err = extract_raw_clip(
            Path::new("/nonexistent/in.mp4"),
            Path::new("/tmp/out.mp4"),
            -1.0,
            5.0,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::InvalidWindow { .. }));
    }

    #[tokio::test]
    async fn test_missing_input_rejected() {
        let err = render_clip(
            Path::new("/nonexistent/in.mp4"),
            Path::new("/tmp/out.mp4"),
            0.0,
            5.0,
            &[],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, MediaError::FileNotFound(_)));
    }

    #[test]
    fn test_render_args_without_subtitles() {
        let cmd = build_render_command(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            5.0,
            20.0,
            &[],
            &EncodingConfig::final_delivery(),
        );
        let args = cmd.build_args();
        assert!(args.contains(&VERTICAL_REFRAME.to_string()));
        assert!(args.contains(&"15.000".to_string()));
        assert!(args.contains(&"1080x1920".to_string()));
        assert!(args.contains(&"medium".to_string()));
    }

    #[test]
    fn test_render_args_append_subtitle_filter() {
        let cues = vec![SubtitleCue::new("Hello", 0.0, 2.0)];
        let cmd = build_render_command(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            0.0,
            10.0,
            &cues,
            &EncodingConfig::final_delivery(),
        );
        let args = cmd.build_args();
        let vf = args
            .iter()
            .position(|a| a == "-vf")
            .map(|i| args[i + 1].clone())
            .unwrap();
        assert!(vf.starts_with(VERTICAL_REFRAME));
        assert!(vf.contains("drawtext=text='Hello'"));
    }

    #[test]
    fn test_raw_extract_uses_fast_preset() {
        let cmd = build_render_command(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            0.0,
            10.0,
            &[],
            &EncodingConfig::raw_extract(),
        );
        let args = cmd.build_args();
        assert!(args.contains(&"fast".to_string()));
    }
}
