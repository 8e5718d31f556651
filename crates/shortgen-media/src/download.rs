//! Video downloading via yt-dlp.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::check_ytdlp;
use crate::error::{MediaError, MediaResult};

/// Format selector: best mp4 video+audio, falling back to best overall.
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Source video metadata reported by yt-dlp without downloading.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMetadata {
    /// Video title
    pub title: String,
    /// Duration in whole seconds
    pub duration_secs: u32,
    /// Thumbnail URL
    pub thumbnail_url: String,
}

/// Probe a URL for title, duration and thumbnail without downloading.
pub async fn probe_metadata(url: &str) -> MediaResult<SourceMetadata> {
    check_ytdlp()?;

    let output = Command::new("yt-dlp")
        .args([
            "--no-warnings",
            "--print",
            "title",
            "--print",
            "duration",
            "--print",
            "thumbnail",
            "--skip-download",
            url,
        ])
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(MediaError::download_failed(format!(
            "yt-dlp metadata probe failed: {}",
            stderr
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_metadata_output(&stdout)
}

/// Parse the three `--print` lines emitted by yt-dlp: title, duration, thumbnail.
fn parse_metadata_output(stdout: &str) -> MediaResult<SourceMetadata> {
    let lines: Vec<&str> = stdout.lines().map(str::trim).collect();
    if lines.len() < 3 {
        return Err(MediaError::invalid_metadata(format!(
            "expected 3 lines from yt-dlp, got {}",
            lines.len()
        )));
    }

    // Duration is printed as a number, sometimes fractional.
    let duration_secs = lines[1]
        .parse::<f64>()
        .map_err(|_| MediaError::invalid_metadata(format!("bad duration: {}", lines[1])))?
        .round()
        .max(0.0) as u32;

    Ok(SourceMetadata {
        title: lines[0].to_string(),
        duration_secs,
        thumbnail_url: lines[2].to_string(),
    })
}

/// Download a source video to the destination path as mp4.
pub async fn download_video(url: &str, dest: &Path) -> MediaResult<()> {
    check_ytdlp()?;

    info!(url, dest = %dest.display(), "Downloading video");

    let output = Command::new("yt-dlp")
        .args([
            "-f",
            FORMAT_SELECTOR,
            "--merge-output-format",
            "mp4",
            "--no-warnings",
            "--no-progress",
            "-o",
        ])
        .arg(dest)
        .arg(url)
        .stdin(Stdio::null())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(MediaError::download_failed(format!(
            "yt-dlp download failed: {}",
            stderr
        )));
    }

    if !dest.exists() {
        return Err(MediaError::FileNotFound(dest.to_path_buf()));
    }

    debug!(dest = %dest.display(), "Download complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_output() {
        let meta = parse_metadata_output(
            "My Great Video\n123.7\nhttps://img.example/thumb.jpg\n",
        )
        .unwrap();
        assert_eq!(meta.title, "My Great Video");
        assert_eq!(meta.duration_secs, 124);
        assert_eq!(meta.thumbnail_url, "https://img.example/thumb.jpg");
    }

    #[test]
    fn test_parse_metadata_integer_duration() {
        let meta = parse_metadata_output("T\n60\nthumb\n").unwrap();
        assert_eq!(meta.duration_secs, 60);
    }

    #[test]
    fn test_parse_metadata_too_few_lines() {
        let err = parse_metadata_output("Only Title\n").unwrap_err();
        assert!(matches!(err, MediaError::InvalidMetadata(_)));
    }

    #[test]
    fn test_parse_metadata_bad_duration() {
        let err = parse_metadata_output("T\nNA\nthumb\n").unwrap_err();
        assert!(matches!(err, MediaError::InvalidMetadata(_)));
    }
}
