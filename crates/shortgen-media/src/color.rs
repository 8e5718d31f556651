//! CSS-style color conversion for FFmpeg drawtext.

/// Convert a CSS-style color to FFmpeg hex form (`0xRRGGBB`).
///
/// Empty input falls back to `default`. Hex strings keep their digits
/// verbatim; `rgb()`/`rgba()` components are re-encoded; anything else
/// (named colors like "white") passes through untouched.
pub fn parse_color(color: &str, default: &str) -> String {
    let color = if color.is_empty() { default } else { color };

    if let Some(hex) = color.strip_prefix('#') {
        return format!("0x{}", hex);
    }

    if color.starts_with("rgba") || color.starts_with("rgb") {
        let (r, g, b, _) = parse_rgb_components(color);
        return format!("0x{:02X}{:02X}{:02X}", r, g, b);
    }

    color.to_string()
}

/// Convert a color plus an opacity to `0xRRGGBBAA`.
///
/// Opacity is clamped to [0, 1]. The alpha channel always comes from
/// `opacity`; an alpha inside an `rgba()` string is ignored. Unrecognized
/// colors degrade to black with the requested opacity.
pub fn parse_color_with_alpha(color: &str, opacity: f64) -> String {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u32;

    if color.starts_with("rgba") {
        let (r, g, b, _) = parse_rgb_components(color);
        return format!("0x{:02X}{:02X}{:02X}{:02X}", r, g, b, alpha);
    }

    if let Some(hex) = color.strip_prefix('#') {
        return format!("0x{}{:02X}", hex, alpha);
    }

    format!("0x000000{:02X}", alpha)
}

/// Pull numeric components out of an `rgb(r,g,b)` / `rgba(r,g,b,a)`
/// string. Missing or malformed components read as zero.
fn parse_rgb_components(color: &str) -> (u8, u8, u8, f64) {
    let inner = color
        .trim_start_matches(|c: char| c != '(')
        .trim_start_matches('(')
        .trim_end_matches(')');

    let mut parts = inner.split(',').map(str::trim);
    let r = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let g = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let b = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let a = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0.0);

    (r, g, b, a)
}
