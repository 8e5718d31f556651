//! Subtitle filter graph construction.
//!
//! Converts a list of styled cues into a single `drawtext` filter chain
//! that approximates the browser-canvas preview: background box with a
//! soft drop shadow, the text itself, and an optional highlight overlay
//! that fades in over the cue.

use shortgen_models::{SubtitleCue, SubtitlePosition};

use crate::color::{parse_color, parse_color_with_alpha};
use crate::fonts::resolve_font_path;

/// Reference canvas the style values were authored against.
const CANVAS_HEIGHT: f64 = 720.0;
/// Distance from the canvas edge for top/bottom anchoring.
const BOTTOM_MARGIN: f64 = 40.0;
/// Background box padding on the reference canvas.
const PADDING_PX: f64 = 12.0;
/// Text drop shadow offset on the reference canvas.
const TEXT_SHADOW_OFFSET: f64 = 1.0;
/// Background box shadow offset on the reference canvas.
const BG_SHADOW_OFFSET: f64 = 4.0;

/// Output height the reference canvas is scaled up to.
const OUTPUT_HEIGHT: f64 = 1920.0;

/// Minimum rendered font size for readability.
const MIN_FONT_SIZE: i32 = 36;
/// Fallback font size when a cue does not specify one.
const DEFAULT_FONT_SIZE: i32 = 20;

/// Shortest visible window granted to degenerate cues.
const MIN_VISIBLE_SECS: f64 = 0.1;

/// Escape text for embedding in a `drawtext=text='...'` argument.
///
/// Only two characters carry meaning there: the single quote ends the
/// quoted value and the colon separates filter options.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\'', "'\\\\\\''").replace(':', "\\:")
}

/// Build a composited filter expression from an ordered cue list.
///
/// One chain of layers per non-blank cue (shadow, base, optional
/// highlight), joined with "," for sequential application. Cue order is
/// preserved; overlapping cues stack as authored.
pub fn build_subtitle_filter(cues: &[SubtitleCue]) -> String {
    let scale_factor = OUTPUT_HEIGHT / CANVAS_HEIGHT;
    let mut filters: Vec<String> = Vec::new();

    for cue in cues {
        if cue.text.trim().is_empty() {
            continue;
        }

        let text = escape_drawtext(&cue.text);

        let font_size = if cue.font_size <= 0 {
            DEFAULT_FONT_SIZE
        } else {
            cue.font_size
        };
        let scaled_font_size =
            ((font_size as f64 * scale_factor).round() as i32).max(MIN_FONT_SIZE);

        let font_path = resolve_font_path(&cue.font_family, cue.font_weight, cue.bold);

        let text_color = parse_color(&cue.color, "#FFFFFF");
        let mut bg_opacity = cue.bg_opacity.clamp(0.0, 1.0);
        if cue.bg_opacity == 0.0 && cue.bg_color.is_empty() {
            bg_opacity = 0.8;
        }
        let bg_color_hex = parse_color_with_alpha(&cue.bg_color, bg_opacity);

        // Box padding scales from the canvas, widened slightly by corner
        // rounding but never below the unadjusted padding.
        let radius_adjustment = cue.border_radius as f64 * 0.3;
        let padding_floor = (PADDING_PX * scale_factor).round() as i32;
        let box_border =
            (((PADDING_PX + radius_adjustment) * scale_factor).round() as i32).max(padding_floor);

        let target_y = match cue.position {
            SubtitlePosition::Top => BOTTOM_MARGIN,
            SubtitlePosition::Center => CANVAS_HEIGHT / 2.0,
            SubtitlePosition::Bottom => CANVAS_HEIGHT - BOTTOM_MARGIN,
        } * scale_factor;
        let y_expr = format!("({:.2})-text_h/2", target_y);
        let x_expr = "(w-text_w)/2";

        // Degenerate windows get a minimum visible duration instead of a
        // negative gate.
        let gate_end = if cue.end_time <= cue.start_time {
            cue.start_time + MIN_VISIBLE_SECS
        } else {
            cue.end_time
        };
        let enable_expr = format!("enable='between(t,{:.2},{:.2})'", cue.start_time, gate_end);

        // Soft background shadow, simulated with an offset invisible-text box.
        if bg_opacity > 0.0 {
            let shadow_blur = if cue.shadow_blur <= 0 { 12 } else { cue.shadow_blur };
            let shadow_spread = (shadow_blur as f64 * scale_factor / 6.0).round() as i32;
            let shadow_border = box_border + shadow_spread;
            let shadow_opacity = (0.18 + shadow_blur as f64 / 60.0).clamp(0.2, 0.55);
            let shadow_color = format!("0x000000{:02X}", (shadow_opacity * 255.0).round() as i32);
            let shadow_y_offset = (BG_SHADOW_OFFSET * scale_factor).round() as i32;

            filters.push(format!(
                "drawtext=text='{}':fontfile={}:fontsize={}:fontcolor=0x000000@0:box=1:boxcolor={}:boxborderw={}:x={}:y={}+{}:{}",
                text,
                font_path,
                scaled_font_size,
                shadow_color,
                shadow_border,
                x_expr,
                y_expr,
                shadow_y_offset,
                enable_expr,
            ));
        }

        // Base text + background box, with a subtle text drop shadow.
        let text_shadow_y = ((TEXT_SHADOW_OFFSET * scale_factor).round() as i32).max(1);
        filters.push(format!(
            "drawtext=text='{}':fontfile={}:fontsize={}:fontcolor={}:box=1:boxcolor={}:boxborderw={}:x={}:y={}:{}:shadowx=0:shadowy={}:shadowcolor=black@0.5",
            text,
            font_path,
            scaled_font_size,
            text_color,
            bg_color_hex,
            box_border,
            x_expr,
            y_expr,
            enable_expr,
            text_shadow_y,
        ));

        // Karaoke-style overlay: text only, fading in over most of the cue.
        if !cue.active_text_color.is_empty() && cue.active_text_color != cue.color {
            let active_color = parse_color(&cue.active_text_color, &cue.color);
            let mut duration = cue.end_time - cue.start_time;
            if duration <= 0.0 {
                duration = MIN_VISIBLE_SECS;
            }
            let fade_duration = duration * 0.85;

            filters.push(format!(
                "drawtext=text='{}':fontfile={}:fontsize={}:fontcolor={}:box=0:x={}:y={}:{}:alpha='min(1\\,max(0\\,(t-{:.2})/{:.2}))'",
                text,
                font_path,
                scaled_font_size,
                active_color,
                x_expr,
                y_expr,
                enable_expr,
                cue.start_time,
                fade_duration,
            ));
        }
    }

    filters.join(",")
}
