//! Font family normalization and weight resolution for subtitle rendering.
//!
//! Requested web font families are mapped onto fonts that ship with the
//! render host. Unknown families fall back to the default stack.

/// A (weight, file path) variant of a font family.
#[derive(Debug, Clone, Copy)]
struct FontVariant {
    weight: i32,
    path: &'static str,
}

const DEFAULT_VARIANTS: &[FontVariant] = &[
    FontVariant { weight: 700, path: "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf" },
    FontVariant { weight: 600, path: "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf" },
    FontVariant { weight: 500, path: "/usr/share/fonts/dejavu/DejaVuSans.ttf" },
    FontVariant { weight: 400, path: "/usr/share/fonts/dejavu/DejaVuSans.ttf" },
    FontVariant { weight: 300, path: "/usr/share/fonts/liberation/LiberationSans-Regular.ttf" },
];

const INTER_VARIANTS: &[FontVariant] = &[
    FontVariant { weight: 700, path: "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf" },
    FontVariant { weight: 600, path: "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf" },
    FontVariant { weight: 500, path: "/usr/share/fonts/dejavu/DejaVuSans.ttf" },
    FontVariant { weight: 400, path: "/usr/share/fonts/dejavu/DejaVuSans.ttf" },
];

const SANS_VARIANTS: &[FontVariant] = &[
    FontVariant { weight: 700, path: "/usr/share/fonts/liberation/LiberationSans-Bold.ttf" },
    FontVariant { weight: 600, path: "/usr/share/fonts/liberation/LiberationSans-Bold.ttf" },
    FontVariant { weight: 500, path: "/usr/share/fonts/liberation/LiberationSans-Regular.ttf" },
    FontVariant { weight: 400, path: "/usr/share/fonts/liberation/LiberationSans-Regular.ttf" },
];

const SERIF_VARIANTS: &[FontVariant] = &[
    FontVariant { weight: 700, path: "/usr/share/fonts/freefont/FreeSerifBold.ttf" },
    FontVariant { weight: 600, path: "/usr/share/fonts/freefont/FreeSerifBold.ttf" },
    FontVariant { weight: 500, path: "/usr/share/fonts/freefont/FreeSerif.ttf" },
    FontVariant { weight: 400, path: "/usr/share/fonts/freefont/FreeSerif.ttf" },
];

const MONO_VARIANTS: &[FontVariant] = &[
    FontVariant { weight: 700, path: "/usr/share/fonts/liberation/LiberationMono-Bold.ttf" },
    FontVariant { weight: 400, path: "/usr/share/fonts/liberation/LiberationMono-Regular.ttf" },
];

/// Normalize a requested family name to a known key.
///
/// Matching is substring-based so variants like "Space_Grotesk" or
/// "Courier" still resolve. Anything unknown maps to the default stack.
fn normalize_family(font_family: &str) -> &'static [FontVariant] {
    let family = font_family.trim().to_lowercase();
    if family.is_empty() {
        return DEFAULT_VARIANTS;
    }

    if family.contains("space") && family.contains("grotesk") {
        SANS_VARIANTS
    } else if family.contains("playfair") {
        SERIF_VARIANTS
    } else if family.contains("courier") || family.contains("mono") {
        MONO_VARIANTS
    } else if family.contains("open sans") || family.contains("poppins") {
        SANS_VARIANTS
    } else if family.contains("inter") {
        INTER_VARIANTS
    } else {
        DEFAULT_VARIANTS
    }
}

/// Resolve a font file for the requested family, weight and bold flag.
///
/// Weight 0 is treated as 400; `bold` bumps the target to at least 600.
/// The closest available weight wins, with earlier table entries taking
/// precedence on ties.
pub fn resolve_font_path(font_family: &str, weight: i32, bold: bool) -> &'static str {
    let variants = normalize_family(font_family);

    let mut target = if weight == 0 { 400 } else { weight };
    if bold && target < 600 {
        target = 600;
    }

    let mut best_path = variants[0].path;
    let mut best_diff = i32::MAX;
    for variant in variants {
        let diff = (target - variant.weight).abs();
        if diff < best_diff {
            best_diff = diff;
            best_path = variant.path;
        }
    }

    best_path
}
