//! Embedded font presets for stamp rendering.
//!
//! Fonts come from the typst-assets crate so rendering is reproducible
//! across machines with no system-font dependency. Three visually
//! distinct faces from the embedded set serve as the selectable signature
//! style presets.

use std::sync::OnceLock;

use rusttype::Font;

/// Number of selectable signature font presets (style indices 0..2).
pub const STYLE_COUNT: usize = 3;

/// Global font cache singleton
static FONT_CACHE: OnceLock<FontCache> = OnceLock::new();

/// Get the global font cache, initializing it if necessary
pub fn global_font_cache() -> &'static FontCache {
    FONT_CACHE.get_or_init(FontCache::new)
}

/// Parsed embedded faces, with the preset selection made once at startup.
pub struct FontCache {
    presets: Vec<Font<'static>>,
}

impl FontCache {
    fn new() -> Self {
        let faces: Vec<Font<'static>> = typst_assets::fonts()
            .filter_map(Font::try_from_bytes)
            .collect();

        // Spread the picks across the embedded set so the presets come
        // from different families. Selection is deterministic for a given
        // typst-assets version.
        let mut presets = Vec::with_capacity(STYLE_COUNT);
        if !faces.is_empty() {
            for idx in [0, faces.len() / 2, faces.len() - 1] {
                presets.push(faces[idx].clone());
            }
        }

        tracing::debug!(
            "font cache initialized with {} embedded faces, {} presets",
            faces.len(),
            presets.len()
        );

        Self { presets }
    }

    /// The font for a style index. Indices wrap modulo [`STYLE_COUNT`];
    /// `None` only when no embedded face parsed at all.
    pub fn preset(&self, style: usize) -> Option<&Font<'static>> {
        if self.presets.is_empty() {
            None
        } else {
            Some(&self.presets[style % self.presets.len()])
        }
    }
}
