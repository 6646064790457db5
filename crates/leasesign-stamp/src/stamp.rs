//! Typed stamp rendering.
//!
//! Pure in the sense that matters: identical `(name, style)` inputs yield
//! identical PNG bytes. Nothing is cached or persisted; callers recompute
//! on every name or style change while in typed mode.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use imageproc::geometric_transformations::{warp, Interpolation, Projection};
use rusttype::{point, Font, Scale};

use leasesign_core::{SignatureTab, SignerIdentity, TabKind, ValueSource};

use crate::encode;
use crate::fonts;

/// Fixed canvas sizes, device pixels.
pub const SIGNATURE_WIDTH: u32 = 360;
pub const SIGNATURE_HEIGHT: u32 = 110;
pub const INITIALS_WIDTH: u32 = 96;
pub const INITIALS_HEIGHT: u32 = 64;

const SIGNATURE_SCALE: f32 = 44.0;
const INITIALS_SCALE: f32 = 36.0;

/// Rightward slant applied to signature stamps; initials render upright.
const SIGNATURE_SHEAR: f32 = -0.22;

pub(crate) const INK: Rgba<u8> = Rgba([17, 24, 39, 255]);
pub(crate) const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A rendered stamp image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl StampImage {
    pub(crate) fn from_canvas(canvas: &RgbaImage) -> Option<Self> {
        let png = encode::encode_png(canvas)?;
        Some(Self {
            width: canvas.width(),
            height: canvas.height(),
            png,
        })
    }

    /// The image as an embeddable `data:image/png;base64,` URI.
    pub fn data_uri(&self) -> String {
        encode::png_data_uri(&self.png)
    }
}

/// Derives display initials from a full name: first letters of the first
/// and last space-separated parts, or the first two characters of a
/// single-part name, uppercased either way. Empty input yields "".
pub fn generate_initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => String::new(),
        [only] => only.chars().take(2).flat_map(char::to_uppercase).collect(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
    }
}

/// Rasterizes a signature stamp: the full name, slanted, centered on the
/// fixed canvas. `style` selects one of three font presets. An empty name
/// yields no image.
pub fn render_signature(name: &str, style: usize) -> Option<StampImage> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let font = fonts::global_font_cache().preset(style)?;
    let canvas = draw_centered(
        name,
        font,
        Scale::uniform(SIGNATURE_SCALE),
        SIGNATURE_WIDTH,
        SIGNATURE_HEIGHT,
    );
    StampImage::from_canvas(&sheared(&canvas, SIGNATURE_SHEAR))
}

/// Rasterizes an initials stamp: derived initials, upright, centered on
/// the smaller fixed canvas. An empty name yields no image.
pub fn render_initials(name: &str) -> Option<StampImage> {
    let initials = generate_initials(name);
    if initials.is_empty() {
        return None;
    }
    let font = fonts::global_font_cache().preset(0)?;
    let canvas = draw_centered(
        &initials,
        font,
        Scale::uniform(INITIALS_SCALE),
        INITIALS_WIDTH,
        INITIALS_HEIGHT,
    );
    StampImage::from_canvas(&canvas)
}

fn draw_centered(text: &str, font: &Font<'_>, scale: Scale, width: u32, height: u32) -> RgbaImage {
    let mut canvas = ImageBuffer::from_pixel(width, height, PAPER);

    let v_metrics = font.v_metrics(scale);
    let text_width = font
        .layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    let text_height = v_metrics.ascent - v_metrics.descent;

    let x = ((width as f32 - text_width) / 2.0).max(0.0);
    let y = ((height as f32 - text_height) / 2.0).max(0.0);

    draw_text_mut(&mut canvas, INK, x as i32, y as i32, scale, font, text);
    canvas
}

/// Shears the canvas horizontally, keeping the result centered; uncovered
/// pixels fill with the background.
fn sheared(canvas: &RgbaImage, k: f32) -> RgbaImage {
    let tx = -k * canvas.height() as f32 / 2.0;
    match Projection::from_matrix([1.0, k, tx, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]) {
        Some(projection) => warp(canvas, &projection, Interpolation::Bilinear, PAPER),
        // A shear matrix is always invertible; fall through untouched.
        None => canvas.clone(),
    }
}

/// Typed-mode value source: generates stamps from the signer name. The
/// apply becomes a no-op when the name is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedStamp {
    /// Signature font preset index (0..=2).
    pub style: usize,
}

impl ValueSource for TypedStamp {
    fn value_for(&mut self, tab: &SignatureTab, signer: &SignerIdentity) -> Option<String> {
        let image = match tab.kind {
            TabKind::Signature => render_signature(&signer.name, self.style),
            TabKind::Initial => render_initials(&signer.name),
        }?;
        Some(image.data_uri())
    }
}
