//! Freehand drawing capture over a fixed-size raster surface.
//!
//! Models the browser pointer-capture contract: a stroke begins on Down,
//! continues through Move events even after the pointer leaves the
//! surface bounds (coordinates are clamped before stroking), and ends on
//! Up, Leave or Cancel. The canvas is allocated at device-pixel-ratio
//! resolution so strokes stay crisp on scaled displays.

use image::{ImageBuffer, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use leasesign_core::{SignatureTab, SignerIdentity, ValueSource};

use crate::stamp::{StampImage, INK, PAPER};

/// Pointer input feeding the surface, in logical (CSS pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
    Cancel,
}

/// A drawing surface for one field at a time. Re-entering draw mode for a
/// different field goes through [`reset`](DrawSurface::reset).
#[derive(Debug, Clone)]
pub struct DrawSurface {
    canvas: RgbaImage,
    scale: f32,
    last_point: Option<(f32, f32)>,
    inked: bool,
}

impl DrawSurface {
    /// Allocates the canvas at `width x height` logical pixels scaled by
    /// the device pixel ratio, filled with the solid background.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let scale = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let canvas = ImageBuffer::from_pixel(
            (width as f32 * scale).round().max(1.0) as u32,
            (height as f32 * scale).round().max(1.0) as u32,
            PAPER,
        );
        Self {
            canvas,
            scale,
            last_point: None,
            inked: false,
        }
    }

    /// Reinitializes size and background before capture begins for a new
    /// field.
    pub fn reset(&mut self, width: u32, height: u32, device_pixel_ratio: f32) {
        *self = Self::new(width, height, device_pixel_ratio);
    }

    /// Discards all strokes without leaving drawing mode.
    pub fn clear(&mut self) {
        for px in self.canvas.pixels_mut() {
            *px = PAPER;
        }
        self.last_point = None;
        self.inked = false;
    }

    /// Feeds one pointer event through the stroke state machine.
    pub fn handle(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { x, y } => {
                let p = self.clamp(x, y);
                // A tap with no movement still leaves a mark.
                draw_line_segment_mut(&mut self.canvas, p, p, INK);
                self.last_point = Some(p);
                self.inked = true;
            }
            PointerEvent::Move { x, y } => {
                if let Some(last) = self.last_point {
                    let p = self.clamp(x, y);
                    draw_line_segment_mut(&mut self.canvas, last, p, INK);
                    self.last_point = Some(p);
                }
            }
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::Cancel => {
                self.last_point = None;
            }
        }
    }

    /// True while a stroke is in progress (pointer held down).
    pub fn is_capturing(&self) -> bool {
        self.last_point.is_some()
    }

    /// True until the first stroke lands (or after [`clear`](Self::clear)).
    pub fn is_blank(&self) -> bool {
        !self.inked
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    /// Snapshot of current canvas contents. A pull operation: called by
    /// the field-apply action, not on every stroke.
    pub fn export(&self) -> Option<StampImage> {
        StampImage::from_canvas(&self.canvas)
    }

    fn clamp(&self, x: f32, y: f32) -> (f32, f32) {
        let max_x = (self.canvas.width() - 1) as f32;
        let max_y = (self.canvas.height() - 1) as f32;
        (
            (x * self.scale).clamp(0.0, max_x),
            (y * self.scale).clamp(0.0, max_y),
        )
    }
}

impl ValueSource for DrawSurface {
    /// Draw-mode apply: export whatever is on the canvas at this moment.
    fn value_for(&mut self, _tab: &SignatureTab, _signer: &SignerIdentity) -> Option<String> {
        self.export().map(|image| image.data_uri())
    }
}
