//! Stamp rendering and freehand capture for lease signing
//!
//! The side-effecting half of the signing engine's `ValueSource` seam:
//! typed stamps rasterized from the signer name in one of three font
//! presets, and a pointer-driven drawing surface for freehand signatures.
//! Both export PNG data URIs that the compositor embeds directly.

pub mod encode;
pub mod fonts;
pub mod stamp;
pub mod surface;

pub use stamp::{generate_initials, render_initials, render_signature, StampImage, TypedStamp};
pub use surface::{DrawSurface, PointerEvent};
