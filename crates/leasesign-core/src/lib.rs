//! Lease signature placeholder engine
//!
//! Scans lease markup for signature/initial placeholder tokens, tracks
//! per-field completion through an explicit focus state machine, and
//! composits field values back into viewable document markup.
//!
//! Rendering is deliberately kept out of this crate: stamp rasterization
//! and freehand capture live behind the [`ValueSource`] trait so the
//! state machine never touches pixels (see `leasesign-stamp`).

pub mod compositor;
pub mod error;
pub mod payload;
pub mod session;
pub mod tabs;
pub mod tokens;

pub use error::SubmitError;
pub use payload::{InitialEntry, SubmitPayload};
pub use session::{ApplyOutcome, Focus, InputMode, SignSession, SigningSession, ValueSource};
pub use tabs::{SignatureTab, SignerIdentity, SignerRole, TabKind};
