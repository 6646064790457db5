//! Error taxonomy for the signing engine.

use thiserror::Error;

/// Client-side validation failures raised before any submission request
/// is made. All of these are advisory: the signer can fix the problem and
/// retry, nothing here is fatal to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Not every tab has been applied yet.
    #[error("{missing} field(s) still need to be signed")]
    IncompleteFields { missing: usize },

    /// The electronic-signing consent checkbox is unchecked.
    #[error("consent to sign electronically is required")]
    ConsentRequired,

    /// Tenant sessions must resolve a signature value among the completed
    /// tabs. Completion normally guarantees this; kept as a guard.
    #[error("a signature is required to complete signing")]
    MissingSignature,

    /// A submission is already in flight; concurrent submissions are not
    /// permitted.
    #[error("submission already in progress")]
    AlreadySubmitting,
}
