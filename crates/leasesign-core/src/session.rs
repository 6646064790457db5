//! Field navigation and completion state machine.
//!
//! Focus is an explicit tagged union rather than a nullable index, and
//! every transition goes through a method on [`SigningSession`]. The
//! rendering side is injected per apply through [`ValueSource`], so the
//! machine itself stays pure and synchronous.

use serde::{Deserialize, Serialize};

use crate::compositor;
use crate::error::SubmitError;
use crate::tabs::{SignatureTab, SignerIdentity, SignerRole};
use crate::tokens;

/// Session data fetched once when the signing UI opens. Immutable for the
/// duration of signing. This is the wire shape of the session-by-token GET.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignSession {
    pub lease_id: String,
    pub role: SignerRole,
    pub recipient_name: String,
    pub recipient_email: String,
    pub lease_html: String,
}

/// Which field currently holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// No field focused: nothing selected yet, or all fields resolved.
    #[default]
    None,
    /// Field at this index (into the session's tab list) is focused.
    Field(usize),
}

/// How the currently focused, not-yet-applied field will be filled.
/// Switching mode never resets completed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Typed,
    Draw,
}

/// Supplies the rendered image for a field apply.
///
/// Implementations: a typed-stamp renderer keyed off the signer name, or a
/// freehand drawing surface exporting its current canvas. Returning `None`
/// means no value is available (e.g. an empty signer name in typed mode)
/// and the apply transition becomes a no-op.
pub trait ValueSource {
    fn value_for(&mut self, tab: &SignatureTab, signer: &SignerIdentity) -> Option<String>;
}

/// Result of an apply transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The focused field was completed. `next` is the auto-advanced focus
    /// index, or `None` when the applied field was the last one. Callers
    /// in draw mode reinitialize their surface when focus advances.
    Applied { next: Option<usize> },
    /// The source produced no value; nothing changed.
    NoValue,
    /// No field holds focus; nothing changed.
    NoFocus,
}

/// One signer's in-memory signing state, scoped to a single session.
#[derive(Debug, Clone)]
pub struct SigningSession {
    role: SignerRole,
    markup: String,
    tabs: Vec<SignatureTab>,
    focus: Focus,
    mode: InputMode,
    signer: SignerIdentity,
    consent: bool,
    submitting: bool,
}

impl SigningSession {
    /// Derives tabs from the fetched session and starts with no field
    /// focused. The tab set is exactly the set of placeholder tokens found
    /// in the markup for the signer's role.
    pub fn open(session: &SignSession) -> Self {
        let tabs = tokens::scan(&session.lease_html, session.role);
        Self {
            role: session.role,
            markup: session.lease_html.clone(),
            tabs,
            focus: Focus::None,
            mode: InputMode::Typed,
            signer: SignerIdentity {
                name: session.recipient_name.clone(),
                email: session.recipient_email.clone(),
            },
            consent: false,
            submitting: false,
        }
    }

    pub fn role(&self) -> SignerRole {
        self.role
    }

    pub fn tabs(&self) -> &[SignatureTab] {
        &self.tabs
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn signer(&self) -> &SignerIdentity {
        &self.signer
    }

    pub fn consent(&self) -> bool {
        self.consent
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_signer_name(&mut self, name: impl Into<String>) {
        self.signer.name = name.into();
    }

    pub fn set_signer_email(&mut self, email: impl Into<String>) {
        self.signer.email = email.into();
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
    }

    /// Switches the global input mode. Completed fields are untouched;
    /// only the next apply is affected. Returns true when the caller
    /// should reinitialize its drawing surface (entering draw mode with a
    /// field focused).
    pub fn set_mode(&mut self, mode: InputMode) -> bool {
        let entering_draw = mode == InputMode::Draw && self.mode != InputMode::Draw;
        self.mode = mode;
        entering_draw && matches!(self.focus, Focus::Field(_))
    }

    /// Focuses the field at `index`, from any current state. Returns false
    /// for an out-of-range index (state unchanged). Callers in draw mode
    /// reinitialize their surface after a successful focus change.
    pub fn focus_field(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.focus = Focus::Field(index);
            true
        } else {
            false
        }
    }

    /// Focuses a field by tab id. Clicks on composited stand-ins resolve
    /// through here, round-tripping the same transition as the chip UI.
    pub fn focus_by_id(&mut self, id: &str) -> bool {
        match self.tabs.iter().position(|t| t.id == id) {
            Some(index) => self.focus_field(index),
            None => false,
        }
    }

    pub fn can_prev(&self) -> bool {
        matches!(self.focus, Focus::Field(i) if i > 0)
    }

    pub fn can_next(&self) -> bool {
        matches!(self.focus, Focus::Field(i) if i + 1 < self.tabs.len())
    }

    /// Moves focus to the previous field. Disabled at the first field;
    /// never alters completion state.
    pub fn prev(&mut self) -> bool {
        if let Focus::Field(i) = self.focus {
            if i > 0 {
                self.focus = Focus::Field(i - 1);
                return true;
            }
        }
        false
    }

    /// Moves focus to the next field. Disabled at the last field.
    pub fn next(&mut self) -> bool {
        if let Focus::Field(i) = self.focus {
            if i + 1 < self.tabs.len() {
                self.focus = Focus::Field(i + 1);
                return true;
            }
        }
        false
    }

    /// Applies a value to the focused field. On success the field is
    /// marked completed and focus auto-advances to the following field,
    /// or clears after the last one. Re-applying a completed field
    /// overwrites its value.
    pub fn apply(&mut self, source: &mut dyn ValueSource) -> ApplyOutcome {
        let index = match self.focus {
            Focus::Field(i) => i,
            Focus::None => return ApplyOutcome::NoFocus,
        };

        let value = match source.value_for(&self.tabs[index], &self.signer) {
            Some(v) => v,
            None => return ApplyOutcome::NoValue,
        };

        self.tabs[index].complete(value);

        let next = if index + 1 < self.tabs.len() {
            Some(index + 1)
        } else {
            None
        };
        self.focus = match next {
            Some(i) => Focus::Field(i),
            None => Focus::None,
        };

        ApplyOutcome::Applied { next }
    }

    pub fn completed_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.completed).count()
    }

    pub fn all_completed(&self) -> bool {
        self.tabs.iter().all(|t| t.completed)
    }

    /// The resolved signature value among the completed tabs, if any.
    pub fn signature_value(&self) -> Option<&str> {
        self.tabs
            .iter()
            .find(|t| t.kind == crate::tabs::TabKind::Signature)
            .and_then(|t| t.value.as_deref())
    }

    /// Checks submission eligibility without changing state.
    pub fn ready_to_submit(&self) -> Result<(), SubmitError> {
        let missing = self.tabs.len() - self.completed_count();
        if missing > 0 {
            return Err(SubmitError::IncompleteFields { missing });
        }
        if !self.consent {
            return Err(SubmitError::ConsentRequired);
        }
        if self.role == SignerRole::Tenant && self.signature_value().is_none() {
            return Err(SubmitError::MissingSignature);
        }
        Ok(())
    }

    /// Validates and enters the submitting state, yielding the payload to
    /// send. While submitting, further submissions are rejected; the
    /// caller reports the outcome via [`submit_failed`] (local state kept
    /// intact for a retry) or discards the session on success.
    ///
    /// [`submit_failed`]: SigningSession::submit_failed
    pub fn begin_submit(&mut self) -> Result<crate::payload::SubmitPayload, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        self.ready_to_submit()?;
        let payload = crate::payload::SubmitPayload::from_session(self)?;
        self.submitting = true;
        Ok(payload)
    }

    /// Re-enables submission after a failed request. Field values, consent
    /// and focus are untouched so the signer can retry as-is.
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    /// Re-renders the lease preview with current field states.
    pub fn compose(&self) -> String {
        compositor::compose(&self.markup, &self.tabs, self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabs::TabKind;
    use pretty_assertions::assert_eq;

    const MARKUP: &str = "<p>Clause one /init1/</p><p>Clause two /init2/</p><p>/sig_tenant/</p>";

    fn tenant_session() -> SigningSession {
        SigningSession::open(&SignSession {
            lease_id: "lease-1".into(),
            role: SignerRole::Tenant,
            recipient_name: "Jane Q Public".into(),
            recipient_email: "jane@example.com".into(),
            lease_html: MARKUP.into(),
        })
    }

    /// Behaves like the typed stamp renderer: no value for an empty name.
    struct TypedLike;

    impl ValueSource for TypedLike {
        fn value_for(&mut self, tab: &SignatureTab, signer: &SignerIdentity) -> Option<String> {
            if signer.name.trim().is_empty() {
                None
            } else {
                Some(format!("data:image/png;base64,{}", tab.id))
            }
        }
    }

    #[test]
    fn open_derives_tabs_and_clears_focus() {
        let session = tenant_session();
        assert_eq!(session.tabs().len(), 3);
        assert_eq!(session.focus(), Focus::None);
        assert_eq!(session.signer().name, "Jane Q Public");
    }

    #[test]
    fn apply_with_empty_name_is_a_no_op() {
        let mut session = tenant_session();
        session.set_signer_name("");
        assert!(session.focus_field(0));

        let outcome = session.apply(&mut TypedLike);
        assert_eq!(outcome, ApplyOutcome::NoValue);
        assert!(!session.tabs()[0].completed);
        assert_eq!(session.focus(), Focus::Field(0));
    }

    #[test]
    fn apply_without_focus_is_a_no_op() {
        let mut session = tenant_session();
        assert_eq!(session.apply(&mut TypedLike), ApplyOutcome::NoFocus);
        assert_eq!(session.completed_count(), 0);
    }

    #[test]
    fn apply_auto_advances_and_clears_after_last() {
        let mut session = tenant_session();
        session.focus_field(0);

        assert_eq!(
            session.apply(&mut TypedLike),
            ApplyOutcome::Applied { next: Some(1) }
        );
        assert_eq!(session.focus(), Focus::Field(1));

        assert_eq!(
            session.apply(&mut TypedLike),
            ApplyOutcome::Applied { next: Some(2) }
        );

        let outcome = session.apply(&mut TypedLike);
        assert_eq!(outcome, ApplyOutcome::Applied { next: None });
        assert_eq!(session.focus(), Focus::None);
        assert!(session.all_completed());
        assert!(session.tabs().iter().all(|t| t.value.is_some()));
    }

    #[test]
    fn navigation_respects_document_boundaries() {
        let mut session = tenant_session();
        session.focus_field(0);
        assert!(!session.can_prev());
        assert!(!session.prev());
        assert!(session.can_next());
        assert!(session.next());
        assert_eq!(session.focus(), Focus::Field(1));

        session.focus_field(2);
        assert!(!session.can_next());
        assert!(!session.next());
        assert!(session.can_prev());
    }

    #[test]
    fn refocusing_a_completed_field_overwrites_it() {
        let mut session = tenant_session();
        session.focus_field(0);
        session.apply(&mut TypedLike);
        let first = session.tabs()[0].value.clone();

        session.set_signer_name("John Smith");
        session.focus_field(0);
        session.apply(&mut TypedLike);

        // Regeneration is allowed; tab count and order are unchanged.
        assert_eq!(session.tabs().len(), 3);
        assert_eq!(session.tabs()[0].id, "init1");
        assert!(session.tabs()[0].completed);
        assert_eq!(first, session.tabs()[0].value);

        struct Other;
        impl ValueSource for Other {
            fn value_for(&mut self, _: &SignatureTab, _: &SignerIdentity) -> Option<String> {
                Some("data:image/png;base64,other".into())
            }
        }
        session.focus_field(0);
        session.apply(&mut Other);
        assert_eq!(
            session.tabs()[0].value.as_deref(),
            Some("data:image/png;base64,other")
        );
    }

    #[test]
    fn mode_switch_keeps_completed_fields() {
        let mut session = tenant_session();
        session.focus_field(0);
        session.apply(&mut TypedLike);

        let reinit = session.set_mode(InputMode::Draw);
        assert!(reinit, "entering draw mode with a focused field reinitializes");
        assert_eq!(session.completed_count(), 1);

        // No focused field: no surface to reinitialize.
        let mut idle = tenant_session();
        assert!(!idle.set_mode(InputMode::Draw));
    }

    #[test]
    fn focus_by_id_round_trips_stand_in_clicks() {
        let mut session = tenant_session();
        assert!(session.focus_by_id("init2"));
        assert_eq!(session.focus(), Focus::Field(1));
        assert!(!session.focus_by_id("init9"));
        assert_eq!(session.focus(), Focus::Field(1));
    }

    #[test]
    fn submission_gating_follows_error_taxonomy() {
        let mut session = tenant_session();
        assert_eq!(
            session.ready_to_submit(),
            Err(SubmitError::IncompleteFields { missing: 3 })
        );

        session.focus_field(0);
        while let ApplyOutcome::Applied { .. } = session.apply(&mut TypedLike) {}
        assert_eq!(session.ready_to_submit(), Err(SubmitError::ConsentRequired));

        session.set_consent(true);
        assert_eq!(session.ready_to_submit(), Ok(()));
    }

    #[test]
    fn submitting_flag_blocks_concurrent_submissions() {
        let mut session = tenant_session();
        session.focus_field(0);
        while let ApplyOutcome::Applied { .. } = session.apply(&mut TypedLike) {}
        session.set_consent(true);

        let payload = session.begin_submit().expect("eligible");
        assert_eq!(payload.initials_data.len(), 2);
        assert!(session.is_submitting());
        assert_eq!(session.begin_submit(), Err(SubmitError::AlreadySubmitting));

        // A failed request leaves everything intact for a retry.
        session.submit_failed();
        assert!(!session.is_submitting());
        assert!(session.all_completed());
        assert!(session.begin_submit().is_ok());
    }

    #[test]
    fn landlord_session_has_single_signature_tab() {
        let session = SigningSession::open(&SignSession {
            lease_id: "lease-2".into(),
            role: SignerRole::Landlord,
            recipient_name: "Lisa Landlord".into(),
            recipient_email: "lisa@example.com".into(),
            lease_html: "/init1/ /sig_landlord/ /sig_tenant/".into(),
        });
        assert_eq!(session.tabs().len(), 1);
        assert_eq!(session.tabs()[0].kind, TabKind::Signature);
    }
}
