//! Submission payload for the session-by-token POST.

use serde::{Deserialize, Serialize};

use crate::error::SubmitError;
use crate::session::SigningSession;
use crate::tabs::TabKind;

/// One completed initial field in the submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialEntry {
    pub id: String,
    pub value: String,
}

/// The one-shot submission body. Sent once after every field is completed
/// and consent is given; the serialized field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub signature_data_url: Option<String>,
    pub signer_name: String,
    pub signer_email: String,
    pub consent: bool,
    pub initials_data: Vec<InitialEntry>,
}

impl SubmitPayload {
    /// Builds the payload from a fully completed session, re-running the
    /// same eligibility checks as the submit action.
    pub fn from_session(session: &SigningSession) -> Result<Self, SubmitError> {
        session.ready_to_submit()?;

        let initials_data = session
            .tabs()
            .iter()
            .filter(|t| t.kind == TabKind::Initial)
            .filter_map(|t| {
                t.value.as_ref().map(|v| InitialEntry {
                    id: t.id.clone(),
                    value: v.clone(),
                })
            })
            .collect();

        Ok(Self {
            signature_data_url: session.signature_value().map(str::to_owned),
            signer_name: session.signer().name.clone(),
            signer_email: session.signer().email.clone(),
            consent: session.consent(),
            initials_data,
        })
    }
}
