//! Signable field model derived from placeholder tokens.

use serde::{Deserialize, Serialize};

/// Which side of the lease is signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerRole {
    Tenant,
    Landlord,
}

impl SignerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerRole::Tenant => "tenant",
            SignerRole::Landlord => "landlord",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tenant" => Some(SignerRole::Tenant),
            "landlord" => Some(SignerRole::Landlord),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two placeholder field kinds. Signature images render taller than
/// initial images in the composited document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabKind {
    Initial,
    Signature,
}

/// One signable field instance, derived from a placeholder token found in
/// the lease markup. Tabs are created once at session open and never
/// deleted; only `value` and `completed` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureTab {
    /// Stable id derived from the token, e.g. "init3" or "sig_tenant".
    pub id: String,
    pub kind: TabKind,
    /// Display label shown on field chips, e.g. "Initial 3".
    pub label: String,
    /// The literal placeholder token this tab replaces, e.g. "/init3/".
    pub token: String,
    /// Rendered image as a data URI. Non-null iff `completed`.
    pub value: Option<String>,
    pub completed: bool,
}

impl SignatureTab {
    pub(crate) fn new(id: String, kind: TabKind, label: String, token: String) -> Self {
        Self {
            id,
            kind,
            label,
            token,
            value: None,
            completed: false,
        }
    }

    /// Marks the tab completed with a rendered value. Re-applying an
    /// already-completed tab overwrites the previous value.
    pub fn complete(&mut self, value: String) {
        self.value = Some(value);
        self.completed = true;
    }
}

/// The signer's name and email, editable while signing. Used both for
/// generated-stamp rendering and the final submission payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerIdentity {
    pub name: String,
    pub email: String,
}
