//! Placeholder token vocabulary and scanner.
//!
//! Tokens are literal delimited substrings produced by the lease
//! templating side: `/init1/` through `/init6/` for initials and
//! `/sig_tenant/` / `/sig_landlord/` for signatures. This fixed
//! vocabulary is the entire coupling surface between the document source
//! and the signing engine, so matching is exact substring search only --
//! no regex, no partial matches.

use crate::tabs::{SignatureTab, SignerRole, TabKind};

/// Default upper bound on scanned initial tokens. Templates needing more
/// fields must raise the bound via [`scan_with_limit`] rather than having
/// later fields silently dropped.
pub const INITIAL_TOKEN_LIMIT: usize = 6;

pub const TENANT_SIGNATURE_TOKEN: &str = "/sig_tenant/";
pub const LANDLORD_SIGNATURE_TOKEN: &str = "/sig_landlord/";

/// The literal token for the nth initial field (1-based).
pub fn initial_token(n: usize) -> String {
    format!("/init{}/", n)
}

/// Extracts the ordered list of signable fields for the signer's role.
///
/// Pure function of `(markup, role)`. Tokens not present in the markup are
/// simply omitted; that is not an error. Order is ascending numeric suffix
/// for initials, then the role's single signature token.
pub fn scan(markup: &str, role: SignerRole) -> Vec<SignatureTab> {
    scan_with_limit(markup, role, INITIAL_TOKEN_LIMIT)
}

/// [`scan`] with an explicit bound on the number of initial tokens tested.
pub fn scan_with_limit(markup: &str, role: SignerRole, max_initials: usize) -> Vec<SignatureTab> {
    let mut tabs = Vec::new();

    match role {
        SignerRole::Tenant => {
            for n in 1..=max_initials {
                let token = initial_token(n);
                if markup.contains(&token) {
                    tabs.push(SignatureTab::new(
                        format!("init{}", n),
                        TabKind::Initial,
                        format!("Initial {}", n),
                        token,
                    ));
                }
            }
            if markup.contains(TENANT_SIGNATURE_TOKEN) {
                tabs.push(SignatureTab::new(
                    "sig_tenant".into(),
                    TabKind::Signature,
                    "Tenant Signature".into(),
                    TENANT_SIGNATURE_TOKEN.into(),
                ));
            }
        }
        SignerRole::Landlord => {
            // Landlords sign once; initial tokens are tenant-only.
            if markup.contains(LANDLORD_SIGNATURE_TOKEN) {
                tabs.push(SignatureTab::new(
                    "sig_landlord".into(),
                    TabKind::Signature,
                    "Landlord Signature".into(),
                    LANDLORD_SIGNATURE_TOKEN.into(),
                ));
            }
        }
    }

    tabs
}
