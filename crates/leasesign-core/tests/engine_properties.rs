//! Property-based tests for the signing engine
//!
//! Exercises the scanner, state machine and compositor with generated
//! markup and action sequences.

use proptest::prelude::*;

use leasesign_core::{
    compositor, tokens, ApplyOutcome, Focus, SignSession, SignatureTab, SignerIdentity,
    SignerRole, SigningSession, TabKind, ValueSource,
};

struct Stub;

impl ValueSource for Stub {
    fn value_for(&mut self, tab: &SignatureTab, _: &SignerIdentity) -> Option<String> {
        Some(format!("data:image/png;base64,{}", tab.id))
    }
}

fn session_for(markup: &str, role: SignerRole) -> SigningSession {
    SigningSession::open(&SignSession {
        lease_id: "lease".into(),
        role,
        recipient_name: "Pat Signer".into(),
        recipient_email: "pat@example.com".into(),
        lease_html: markup.into(),
    })
}

// ============================================================
// Strategies
// ============================================================

/// Markup assembled from filler text and a random subset of the token
/// vocabulary, in random order.
fn markup_with_tokens() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[ a-zA-Z<>/p.]{0,20}",
        Just("/init1/".to_string()),
        Just("/init2/".to_string()),
        Just("/init3/".to_string()),
        Just("/init4/".to_string()),
        Just("/init5/".to_string()),
        Just("/init6/".to_string()),
        Just("/sig_tenant/".to_string()),
        Just("/sig_landlord/".to_string()),
    ];
    proptest::collection::vec(piece, 0..12).prop_map(|parts| parts.concat())
}

fn any_role() -> impl Strategy<Value = SignerRole> {
    prop_oneof![Just(SignerRole::Tenant), Just(SignerRole::Landlord)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // ============================================================
    // Scanner invariants
    // ============================================================

    /// The tab set is exactly the set of tokens present for the role, and
    /// every id is unique.
    #[test]
    fn scanner_matches_token_presence(markup in markup_with_tokens(), role in any_role()) {
        let tabs = tokens::scan(&markup, role);

        for tab in &tabs {
            prop_assert!(markup.contains(&tab.token));
            prop_assert!(!tab.completed);
            prop_assert!(tab.value.is_none());
        }

        let mut ids: Vec<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(before, ids.len());

        match role {
            SignerRole::Tenant => {
                prop_assert!(tabs.iter().all(|t| t.id != "sig_landlord"));
                prop_assert_eq!(
                    markup.contains("/sig_tenant/"),
                    tabs.iter().any(|t| t.id == "sig_tenant")
                );
            }
            SignerRole::Landlord => {
                prop_assert!(tabs.iter().all(|t| t.kind == TabKind::Signature));
                prop_assert!(tabs.len() <= 1);
            }
        }
    }

    /// Scanning is a pure function: same inputs, same output.
    #[test]
    fn scanner_is_deterministic(markup in markup_with_tokens(), role in any_role()) {
        let a = tokens::scan(&markup, role);
        let b = tokens::scan(&markup, role);
        prop_assert_eq!(
            a.iter().map(|t| t.id.clone()).collect::<Vec<_>>(),
            b.iter().map(|t| t.id.clone()).collect::<Vec<_>>()
        );
    }

    /// Initials come out in ascending numeric order, with the signature
    /// tab last when present.
    #[test]
    fn scanner_orders_initials_ascending(markup in markup_with_tokens()) {
        let tabs = tokens::scan(&markup, SignerRole::Tenant);
        let numbers: Vec<usize> = tabs
            .iter()
            .filter(|t| t.kind == TabKind::Initial)
            .map(|t| t.id["init".len()..].parse().unwrap())
            .collect();
        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        prop_assert_eq!(numbers, sorted);

        if let Some(pos) = tabs.iter().position(|t| t.kind == TabKind::Signature) {
            prop_assert_eq!(pos, tabs.len() - 1);
        }
    }

    // ============================================================
    // State machine invariants
    // ============================================================

    /// A tab's value is non-null iff completed, across any sequence of
    /// focus/apply actions.
    #[test]
    fn value_iff_completed(
        markup in markup_with_tokens(),
        role in any_role(),
        actions in proptest::collection::vec((0usize..8, any::<bool>()), 0..20),
    ) {
        let mut session = session_for(&markup, role);
        for (index, do_apply) in actions {
            session.focus_field(index);
            if do_apply {
                session.apply(&mut Stub);
            }
            for tab in session.tabs() {
                prop_assert_eq!(tab.completed, tab.value.is_some());
            }
        }
    }

    /// Applying every field in order always terminates with no field
    /// focused and everything completed.
    #[test]
    fn sequential_apply_completes_the_session(markup in markup_with_tokens(), role in any_role()) {
        let mut session = session_for(&markup, role);
        if session.tabs().is_empty() {
            prop_assert!(session.all_completed());
            return Ok(());
        }

        session.focus_field(0);
        let mut applied = 0;
        while let ApplyOutcome::Applied { .. } = session.apply(&mut Stub) {
            applied += 1;
            prop_assert!(applied <= session.tabs().len());
        }

        prop_assert_eq!(applied, session.tabs().len());
        prop_assert_eq!(session.focus(), Focus::None);
        prop_assert!(session.all_completed());
    }

    // ============================================================
    // Compositor invariants
    // ============================================================

    /// No placeholder token ever survives composition, whatever the
    /// completion state.
    #[test]
    fn compositor_resolves_every_token(
        markup in markup_with_tokens(),
        role in any_role(),
        complete_mask in any::<u8>(),
    ) {
        let mut tabs = tokens::scan(&markup, role);
        for (i, tab) in tabs.iter_mut().enumerate() {
            if complete_mask & (1 << (i % 8)) != 0 {
                tab.complete(format!("data:image/png;base64,{}", tab.id));
            }
        }

        let html = compositor::compose(&markup, &tabs, Focus::None);
        for tab in &tabs {
            prop_assert!(!html.contains(&tab.token), "token {} survived", tab.token);
        }

        // Stand-ins appear exactly for the incomplete tabs.
        let stand_ins = compositor::stand_in_ids(&html);
        let incomplete: Vec<String> = tabs
            .iter()
            .filter(|t| !t.completed)
            .map(|t| t.id.clone())
            .collect();
        for id in &incomplete {
            prop_assert!(stand_ins.contains(id));
        }
    }
}
