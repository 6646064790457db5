//! Re-renders lease markup with current field states.
//!
//! Pure and total: every detected token is always replaced, either by an
//! inline image (completed fields) or a clickable stand-in (incomplete
//! fields). Recomputed wholesale on every focus or completion change; no
//! incremental diffing at this data volume.

use crate::session::Focus;
use crate::tabs::{SignatureTab, TabKind};

/// Attribute carrying the tab id on rendered stand-ins. Clicks inside the
/// document resolve back through this attribute to the focus transition.
pub const TAB_ID_ATTR: &str = "data-tab-id";

/// Rendered image heights in CSS pixels; signatures are taller.
const SIGNATURE_IMG_HEIGHT: u32 = 64;
const INITIAL_IMG_HEIGHT: u32 = 36;

/// Merges current tab states into viewable markup.
pub fn compose(markup: &str, tabs: &[SignatureTab], focus: Focus) -> String {
    let mut out = markup.to_owned();
    for (index, tab) in tabs.iter().enumerate() {
        let replacement = match &tab.value {
            Some(value) if tab.completed => image_markup(tab, value),
            _ => stand_in_markup(tab, focus == Focus::Field(index)),
        };
        out = out.replace(&tab.token, &replacement);
    }
    out
}

fn image_markup(tab: &SignatureTab, value: &str) -> String {
    let height = match tab.kind {
        TabKind::Signature => SIGNATURE_IMG_HEIGHT,
        TabKind::Initial => INITIAL_IMG_HEIGHT,
    };
    format!(
        r#"<img src="{}" alt="{}" style="display:block;margin:0 auto;height:{}px;">"#,
        value, tab.label, height
    )
}

fn stand_in_markup(tab: &SignatureTab, focused: bool) -> String {
    let label = match tab.kind {
        TabKind::Signature => "Sign Here",
        TabKind::Initial => "Initial",
    };
    let class = if focused {
        "sign-tab sign-tab--focused"
    } else {
        "sign-tab"
    };
    format!(
        r#"<button type="button" class="{}" {}="{}">{}</button>"#,
        class, TAB_ID_ATTR, tab.id, label
    )
}

/// Tab ids of the stand-ins present in composited markup, in document
/// order. The inverse of [`compose`] for incomplete fields; used to route
/// clicks back to `SigningSession::focus_by_id`.
pub fn stand_in_ids(html: &str) -> Vec<String> {
    let marker = format!("{}=\"", TAB_ID_ATTR);
    let mut ids = Vec::new();
    let mut rest = html;
    while let Some(start) = rest.find(&marker) {
        rest = &rest[start + marker.len()..];
        if let Some(end) = rest.find('"') {
            ids.push(rest[..end].to_owned());
            rest = &rest[end..];
        } else {
            break;
        }
    }
    ids
}
