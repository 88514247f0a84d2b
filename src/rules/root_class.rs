//! Feature detection classes on the root element
//!
//! The themes' scripts swap `no-svg` for `svg` and add `background-fixed` once they have
//! probed the browser. Every browser the target runtime supports passes both probes, so the
//! classes are set unconditionally.

use crate::dom::{get_attribute, set_attribute, DomHandle};
use crate::rules::RuleOutcome;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

pub const NO_SVG_CLASS: &str = "no-svg";
pub const SVG_CLASS: &str = "svg";
pub const FIXED_BACKGROUND_CLASS: &str = "background-fixed";

static NO_SVG_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|\s)no-svg(\s|$)").expect("valid no-svg pattern"));

/// Replace the `no-svg` token with `svg` in a class attribute value.
///
/// Only whole tokens match, so `no-svg-fallback` or `my-no-svg` are left alone.
pub fn replace_no_svg(class: &str) -> String {
    let replacement = format!(" {SVG_CLASS} ");
    let replaced = NO_SVG_TOKEN.replace_all(class, replacement.as_str());
    replaced.trim().to_string()
}

pub fn force_svg_support(dom: &DomHandle) -> RuleOutcome {
    let Some(root) = dom.document_element() else {
        return RuleOutcome::skipped("document has no root element");
    };
    let class = get_attribute(&root, "class").unwrap_or_default();
    if !NO_SVG_TOKEN.is_match(&class) {
        return RuleOutcome::skipped(format!("root class has no `{NO_SVG_CLASS}` token"));
    }
    let updated = replace_no_svg(&class);
    debug!(from = %class, to = %updated, "forcing svg support");
    set_attribute(&root, "class", &updated);
    RuleOutcome::Applied
}

/// Appends the marker every time it runs; a second run leaves it in the attribute twice.
pub fn force_fixed_background_support(dom: &DomHandle) -> RuleOutcome {
    let Some(root) = dom.document_element() else {
        return RuleOutcome::skipped("document has no root element");
    };
    let class = get_attribute(&root, "class").unwrap_or_default();
    set_attribute(&root, "class", &format!("{class} {FIXED_BACKGROUND_CLASS}"));
    RuleOutcome::Applied
}
