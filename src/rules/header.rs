//! Custom header rules
//!
//! Twenty Seventeen sizes its header media from script and flags header videos with a body
//! class. Both are replaced by static output registered before the page is rendered.

use super::{stylesheet_handle, PreParseContext, RuleOutcome, STYLE_PRIORITY};
use crate::hooks::{strip_style_wrapper, DEFAULT_PRIORITY};
use crate::params::RuleParameters;
use tracing::debug;

pub const HEADER_VIDEO_CLASS: &str = "has-header-video";

// Styles in the theme target img and video, which the runtime turns into amp-img and
// amp-video. object-fit only works on the inner img/video, so these rules reach inside.
const MASTHEAD_CSS: &str = include_str!("../../css/masthead.css");

/// Adds `class_name` (default `has-header-video`) to the body classes when the site has a
/// header video. The environment is asked when body classes are computed, not now.
pub fn add_has_header_video_body_class(
    params: &RuleParameters,
    ctx: &mut PreParseContext<'_>,
) -> RuleOutcome {
    let params = RuleParameters::new()
        .with("class_name", HEADER_VIDEO_CLASS)
        .overlaid_with(params);
    let class_name = params
        .get("class_name")
        .unwrap_or(HEADER_VIDEO_CLASS)
        .to_string();

    ctx.hooks
        .add_body_class_filter(DEFAULT_PRIORITY, move |mut classes, env| {
            if env.has_header_video() {
                classes.push(class_name.clone());
            }
            classes
        });
    RuleOutcome::Applied
}

pub fn add_masthead_styles(ctx: &mut PreParseContext<'_>) -> RuleOutcome {
    let handle = stylesheet_handle(ctx.theme);
    debug!(%handle, "registering masthead styles");
    ctx.hooks.add_enqueue_action(STYLE_PRIORITY, move |_, sink| {
        sink.inject_styles(&handle, &strip_style_wrapper(MASTHEAD_CSS));
    });
    RuleOutcome::Applied
}
