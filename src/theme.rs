//! Theme config provider
//!
//! Each supported theme marks up its navigation slightly differently: different container
//! ids, toggle classes and button locations. [`theme_config`] returns those values as
//! [`RuleParameters`] so rules can be written once and parameterized per theme.

use crate::params::RuleParameters;

pub const TWENTYSEVENTEEN: &str = "twentyseventeen";
pub const TWENTYFIFTEEN: &str = "twentyfifteen";

/// Themes with built-in support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    TwentySeventeen,
    TwentyFifteen,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::TwentySeventeen, Theme::TwentyFifteen];

    pub fn from_slug(slug: &str) -> Option<Theme> {
        match slug {
            TWENTYSEVENTEEN => Some(Theme::TwentySeventeen),
            TWENTYFIFTEEN => Some(Theme::TwentyFifteen),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Theme::TwentySeventeen => TWENTYSEVENTEEN,
            Theme::TwentyFifteen => TWENTYFIFTEEN,
        }
    }
}

/// Base parameters shared by every theme, overlaid with the theme's own.
///
/// Unknown identifiers get the Twenty Seventeen values.
pub fn theme_config(theme: &str) -> RuleParameters {
    let base = RuleParameters::new().with("dropdown_class", "dropdown-toggle");

    let specific = match Theme::from_slug(theme) {
        Some(Theme::TwentyFifteen) => RuleParameters::new()
            .with("nav_container_id", "secondary")
            .with("nav_container_toggle_class", "toggled-on")
            .with("menu_button_class", "secondary-toggle")
            .with(
                "menu_button_query",
                r#"//header[ @id = "masthead" ]//button[ contains( @class, "secondary-toggle" ) ]"#,
            )
            .with("menu_button_toggle_class", "toggled-on")
            .with("sub_menu_toggle_class", "toggle-on")
            .with("expand_text", "expand child menu")
            .with("collapse_text", "collapse child menu"),
        Some(Theme::TwentySeventeen) | None => RuleParameters::new()
            .with("nav_container_id", "site-navigation")
            .with("nav_container_toggle_class", "toggled-on")
            .with("menu_button_class", "menu-toggle")
            .with(
                "menu_button_query",
                r#"//nav[@id = "site-navigation"]//button[ contains( @class, "menu-toggle" ) ]"#,
            )
            .with("menu_button_toggle_class", "toggled-on")
            .with("sub_menu_toggle_class", "toggled-on")
            .with("expand_text", "expand child menu")
            .with("collapse_text", "collapse child menu"),
    };

    base.overlaid_with(&specific)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeQuery;

    #[test]
    fn test_slug_round_trip() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_slug(theme.slug()), Some(theme));
        }
        assert_eq!(Theme::from_slug("twentytwenty"), None);
    }

    #[test]
    fn test_twentyfifteen_config() {
        let config = theme_config(TWENTYFIFTEEN);
        assert_eq!(config.get("dropdown_class"), Some("dropdown-toggle"));
        assert_eq!(config.get("nav_container_id"), Some("secondary"));
        assert_eq!(config.get("sub_menu_toggle_class"), Some("toggle-on"));
    }

    #[test]
    fn test_unknown_theme_falls_back_to_twentyseventeen() {
        assert_eq!(theme_config("my-custom-theme"), theme_config(TWENTYSEVENTEEN));
        assert_eq!(
            theme_config("my-custom-theme").get("nav_container_id"),
            Some("site-navigation")
        );
    }

    #[test]
    fn test_builtin_queries_parse() {
        for theme in Theme::ALL {
            let config = theme_config(theme.slug());
            let query = config.get("menu_button_query").unwrap();
            assert!(NodeQuery::parse(query).is_ok(), "{query}");
        }
    }
}
