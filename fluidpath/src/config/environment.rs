//! Environment variable overrides.
//!
//! `FLUIDPATH_*` variables take precedence over configuration files.

use std::env;

use crate::config::schema::WalkConfig;
use crate::error::{Error, Result};

/// Reads `FLUIDPATH_*` variables into a [`WalkConfig`].
///
/// | Variable | Field |
/// |---|---|
/// | `FLUIDPATH_FOLLOW_SYMLINKS` | `follow_symlinks` |
/// | `FLUIDPATH_SHOW_HIDDEN` | `show_hidden` |
/// | `FLUIDPATH_MAX_DEPTH` | `max_depth` |
/// | `FLUIDPATH_EXCLUDE` | `exclude_globs` (comma separated, appended) |
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a variable holds an invalid value.
    pub fn apply_overrides(config: &mut WalkConfig) -> Result<()> {
        if let Ok(val) = env::var("FLUIDPATH_FOLLOW_SYMLINKS") {
            config.follow_symlinks = Some(Self::parse_flag("FLUIDPATH_FOLLOW_SYMLINKS", &val)?);
        }

        if let Ok(val) = env::var("FLUIDPATH_SHOW_HIDDEN") {
            config.show_hidden = Some(Self::parse_flag("FLUIDPATH_SHOW_HIDDEN", &val)?);
        }

        if let Ok(depth) = env::var("FLUIDPATH_MAX_DEPTH") {
            config.max_depth = Some(depth.trim().parse().map_err(|_| Error::Validation {
                field: "FLUIDPATH_MAX_DEPTH".into(),
                message: "Must be a non-negative integer".into(),
            })?);
        }

        if let Ok(excluded) = env::var("FLUIDPATH_EXCLUDE") {
            let globs = Self::parse_list(&excluded);
            config
                .exclude_globs
                .get_or_insert_with(Vec::new)
                .extend(globs);
        }

        Ok(())
    }

    /// Read a flag, accepting `1`/`0`, `yes`/`no` and `on`/`off` as well as
    /// `true`/`false`, in any case.
    fn parse_flag(field: &str, s: &str) -> Result<bool> {
        const TRUTHY: [&str; 4] = ["true", "1", "yes", "on"];
        const FALSY: [&str; 4] = ["false", "0", "no", "off"];

        let value = s.trim();
        if TRUTHY.iter().any(|t| t.eq_ignore_ascii_case(value)) {
            Ok(true)
        } else if FALSY.iter().any(|f| f.eq_ignore_ascii_case(value)) {
            Ok(false)
        } else {
            Err(Error::Validation {
                field: field.into(),
                message: format!("`{s}` is not a flag value"),
            })
        }
    }

    /// Split a comma-separated list, dropping empty items.
    fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 4] = [
        "FLUIDPATH_FOLLOW_SYMLINKS",
        "FLUIDPATH_SHOW_HIDDEN",
        "FLUIDPATH_MAX_DEPTH",
        "FLUIDPATH_EXCLUDE",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_truthy_spellings() {
        for s in ["true", "TRUE", "1", "yes", "On"] {
            assert!(EnvironmentConfig::parse_flag("test", s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_falsy_spellings() {
        for s in ["false", "False", "0", "no", "OFF"] {
            assert!(!EnvironmentConfig::parse_flag("test", s).unwrap(), "{s}");
        }
    }

    #[test]
    fn test_unrecognized_flag_names_variable() {
        let err = EnvironmentConfig::parse_flag("FIELD", "maybe").unwrap_err();
        assert!(format!("{err}").contains("FIELD"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            EnvironmentConfig::parse_list(" target , *.tmp,,"),
            vec!["target", "*.tmp"]
        );
        assert!(EnvironmentConfig::parse_list("").is_empty());
    }

    #[test]
    #[serial]
    fn test_apply_overrides() {
        clear_env();
        env::set_var("FLUIDPATH_SHOW_HIDDEN", "no");
        env::set_var("FLUIDPATH_MAX_DEPTH", "3");
        env::set_var("FLUIDPATH_EXCLUDE", "node_modules,.git");

        let mut config = WalkConfig {
            exclude_globs: Some(vec!["target".into()]),
            ..Default::default()
        };
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        clear_env();

        assert_eq!(config.show_hidden, Some(false));
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.follow_symlinks, None);
        assert_eq!(
            config.exclude_globs,
            Some(vec![
                "target".to_string(),
                "node_modules".to_string(),
                ".git".to_string()
            ])
        );
    }

    #[test]
    #[serial]
    fn test_apply_overrides_invalid_depth() {
        clear_env();
        env::set_var("FLUIDPATH_MAX_DEPTH", "-1");
        let result = EnvironmentConfig::apply_overrides(&mut WalkConfig::default());
        clear_env();
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    #[serial]
    fn test_unset_variables_change_nothing() {
        clear_env();
        let mut config = WalkConfig::default();
        EnvironmentConfig::apply_overrides(&mut config).unwrap();
        assert_eq!(config, WalkConfig::default());
    }
}

#[cfg(test)]
mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_flag_accepts_display_form(value in any::<bool>()) {
            let parsed = EnvironmentConfig::parse_flag("test", &value.to_string()).unwrap();
            prop_assert_eq!(parsed, value);
        }

        #[test]
        fn prop_invalid_bool_rejected(s in "[a-z]{6,12}") {
            prop_assume!(!["true", "false", "yes", "no", "on", "off"].contains(&s.as_str()));
            prop_assert!(EnvironmentConfig::parse_flag("test", &s).is_err());
        }

        #[test]
        fn prop_list_items_trimmed(items in prop::collection::vec("[a-z*.]{1,8}", 0..6)) {
            let joined = items.join(" , ");
            prop_assert_eq!(EnvironmentConfig::parse_list(&joined), items);
        }
    }
}
