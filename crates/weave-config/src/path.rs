use std::{env, path::PathBuf};

use crate::error::{ConfigError, Result};

/// Returns the user's home directory
///
/// This checks the `HOME` environment variable first. If it is not set, it falls back to
/// `/home/{username}` with the username taken from `USER` or `LOGNAME`.
pub fn home_dir() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| {
        let username = env::var("USER")
            .or_else(|_| env::var("LOGNAME"))
            .unwrap_or_default();
        PathBuf::from(format!("/home/{username}"))
    })
}

/// Returns the user's config directory following XDG Base Directory Specification
///
/// This checks the `XDG_CONFIG_HOME` environment variable. If not set, it defaults to
/// `$HOME/.config`
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Expands a leading `~` and makes relative paths absolute against the current directory.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ConfigError::EmptyPath);
    }

    let expanded = if path == "~" {
        home_dir()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else {
        PathBuf::from(path)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(env::current_dir()?.join(expanded))
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    #[serial]
    fn test_home_dir_from_env() {
        with_env(&[("HOME", Some("/tmp/weave-home"))], || {
            assert_eq!(home_dir(), PathBuf::from("/tmp/weave-home"));
        });
    }

    #[test]
    #[serial]
    fn test_home_dir_fallback() {
        with_env(&[("HOME", None), ("USER", Some("weaver"))], || {
            assert_eq!(home_dir(), PathBuf::from("/home/weaver"));
        });
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        with_env(&[("XDG_CONFIG_HOME", Some("/tmp/xdg"))], || {
            assert_eq!(xdg_config_home(), PathBuf::from("/tmp/xdg"));
        });

        with_env(
            &[("XDG_CONFIG_HOME", None), ("HOME", Some("/tmp/weave-home"))],
            || {
                assert_eq!(xdg_config_home(), PathBuf::from("/tmp/weave-home/.config"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_resolve_path() {
        with_env(&[("HOME", Some("/tmp/weave-home"))], || {
            assert_eq!(
                resolve_path("~/queries.toml").unwrap(),
                PathBuf::from("/tmp/weave-home/queries.toml")
            );
            assert_eq!(resolve_path("~").unwrap(), PathBuf::from("/tmp/weave-home"));
        });

        assert_eq!(resolve_path("/etc/weave.toml").unwrap(), PathBuf::from("/etc/weave.toml"));
        assert!(resolve_path("relative.toml").unwrap().is_absolute());
        assert!(matches!(resolve_path("  "), Err(ConfigError::EmptyPath)));
    }
}
