//! Textual coercion for environment and override input.

use std::path::{Path, PathBuf};

use super::{Layer, ResolveError};

/// Normalise a dotted or undotted version to an integer.
///
/// `"3.9"` and `"39"` both give 39; `"3.10"` gives 310.
pub fn coerce_version(setting: &'static str, layer: Layer, raw: &str) -> Result<u32, ResolveError> {
    let digits: String = raw.trim().chars().filter(|c| *c != '.').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolveError::InvalidVersion {
            setting,
            layer,
            value: raw.to_string(),
        });
    }
    digits.parse().map_err(|_| ResolveError::InvalidVersion {
        setting,
        layer,
        value: raw.to_string(),
    })
}

/// Parse a textual boolean.
pub fn coerce_flag(setting: &'static str, layer: Layer, raw: &str) -> Result<bool, ResolveError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ResolveError::InvalidFlag {
            setting,
            layer,
            value: raw.to_string(),
        }),
    }
}

/// Expand a leading `~` and make the path absolute.
pub fn expand_path(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };
    std::path::absolute(&expanded).unwrap_or(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(raw: &str) -> Result<u32, ResolveError> {
        coerce_version("python", Layer::Env, raw)
    }

    #[test]
    fn dotted_and_undotted_agree() {
        assert_eq!(version("3.9").unwrap(), 39);
        assert_eq!(version("39").unwrap(), 39);
        assert_eq!(version("1.8").unwrap(), version("18").unwrap());
    }

    #[test]
    fn two_digit_minor_versions() {
        assert_eq!(version("3.10").unwrap(), 310);
        assert_eq!(version("3.1.0").unwrap(), 310);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(version(" 2.7\n").unwrap(), 27);
    }

    #[test]
    fn invalid_versions_are_rejected() {
        for raw in ["", ".", "three", "3.x", "-3", "3 9"] {
            let err = version(raw).unwrap_err();
            assert!(
                matches!(err, ResolveError::InvalidVersion { setting: "python", layer: Layer::Env, .. }),
                "expected rejection for {raw:?}"
            );
        }
    }

    #[test]
    fn invalid_version_message_names_source() {
        let err = coerce_version("numpy", Layer::Override, "abc").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("numpy"));
        assert!(msg.contains("override"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn flags() {
        for raw in ["1", "true", "TRUE", "yes", "on"] {
            assert!(coerce_flag("verify_rpaths", Layer::Env, raw).unwrap(), "{raw}");
        }
        for raw in ["0", "false", "No", "off", ""] {
            assert!(!coerce_flag("verify_rpaths", Layer::Env, raw).unwrap(), "{raw}");
        }
        assert!(coerce_flag("verify_rpaths", Layer::Env, "maybe").is_err());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path(Path::new("~/bld")), home.join("bld"));
        }
    }

    #[test]
    fn relative_paths_become_absolute() {
        let path = expand_path(Path::new("some/rel"));
        assert!(path.is_absolute());
        assert!(path.ends_with("some/rel"));
    }

    #[test]
    fn absolute_paths_pass_through() {
        let abs = std::env::temp_dir().join("bld");
        assert_eq!(expand_path(&abs), abs);
    }
}
