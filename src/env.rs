//! Process environment as a resolution layer.
//!
//! The resolver only ever asks one question of the environment: does this
//! `BLDCONF_*` variable carry a value? [`Env::real`] answers from the
//! process; [`Env::mock`] answers from a fixed map so tests never mutate
//! global state.

use std::collections::HashMap;

/// Where variable values come from.
#[derive(Clone, Debug)]
enum Source {
    Process,
    Fixed(HashMap<String, String>),
}

/// Environment variable reader.
#[derive(Clone, Debug)]
pub struct Env {
    source: Source,
}

impl Env {
    pub fn real() -> Self {
        Self {
            source: Source::Process,
        }
    }

    /// An environment holding exactly `vars`. Public so integration tests
    /// can drive resolution too.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            source: Source::Fixed(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Value of `name`, or `None` when it is unset, empty, or not valid
    /// unicode. `BLDCONF_PY=` therefore leaves the layer below in charge.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let value = match &self.source {
            Source::Process => std::env::var(name).ok(),
            Source::Fixed(map) => map.get(name).cloned(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_sees_cargo_variables() {
        assert!(Env::real().lookup("CARGO_MANIFEST_DIR").is_some());
    }

    #[test]
    fn mock_env_serves_its_map_only() {
        let env = Env::mock([("BLDCONF_PY", "3.10"), ("BLDCONF_NPY", "1.8")]);
        assert_eq!(env.lookup("BLDCONF_PY").as_deref(), Some("3.10"));
        assert_eq!(env.lookup("BLDCONF_NPY").as_deref(), Some("1.8"));
        assert_eq!(env.lookup("CARGO_MANIFEST_DIR"), None);
    }

    #[test]
    fn empty_value_reads_as_unset() {
        let env = Env::mock([("BLDCONF_PERL", "")]);
        assert_eq!(env.lookup("BLDCONF_PERL"), None);
    }
}
