//! Integration tests for configuration resolution and handler loading.
//!
//! These tests exercise the public API end to end: a store file on disk,
//! a mocked environment, explicit overrides and the handler registry.

use std::path::PathBuf;
use std::sync::Arc;

use bldconf::config::{BuildConfig, ConfigError, Overrides, Sources};
use bldconf::env::Env;
use bldconf::handler::{
    HandlerError, HandlerReference, HandlerRegistry, LinkError, LinkErrorHandler, LinkVerdict,
};
use bldconf::platform::Platform;
use bldconf::settings::Layer;
use bldconf::store::Store;

fn resolve(env: &Env, store: &Store, overrides: &Overrides, registry: &HandlerRegistry) -> Result<BuildConfig, ConfigError> {
    BuildConfig::resolve(Sources {
        env,
        store,
        overrides,
        platform: &Platform::from_parts("linux", "x86_64"),
        registry,
    })
}

fn write_store(content: &str) -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    let store = Store::locate(Some(&path)).unwrap();
    (dir, store)
}

// ---------------------------------------------------------------------------
// precedence
// ---------------------------------------------------------------------------

#[test]
fn numpy_falls_back_to_hard_coded_default() {
    let (_dir, store) = write_store("subdir = \"linux-64\"\n");
    let env = Env::mock(Vec::<(&str, &str)>::new());
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();
    assert_eq!(config.numpy.value, 18);
    assert_eq!(config.numpy.provenance, Layer::Default);
}

#[test]
fn env_python_dotted_minor() {
    let store = Store::empty();
    let env = Env::mock([("BLDCONF_PY", "3.10")]);
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();
    assert_eq!(config.python.value, 310);
}

#[test]
fn env_wins_over_store_and_default_for_every_layered_setting() {
    let (_dir, store) = write_store(
        r#"
default_python = "2.7"
use_new_rpath_logic = true
ignore_link_errors = true
link_errors_handler = "bldconf.link.StrictHandler"

[build]
root-dir = "/data/bld"
"#,
    );
    let env = Env::mock([
        ("BLDCONF_PY", "3.9"),
        ("BLDCONF_NPY", "1.11"),
        ("BLDCONF_BLD_PATH", "/srv/bld"),
        ("BLDCONF_USE_NEW_RPATH_LOGIC", "off"),
        ("BLDCONF_IGNORE_LINK_ERRORS", "0"),
        ("BLDCONF_LINK_ERRORS_HANDLER", "bldconf.link.WarnHandler"),
    ]);
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();

    assert_eq!(config.python.value, 39);
    assert_eq!(config.numpy.value, 111);
    assert_eq!(config.croot.value, PathBuf::from("/srv/bld"));
    assert!(!config.use_new_rpath_logic.value);
    assert!(!config.ignore_link_errors.value);
    assert_eq!(config.link_handler.reference().entry(), "WarnHandler");
    for (_, _, layer) in config.provenance().iter().filter(|(name, _, _)| {
        ["python", "numpy", "croot", "use_new_rpath_logic", "ignore_link_errors", "link_errors_handler"]
            .contains(name)
    }) {
        assert_eq!(*layer, Layer::Env);
    }
}

#[test]
fn dotted_and_undotted_env_agree() {
    let store = Store::empty();
    let registry = HandlerRegistry::with_builtins();
    let dotted = resolve(&Env::mock([("BLDCONF_NPY", "1.8")]), &store, &Overrides::default(), &registry).unwrap();
    let plain = resolve(&Env::mock([("BLDCONF_NPY", "18")]), &store, &Overrides::default(), &registry).unwrap();
    assert_eq!(dotted.numpy.value, plain.numpy.value);
}

#[test]
fn overrides_sit_above_env() {
    let store = Store::empty();
    let env = Env::mock([("BLDCONF_PY", "2.7"), ("BLDCONF_BLD_PATH", "/srv/bld")]);
    let overrides = Overrides {
        python: Some("3.12".to_string()),
        croot: Some(PathBuf::from("/ci/bld")),
        ..Overrides::default()
    };
    let config = resolve(&env, &store, &overrides, &HandlerRegistry::with_builtins()).unwrap();
    assert_eq!(config.python.value, 312);
    assert_eq!(config.python.provenance, Layer::Override);
    assert_eq!(config.bldpkgs_dir, PathBuf::from("/ci/bld/linux-64"));
}

// ---------------------------------------------------------------------------
// advisory
// ---------------------------------------------------------------------------

#[test]
fn redundant_rpath_flags_produce_exactly_one_advisory() {
    let (_dir, store) = write_store("verify_rpaths = true\n");
    let env = Env::mock([("BLDCONF_USE_NEW_RPATH_LOGIC", "true")]);
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();
    assert_eq!(config.advisories.len(), 1);
    assert!(config.use_new_rpath_logic.value);
}

#[test]
fn verify_rpaths_alone_is_silent() {
    let (_dir, store) = write_store("verify_rpaths = true\nuse_new_rpath_logic = false\n");
    let env = Env::mock(Vec::<(&str, &str)>::new());
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();
    assert!(config.advisories.is_empty());
}

// ---------------------------------------------------------------------------
// handlers
// ---------------------------------------------------------------------------

struct CountingHandler;

impl LinkErrorHandler for CountingHandler {
    fn handle(&self, errors: &[LinkError], _ignore: bool) -> LinkVerdict {
        if errors.len() > 1 {
            LinkVerdict::Abort {
                reason: format!("{} errors", errors.len()),
            }
        } else {
            LinkVerdict::Proceed
        }
    }
}

#[test]
fn plugin_handler_selected_from_store() {
    let (_dir, store) = write_store("link_errors_handler = \"acme.build.hooks.CountingHandler\"\n");
    let mut registry = HandlerRegistry::with_builtins();
    registry
        .register("acme.build.hooks.CountingHandler", || Arc::new(CountingHandler))
        .unwrap();

    let env = Env::mock(Vec::<(&str, &str)>::new());
    let config = resolve(&env, &store, &Overrides::default(), &registry).unwrap();
    assert_eq!(config.link_handler.reference().namespace(), "acme.build.hooks");

    let errors = vec![
        LinkError::new("lib/liba.so", "undefined symbol"),
        LinkError::new("lib/libb.so", "undefined symbol"),
    ];
    assert_eq!(
        config.link_handler.handle(&errors, config.ignore_link_errors.value),
        LinkVerdict::Abort {
            reason: "2 errors".to_string()
        }
    );
}

#[test]
fn default_handler_honours_ignore_flag() {
    let (_dir, store) = write_store("ignore_link_errors = true\n");
    let env = Env::mock(Vec::<(&str, &str)>::new());
    let config = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap();
    let errors = [LinkError::new("bin/tool", "missing libz.so.1")];
    assert_eq!(
        config.link_handler.handle(&errors, config.ignore_link_errors.value),
        LinkVerdict::Proceed
    );
}

#[test]
fn handler_entry_missing_from_known_namespace() {
    let (_dir, store) = write_store("link_errors_handler = \"bldconf.link.NoSuchHandler\"\n");
    let env = Env::mock(Vec::<(&str, &str)>::new());
    let err = resolve(&env, &store, &Overrides::default(), &HandlerRegistry::with_builtins()).unwrap_err();
    assert!(matches!(err, ConfigError::Handler(HandlerError::EntryNotFound { .. })));
    assert!(err.to_string().contains("NoSuchHandler"));
}

#[test]
fn reference_split_scenario() {
    let reference = HandlerReference::parse("pkg.sub.Handler").unwrap();
    assert_eq!(reference.namespace(), "pkg.sub");
    assert_eq!(reference.entry(), "Handler");
    assert_eq!(reference.to_string(), "pkg.sub.Handler");
}

// ---------------------------------------------------------------------------
// store errors
// ---------------------------------------------------------------------------

#[test]
fn unreadable_store_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = Store::locate(Some(&dir.path().join("missing.toml")));
    assert!(result.is_err());
}

#[test]
fn malformed_store_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[build\nroot-dir = ").unwrap();
    let err = Store::locate(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("parse"));
}
