//! Build configuration record and its resolution.
//!
//! Priority (highest to lowest):
//! 1. Explicit overrides (CLI flags)
//! 2. Environment variables
//! 3. Persistent store (`~/.config/bldconf/config.toml` or `--rc`)
//! 4. Computed defaults
//!
//! Derived paths are computed only after every setting is resolved.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::constants;
use crate::env::Env;
use crate::handler::{HandlerError, HandlerReference, HandlerRegistry, LoadedHandler};
use crate::platform::Platform;
use crate::settings::{
    Chain, Layer, ResolveError, Setting, coerce_flag, coerce_version, expand_path,
};
use crate::store::{Store, StoreError};

/// Errors during configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("link error handler: {0}")]
    Handler(#[from] HandlerError),
}

/// Values supplied explicitly by the caller, above every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub python: Option<String>,
    pub numpy: Option<String>,
    pub perl: Option<String>,
    pub croot: Option<PathBuf>,
}

/// Everything resolution reads from.
#[derive(Debug, Clone, Copy)]
pub struct Sources<'a> {
    pub env: &'a Env,
    pub store: &'a Store,
    pub overrides: &'a Overrides,
    pub platform: &'a Platform,
    pub registry: &'a HandlerRegistry,
}

/// Non-fatal note about an ineffective option combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub message: String,
}

/// The fully resolved build configuration.
///
/// Built once and passed by reference; consumers needing different values
/// resolve a new record instead of mutating this one.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub python: Setting<u32>,
    pub numpy: Setting<u32>,
    pub perl: Setting<String>,
    /// Interpreter is a 3.x-or-later series.
    pub py3k: bool,
    pub subdir: Setting<String>,
    pub root_dir: Setting<PathBuf>,
    pub croot: Setting<PathBuf>,
    pub build_prefix: PathBuf,
    pub test_prefix: PathBuf,
    pub build_python: PathBuf,
    pub test_python: PathBuf,
    pub build_perl: PathBuf,
    pub test_perl: PathBuf,
    pub bldpkgs_dir: PathBuf,
    pub use_new_rpath_logic: Setting<bool>,
    pub verify_rpaths: Setting<bool>,
    pub ignore_link_errors: Setting<bool>,
    pub link_errors_handler: Setting<HandlerReference>,
    pub link_handler: LoadedHandler,
    pub advisories: Vec<Advisory>,
}

impl BuildConfig {
    /// Resolve every setting, derive paths and load the link-error handler.
    pub fn resolve(src: Sources<'_>) -> Result<Self, ConfigError> {
        let Sources {
            env,
            store,
            overrides,
            platform,
            registry,
        } = src;

        let python = resolve_version(
            "python",
            overrides.python.as_deref(),
            env.lookup(constants::ENV_PY),
            match store.default_python() {
                Some(v) => (Layer::Store, v.to_string()),
                None => (Layer::Default, constants::DEFAULT_PYTHON.to_string()),
            },
        )?;
        let numpy = resolve_version(
            "numpy",
            overrides.numpy.as_deref(),
            env.lookup(constants::ENV_NPY),
            (Layer::Default, constants::DEFAULT_NUMPY.to_string()),
        )?;
        let perl = Chain::new("perl")
            .layer(Layer::Override, overrides.perl.clone())
            .layer(Layer::Env, env.lookup(constants::ENV_PERL))
            .or_default(constants::DEFAULT_PERL.to_string());

        let subdir = Chain::new("subdir")
            .layer(Layer::Store, store.subdir().map(str::to_string))
            .or_default(platform.subdir.clone());

        let root_dir = Chain::new("root_dir")
            .layer(Layer::Store, store.root_dir().map(expand_path))
            .or_else(Layer::Default, default_root_dir);

        let croot = resolve_croot(src, &root_dir.value)?;

        let use_new_rpath_logic = resolve_flag(
            "use_new_rpath_logic",
            env,
            constants::ENV_USE_NEW_RPATH_LOGIC,
            store,
            constants::KEY_USE_NEW_RPATH_LOGIC,
            true,
        )?;
        let verify_rpaths = resolve_flag(
            "verify_rpaths",
            env,
            constants::ENV_VERIFY_RPATHS,
            store,
            constants::KEY_VERIFY_RPATHS,
            false,
        )?;
        let ignore_link_errors = resolve_flag(
            "ignore_link_errors",
            env,
            constants::ENV_IGNORE_LINK_ERRORS,
            store,
            constants::KEY_IGNORE_LINK_ERRORS,
            false,
        )?;

        let handler_text = Chain::new("link_errors_handler")
            .layer(Layer::Env, env.lookup(constants::ENV_LINK_ERRORS_HANDLER))
            .try_layer(Layer::Store, || {
                store
                    .get_str(&[constants::KEY_LINK_ERRORS_HANDLER])
                    .map(|s| s.map(str::to_string))
            })?
            .or_default(constants::DEFAULT_LINK_ERRORS_HANDLER.to_string());
        let link_errors_handler = Setting {
            name: handler_text.name,
            value: HandlerReference::parse(&handler_text.value)?,
            provenance: handler_text.provenance,
        };
        let link_handler = registry.resolve(&link_errors_handler.value)?;

        let envs_dir = store
            .envs_dirs()
            .and_then(|dirs| dirs.first())
            .map(|d| expand_path(d))
            .unwrap_or_else(|| root_dir.value.join("envs"));
        let build_prefix = envs_dir.join("_build");
        let test_prefix = envs_dir.join("_test");
        let bldpkgs_dir = croot.value.join(&subdir.value);

        let advisories = rpath_advisories(&use_new_rpath_logic, &verify_rpaths);

        Ok(Self {
            py3k: python.value >= 30,
            build_python: platform.executable(&build_prefix, "python"),
            test_python: platform.executable(&test_prefix, "python"),
            build_perl: platform.executable(&build_prefix, "perl"),
            test_perl: platform.executable(&test_prefix, "perl"),
            python,
            numpy,
            perl,
            subdir,
            root_dir,
            croot,
            build_prefix,
            test_prefix,
            bldpkgs_dir,
            use_new_rpath_logic,
            verify_rpaths,
            ignore_link_errors,
            link_errors_handler,
            link_handler,
            advisories,
        })
    }

    /// The diagnostic summary printed by `bldconf show`.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("python", self.python.value.to_string()),
            ("numpy", self.numpy.value.to_string()),
            ("subdir", self.subdir.value.clone()),
            ("croot", self.croot.value.display().to_string()),
            ("build packages directory", self.bldpkgs_dir.display().to_string()),
        ]
    }

    /// Every setting with the layer that supplied it.
    pub fn provenance(&self) -> Vec<(&'static str, String, Layer)> {
        fn row<T: ToString>(s: &Setting<T>) -> (&'static str, String, Layer) {
            (s.name, s.value.to_string(), s.provenance)
        }
        fn path_row(s: &Setting<PathBuf>) -> (&'static str, String, Layer) {
            (s.name, s.value.display().to_string(), s.provenance)
        }
        vec![
            row(&self.python),
            row(&self.numpy),
            row(&self.perl),
            row(&self.subdir),
            path_row(&self.root_dir),
            path_row(&self.croot),
            row(&self.use_new_rpath_logic),
            row(&self.verify_rpaths),
            row(&self.ignore_link_errors),
            row(&self.link_errors_handler),
        ]
    }

    /// Paths computed from the resolved settings.
    pub fn derived_paths(&self) -> Vec<(&'static str, &Path)> {
        vec![
            ("build_prefix", self.build_prefix.as_path()),
            ("test_prefix", self.test_prefix.as_path()),
            ("build_python", self.build_python.as_path()),
            ("test_python", self.test_python.as_path()),
            ("build_perl", self.build_perl.as_path()),
            ("test_perl", self.test_perl.as_path()),
            ("bldpkgs_dir", self.bldpkgs_dir.as_path()),
        ]
    }
}

fn resolve_version(
    name: &'static str,
    explicit: Option<&str>,
    from_env: Option<String>,
    (default_layer, default): (Layer, String),
) -> Result<Setting<u32>, ResolveError> {
    let raw = Chain::new(name)
        .layer(Layer::Override, explicit.map(str::to_string))
        .layer(Layer::Env, from_env)
        .or_else(default_layer, || default);
    let value = coerce_version(name, raw.provenance, &raw.value)?;
    Ok(raw.map(|_| value))
}

fn resolve_flag(
    name: &'static str,
    env: &Env,
    env_var: &str,
    store: &Store,
    key: &str,
    default: bool,
) -> Result<Setting<bool>, ResolveError> {
    let setting = Chain::new(name)
        .try_layer(Layer::Env, || {
            env.lookup(env_var)
                .map(|raw| coerce_flag(name, Layer::Env, &raw))
                .transpose()
        })?
        .layer(Layer::Store, store.get_flag(key))
        .or_default(default);
    Ok(setting)
}

fn resolve_croot(src: Sources<'_>, root_dir: &Path) -> Result<Setting<PathBuf>, ResolveError> {
    let setting = Chain::new("croot")
        .layer(Layer::Override, src.overrides.croot.as_deref().map(expand_path))
        .layer(
            Layer::Env,
            src.env.lookup(constants::ENV_BLD_PATH).map(|p| expand_path(Path::new(&p))),
        )
        .try_layer(Layer::Store, || {
            src.store
                .get_str(&constants::KEY_BUILD_ROOT_DIR)
                .map(|p| p.filter(|p| !p.is_empty()).map(|p| expand_path(Path::new(p))))
        })?
        .or_else(Layer::Default, || {
            let writable = src
                .store
                .root_writable()
                .unwrap_or_else(|| is_writable(root_dir));
            if writable {
                root_dir.join(constants::BLD_DIRNAME)
            } else {
                expand_path(Path::new("~").join(constants::BLD_DIRNAME).as_path())
            }
        });
    Ok(setting)
}

fn rpath_advisories(use_new: &Setting<bool>, verify: &Setting<bool>) -> Vec<Advisory> {
    if !(verify.value && use_new.value) {
        return Vec::new();
    }
    let advisory = Advisory {
        message: "`verify_rpaths = true` has no effect when `use_new_rpath_logic = true` is also set"
            .to_string(),
    };
    tracing::warn!("{}", advisory.message);
    vec![advisory]
}

fn default_root_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(constants::APP_NAME))
        .unwrap_or_else(|| expand_path(Path::new(".").join(constants::APP_NAME).as_path()))
}

/// Whether the current user can create files in `path`.
fn is_writable(path: &Path) -> bool {
    tempfile::tempfile_in(path).is_ok()
}
