//! App-wide constants.
//!
//! Centralises the tool name, store paths, environment variable names,
//! and built-in defaults so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "bldconf";

/// Directory name under `~/.config/` holding the persistent store.
pub const CONFIG_DIR: &str = "bldconf";

/// Store filename inside [`CONFIG_DIR`].
pub const CONFIG_FILENAME: &str = "config.toml";

/// Directory created under the root (or home) directory for build output.
pub const BLD_DIRNAME: &str = "bld";

/// Interpreter version used when neither env nor store supply one.
pub const DEFAULT_PYTHON: &str = "3.11";

/// Numeric-library version used when nothing else supplies one.
pub const DEFAULT_NUMPY: &str = "18";

/// Perl version used when nothing else supplies one.
pub const DEFAULT_PERL: &str = "5.18.2";

/// Link-error handler selected when the store does not name one.
pub const DEFAULT_LINK_ERRORS_HANDLER: &str = "bldconf.link.StrictHandler";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_RC: &str = "BLDCONF_RC";
pub const ENV_PY: &str = "BLDCONF_PY";
pub const ENV_NPY: &str = "BLDCONF_NPY";
pub const ENV_PERL: &str = "BLDCONF_PERL";
pub const ENV_BLD_PATH: &str = "BLDCONF_BLD_PATH";
pub const ENV_USE_NEW_RPATH_LOGIC: &str = "BLDCONF_USE_NEW_RPATH_LOGIC";
pub const ENV_VERIFY_RPATHS: &str = "BLDCONF_VERIFY_RPATHS";
pub const ENV_IGNORE_LINK_ERRORS: &str = "BLDCONF_IGNORE_LINK_ERRORS";
pub const ENV_LINK_ERRORS_HANDLER: &str = "BLDCONF_LINK_ERRORS_HANDLER";

// ── Store keys ──────────────────────────────────────────────────────

pub const KEY_BUILD_ROOT_DIR: [&str; 2] = ["build", "root-dir"];
pub const KEY_USE_NEW_RPATH_LOGIC: &str = "use_new_rpath_logic";
pub const KEY_VERIFY_RPATHS: &str = "verify_rpaths";
pub const KEY_IGNORE_LINK_ERRORS: &str = "ignore_link_errors";
pub const KEY_LINK_ERRORS_HANDLER: &str = "link_errors_handler";
