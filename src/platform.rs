//! Platform inspection: operating-system family, subdir identifier and
//! executable layout.

use std::path::{Path, PathBuf};

use strum::{Display, EnumString};

/// Operating-system family, as far as build layout is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Unix,
}

/// Where executables live inside a prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ExecLayout {
    /// Subdirectory under the prefix, if any.
    bin_dir: Option<&'static str>,
    /// Filename suffix appended to the executable name.
    suffix: &'static str,
}

const LAYOUTS: [(OsFamily, ExecLayout); 2] = [
    (
        OsFamily::Windows,
        ExecLayout {
            bin_dir: None,
            suffix: ".exe",
        },
    ),
    (
        OsFamily::Unix,
        ExecLayout {
            bin_dir: Some("bin"),
            suffix: "",
        },
    ),
];

/// Inspected platform facts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub family: OsFamily,
    /// Package subdirectory identifier such as `linux-64` or `osx-arm64`.
    pub subdir: String,
}

impl Platform {
    /// Inspect the platform this binary was compiled for.
    pub fn detect() -> Self {
        Self::from_parts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Build platform facts from an OS and architecture name as reported by
    /// [`std::env::consts`].
    pub fn from_parts(os: &str, arch: &str) -> Self {
        let family = if os == "windows" {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        };
        Self {
            family,
            subdir: subdir_for(os, arch),
        }
    }

    /// Path of the executable `name` inside `prefix`.
    pub fn executable(&self, prefix: &Path, name: &str) -> PathBuf {
        let layout = LAYOUTS
            .iter()
            .find(|(family, _)| *family == self.family)
            .map(|(_, layout)| *layout)
            .unwrap_or(LAYOUTS[1].1);

        let dir = match layout.bin_dir {
            Some(bin) => prefix.join(bin),
            None => prefix.to_path_buf(),
        };
        dir.join(format!("{name}{}", layout.suffix))
    }
}

fn subdir_for(os: &str, arch: &str) -> String {
    let os_part = match os {
        "macos" => "osx",
        "windows" => "win",
        other => other,
    };
    let arch_part = match (os, arch) {
        (_, "x86_64") => "64",
        ("windows", "x86") | ("linux", "x86") => "32",
        ("macos", "aarch64") => "arm64",
        (_, other) => other,
    };
    format!("{os_part}-{arch_part}")
}
