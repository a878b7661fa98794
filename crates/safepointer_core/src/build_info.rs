//! Compile-time build information.

use log::info;
use serde::Serialize;

/// Package metadata baked in at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub project_name: &'static str,
    pub authors: &'static str,
    pub version: &'static str,
}

/// Build flavour name, selected by the `extended` cargo feature.
pub fn plugin_name() -> &'static str {
    if cfg!(feature = "extended") {
        "Extended Plugin"
    } else {
        "Normal Plugin"
    }
}

pub fn project_info() -> ProjectInfo {
    ProjectInfo {
        project_name: env!("CARGO_PKG_NAME"),
        authors: env!("CARGO_PKG_AUTHORS"),
        version: env!("CARGO_PKG_VERSION"),
    }
}

pub fn log_project_info() {
    let project = project_info();
    info!(
        "event=project_info module=core project_name={} authors={} version={} flavour={}",
        project.project_name,
        project.authors,
        project.version,
        plugin_name()
    );
}

#[cfg(test)]
mod tests {
    use super::{plugin_name, project_info};

    #[test]
    fn project_info_comes_from_cargo() {
        let project = project_info();
        assert_eq!(project.project_name, "safepointer_core");
        assert!(!project.version.is_empty());
    }

    #[cfg(not(feature = "extended"))]
    #[test]
    fn default_build_is_normal_flavour() {
        assert_eq!(plugin_name(), "Normal Plugin");
    }

    #[cfg(feature = "extended")]
    #[test]
    fn extended_build_is_extended_flavour() {
        assert_eq!(plugin_name(), "Extended Plugin");
    }
}
