use anyhow::{Context, Result};

use crate::config::profile::ProfileDocument;

/// Profiles shipped inside the binary (name, YAML source)
const BUILTIN_PROFILES: &[(&str, &str)] = &[
    ("isaac-sim", include_str!("../../profiles/isaac-sim.yaml")),
    ("isaac-sim-gui", include_str!("../../profiles/isaac-sim-gui.yaml")),
    ("isaac-sim-sdg", include_str!("../../profiles/isaac-sim-sdg.yaml")),
];

/// Names of all builtin profiles
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTIN_PROFILES.iter().map(|(name, _)| *name)
}

/// Look up a builtin profile by name
pub fn get(name: &str) -> Result<Option<ProfileDocument>> {
    let Some((_, source)) = BUILTIN_PROFILES.iter().find(|(n, _)| *n == name) else {
        return Ok(None);
    };
    let doc = serde_yaml::from_str(source)
        .with_context(|| format!("Failed to parse builtin profile '{}'", name))?;
    Ok(Some(doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::host::fixture;
    use crate::config::profile::LaunchProfile;
    use std::path::Path;

    #[test]
    fn every_builtin_parses_and_matches_its_name() {
        for name in names() {
            let doc = get(name).unwrap().unwrap();
            assert_eq!(doc.name, name);
        }
        assert!(get("no-such-profile").unwrap().is_none());
    }

    #[test]
    fn headless_builtins_resolve_without_display() {
        let host = fixture(Path::new("/h"));
        for name in ["isaac-sim", "isaac-sim-sdg"] {
            let doc = get(name).unwrap().unwrap();
            LaunchProfile::from_document(doc, &host).unwrap();
        }
    }

    #[test]
    fn gui_builtin_forwards_display() {
        let mut host = fixture(Path::new("/h"));
        host.display = Some(":0".to_string());
        let doc = get("isaac-sim-gui").unwrap().unwrap();
        let profile = LaunchProfile::from_document(doc, &host).unwrap();
        assert!(profile.env().iter().any(|v| v.key == "DISPLAY" && v.value == ":0"));
    }
}
