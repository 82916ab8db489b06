//! TOML settings for hosts embedding the chart engine.
//!
//! ```toml
//! [orbs]
//! multiplier = 1.0
//! [orbs.aspects.trine]
//! orb = 6.0
//! [orbs.aspects.semisextile]
//! enabled = false
//!
//! [transits]
//! max_orb = 1.0
//!
//! [eclipses]
//! orb = 3.0
//! ```

use crate::aspects::{AspectDefinition, AspectKind, OrbConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub orbs: OrbConfig,
    /// Default `max_orb` for transit searches
    pub transit_max_orb: f64,
    /// Default orb for eclipse impacts
    pub eclipse_orb: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            orbs: OrbConfig::default(),
            transit_max_orb: default_transit_orb(),
            eclipse_orb: default_eclipse_orb(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SettingsToml {
    #[serde(default)]
    orbs: OrbsToml,
    #[serde(default)]
    transits: TransitsToml,
    #[serde(default)]
    eclipses: EclipsesToml,
}

#[derive(Debug, Clone, Deserialize)]
struct OrbsToml {
    #[serde(default = "default_multiplier")]
    multiplier: f64,
    #[serde(default)]
    aspects: BTreeMap<String, AspectToml>,
}

impl Default for OrbsToml {
    fn default() -> Self {
        Self {
            multiplier: default_multiplier(),
            aspects: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct AspectToml {
    #[serde(default)]
    angle: Option<f64>,
    #[serde(default)]
    orb: Option<f64>,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct TransitsToml {
    #[serde(default = "default_transit_orb")]
    max_orb: f64,
}

impl Default for TransitsToml {
    fn default() -> Self {
        Self {
            max_orb: default_transit_orb(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EclipsesToml {
    #[serde(default = "default_eclipse_orb")]
    orb: f64,
}

impl Default for EclipsesToml {
    fn default() -> Self {
        Self {
            orb: default_eclipse_orb(),
        }
    }
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

fn default_transit_orb() -> f64 {
    1.0
}

fn default_eclipse_orb() -> f64 {
    3.0
}

fn aspect_kind(name: &str) -> anyhow::Result<AspectKind> {
    let key = name.trim().to_lowercase().replace('-', "_");
    AspectKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.name() == key)
        .ok_or_else(|| anyhow::anyhow!("Unknown aspect kind in [orbs.aspects]: {name}"))
}

fn check_orb(label: &str, value: f64) -> anyhow::Result<f64> {
    if !value.is_finite() || !(0.0..=180.0).contains(&value) {
        anyhow::bail!("{label} must be within [0, 180], got {value}");
    }
    Ok(value)
}

/// Parse settings from TOML text. Omitted values keep their defaults.
pub fn load_settings_from_str(text: &str) -> anyhow::Result<Settings> {
    let root: SettingsToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse chart settings: {e}"))?;
    let SettingsToml {
        orbs,
        transits,
        eclipses,
    } = root;

    let mut definitions: BTreeMap<AspectKind, AspectDefinition> = AspectKind::ALL
        .iter()
        .map(|kind| (*kind, AspectDefinition::standard(*kind)))
        .collect();
    for (name, entry) in &orbs.aspects {
        let kind = aspect_kind(name)?;
        if !entry.enabled {
            definitions.remove(&kind);
            continue;
        }
        let def = definitions
            .entry(kind)
            .or_insert_with(|| AspectDefinition::standard(kind));
        if let Some(angle) = entry.angle {
            def.angle = angle;
        }
        if let Some(orb) = entry.orb {
            def.orb = orb;
        }
    }

    let orb_config = OrbConfig::new(definitions.into_values().collect(), orbs.multiplier)
        .map_err(|e| anyhow::anyhow!("Invalid [orbs] settings: {e}"))?;

    Ok(Settings {
        orbs: orb_config,
        transit_max_orb: check_orb("transits.max_orb", transits.max_orb)?,
        eclipse_orb: check_orb("eclipses.orb", eclipses.orb)?,
    })
}

/// Read and parse a settings file.
pub fn load_settings(path: impl AsRef<Path>) -> anyhow::Result<Settings> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Could not read settings from {}: {e}", path.display()))?;
    load_settings_from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(load_settings_from_str("").unwrap(), Settings::default());
    }

    #[test]
    fn overrides_and_disables() {
        let settings = load_settings_from_str(
            r#"
            [orbs]
            multiplier = 0.5
            [orbs.aspects.trine]
            orb = 6.0
            [orbs.aspects.semisextile]
            enabled = false

            [transits]
            max_orb = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(settings.orbs.effective_orb(AspectKind::Trine), Some(3.0));
        assert_eq!(settings.orbs.effective_orb(AspectKind::Semisextile), None);
        assert_eq!(settings.transit_max_orb, 0.25);
        assert_eq!(settings.eclipse_orb, 3.0);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load_settings_from_str("[orbs]\nmultiplier = 0.0").is_err());
        assert!(load_settings_from_str("[orbs.aspects.square]\norb = -2.0").is_err());
        assert!(load_settings_from_str("[orbs.aspects.novile]\norb = 1.0").is_err());
        assert!(load_settings_from_str("[eclipses]\norb = 200.0").is_err());
    }
}
