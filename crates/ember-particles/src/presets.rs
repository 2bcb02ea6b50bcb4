//! Built-in field configurations, one per classic demo

use crate::config::{ColorPolicy, DeadPolicy, FieldConfig, FloatRange, LifeRange, Motion};
use ember_core::{Color, EmberError, Result};

const PRESETS: &[(&str, &str)] = &[
    ("basic", "250 white sparks that burn out"),
    ("fountain", "250 white sparks, respawned in place forever"),
    ("recycling", "250 white sparks, pooled and trimmed, respawning"),
    ("polka", "25 large dots in random hues"),
    ("swirl", "250 orange-red sparks on spiral paths"),
];

/// Names of all built-in presets
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

/// `(name, one-line description)` for every preset
pub fn describe() -> &'static [(&'static str, &'static str)] {
    PRESETS
}

pub fn by_name(name: &str) -> Result<FieldConfig> {
    let white = ColorPolicy::Fixed {
        value: Color::WHITE,
    };
    let config = match name {
        "basic" => FieldConfig {
            color: white,
            policy: DeadPolicy::Skip,
            ..FieldConfig::default()
        },
        "fountain" => FieldConfig {
            color: white,
            policy: DeadPolicy::Respawn,
            ..FieldConfig::default()
        },
        "recycling" => FieldConfig {
            color: white,
            policy: DeadPolicy::Recycle { respawn: true },
            ..FieldConfig::default()
        },
        "polka" => FieldConfig {
            capacity: 25,
            radius: FloatRange::new(20.0, 50.0),
            speed: FloatRange::new(2.0, 15.0),
            life: LifeRange::new(75, 125),
            color: ColorPolicy::hue(0.0, 360.0),
            policy: DeadPolicy::Recycle { respawn: false },
            ..FieldConfig::default()
        },
        "swirl" => FieldConfig {
            capacity: 250,
            radius: FloatRange::new(1.0, 5.0),
            speed: FloatRange::new(0.1, 3.0),
            life: LifeRange::new(100, 200),
            fade: false,
            color: ColorPolicy::Fixed {
                value: Color::ORANGE_RED,
            },
            policy: DeadPolicy::Recycle { respawn: false },
            motion: Motion::Spiral {
                angular_change: FloatRange::new(-0.1, 0.1),
            },
            ..FieldConfig::default()
        },
        _ => {
            return Err(EmberError::UnknownPreset {
                name: name.to_string(),
                available: names().map(String::from).collect(),
            })
        }
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_is_valid() {
        for name in names() {
            let config = by_name(name).unwrap();
            config.validate().unwrap();
        }
    }

    #[test]
    fn every_preset_round_trips_through_toml() {
        for name in names() {
            let config = by_name(name).unwrap();
            let text = config.to_toml_string().unwrap();
            let back = FieldConfig::from_toml_str(&text).unwrap();
            assert_eq!(back.capacity, config.capacity, "{name}");
            assert_eq!(back.policy, config.policy, "{name}");
            assert_eq!(back.motion, config.motion, "{name}");
        }
    }

    #[test]
    fn polka_uses_random_hues() {
        let config = by_name("polka").unwrap();
        assert_eq!(config.capacity, 25);
        assert!(matches!(config.color, ColorPolicy::Hue { .. }));
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        match by_name("fireworks") {
            Err(EmberError::UnknownPreset { name, available }) => {
                assert_eq!(name, "fireworks");
                assert!(available.iter().any(|n| n == "swirl"));
            }
            other => panic!("Expected UnknownPreset, got {other:?}"),
        }
    }
}
