//! Elements
//!
//! The ten mutually-exclusive magic affinities a player picks once per run.
//! Each element resolves to a fixed profile row (base damage delta and attack
//! pattern) at selection time, so nothing downstream branches on names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the ten elemental affinities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Element {
    Flame,
    Water,
    Electric,
    Nature,
    Wind,
    Terra,
    Gravity,
    Celestial,
    Radiant,
    Shadow,
}

/// How the player attacks once an element is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackMode {
    /// Default orbiting orbs (also used by elements without a special pattern).
    Orbs,
    /// Periodic lightning strike on the nearest enemy in range.
    Lightning,
    /// Plants seeds that explode after a fuse.
    Seeds,
    /// Periodic ground slam around the player.
    Quake,
    /// Thrown boomerangs that fly out and return.
    Boomerang,
}

/// Static data row for an element.
#[derive(Clone, Copy, Debug)]
pub struct ElementProfile {
    pub name: &'static str,
    /// Flat change to player damage applied once on selection.
    pub damage_delta: f32,
    pub attack_mode: AttackMode,
}

impl Element {
    pub const ALL: [Element; 10] = [
        Element::Flame,
        Element::Water,
        Element::Electric,
        Element::Nature,
        Element::Wind,
        Element::Terra,
        Element::Gravity,
        Element::Celestial,
        Element::Radiant,
        Element::Shadow,
    ];

    pub fn profile(self) -> ElementProfile {
        match self {
            Element::Flame => ElementProfile {
                name: "Flame",
                damage_delta: 5.0,
                attack_mode: AttackMode::Orbs,
            },
            Element::Water => ElementProfile {
                name: "Water",
                damage_delta: 10.0,
                attack_mode: AttackMode::Orbs,
            },
            Element::Electric => ElementProfile {
                name: "Electric",
                damage_delta: 0.0,
                attack_mode: AttackMode::Lightning,
            },
            Element::Nature => ElementProfile {
                name: "Nature",
                damage_delta: -5.0,
                attack_mode: AttackMode::Seeds,
            },
            Element::Wind => ElementProfile {
                name: "Wind",
                damage_delta: 10.0,
                attack_mode: AttackMode::Boomerang,
            },
            Element::Terra => ElementProfile {
                name: "Terra",
                damage_delta: 20.0,
                attack_mode: AttackMode::Quake,
            },
            Element::Gravity => ElementProfile {
                name: "Gravity",
                damage_delta: 0.0,
                attack_mode: AttackMode::Orbs,
            },
            Element::Celestial => ElementProfile {
                name: "Celestial",
                damage_delta: 0.0,
                attack_mode: AttackMode::Orbs,
            },
            Element::Radiant => ElementProfile {
                name: "Radiant",
                damage_delta: 0.0,
                attack_mode: AttackMode::Orbs,
            },
            Element::Shadow => ElementProfile {
                name: "Shadow",
                damage_delta: 0.0,
                attack_mode: AttackMode::Orbs,
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Parse an element key. Unknown keys are a data bug and are reported,
    /// never mapped to a fallback.
    pub fn from_name(name: &str) -> Result<Element, String> {
        Element::ALL
            .into_iter()
            .find(|element| element.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                format!(
                    "Unknown element: '{}'. Valid elements: {}",
                    name,
                    Element::ALL.map(Element::name).join(", ")
                )
            })
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
