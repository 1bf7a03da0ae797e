//! Enumeration types used throughout the assessment loop.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Relationship between the sensing platform's owner and a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relationship {
    /// Not classified by the source.
    #[default]
    Unknown,
    Neutral,
    Friendly,
    Hostile,
}

/// Coarse type tag for a contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    #[default]
    Unknown,
    /// Capital-class platform (stations, large ships).
    LargePlatform,
    /// Fighter-class platform.
    SmallPlatform,
    GuidedMunition,
    /// Asteroids, planets, debris.
    NaturalObject,
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContactKind::Unknown => "Unknown",
            ContactKind::LargePlatform => "LargePlatform",
            ContactKind::SmallPlatform => "SmallPlatform",
            ContactKind::GuidedMunition => "GuidedMunition",
            ContactKind::NaturalObject => "NaturalObject",
        };
        f.write_str(name)
    }
}

/// Discrete defense posture. Level 1 is the most severe, level 5 the calmest.
///
/// Variants are declared most-severe-first, so `Ord` sorts by numeric level:
/// `Critical < High < ... < Calm`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DefenseCondition {
    Critical,
    High,
    Elevated,
    Mild,
    #[default]
    Calm,
}

impl DefenseCondition {
    /// All conditions, most severe first.
    pub const ALL: [DefenseCondition; 5] = [
        DefenseCondition::Critical,
        DefenseCondition::High,
        DefenseCondition::Elevated,
        DefenseCondition::Mild,
        DefenseCondition::Calm,
    ];

    /// Numeric level, 1 (critical) through 5 (calm).
    pub fn level(self) -> u8 {
        match self {
            DefenseCondition::Critical => 1,
            DefenseCondition::High => 2,
            DefenseCondition::Elevated => 3,
            DefenseCondition::Mild => 4,
            DefenseCondition::Calm => 5,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(DefenseCondition::Critical),
            2 => Some(DefenseCondition::High),
            3 => Some(DefenseCondition::Elevated),
            4 => Some(DefenseCondition::Mild),
            5 => Some(DefenseCondition::Calm),
            _ => None,
        }
    }

    /// Opaque token handed to escalation listeners, e.g. `LEVEL_2`.
    pub fn token(self) -> String {
        format!("LEVEL_{}", self.level())
    }

    pub fn is_more_severe_than(self, other: DefenseCondition) -> bool {
        self < other
    }

    /// Collapse to the four-level alert posture used by simpler consumers.
    pub fn alert_level(self) -> AlertLevel {
        match self {
            DefenseCondition::Critical | DefenseCondition::High => AlertLevel::High,
            DefenseCondition::Elevated => AlertLevel::Moderate,
            DefenseCondition::Mild => AlertLevel::Low,
            DefenseCondition::Calm => AlertLevel::None,
        }
    }
}

impl fmt::Display for DefenseCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LEVEL {}", self.level())
    }
}

/// Four-level alert posture.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AlertLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

/// Which capability term completes a contact's aggregate score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoringMode {
    /// Raw offense rating from the detection source, through the offense curve.
    #[default]
    OffenseRating,
    /// Contact's effective DPS relative to our own optimal DPS.
    DpsRatio,
}

/// Named classification of a contact's trajectory relative to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterceptBearing {
    Static,
    RapidlyDiverging,
    Diverging,
    Tracking,
    Converging,
    RapidlyConverging,
}

impl InterceptBearing {
    /// Classify from speed and intercept factor.
    pub fn classify(speed: f64, intercept_factor: f64) -> Self {
        if speed <= 0.0 {
            return InterceptBearing::Static;
        }
        if intercept_factor < -0.6 {
            InterceptBearing::RapidlyDiverging
        } else if intercept_factor < -0.2 {
            InterceptBearing::Diverging
        } else if intercept_factor < 0.2 {
            InterceptBearing::Tracking
        } else if intercept_factor < 0.6 {
            InterceptBearing::Converging
        } else {
            InterceptBearing::RapidlyConverging
        }
    }
}

impl fmt::Display for InterceptBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InterceptBearing::Static => "Static",
            InterceptBearing::RapidlyDiverging => "Rapidly Diverging",
            InterceptBearing::Diverging => "Diverging",
            InterceptBearing::Tracking => "Tracking",
            InterceptBearing::Converging => "Converging",
            InterceptBearing::RapidlyConverging => "Rapidly Converging",
        };
        f.write_str(name)
    }
}
