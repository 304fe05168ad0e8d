//! Value types shared across the engine.

use std::fmt;

/// One timestamped reading. Timestamps are whole seconds on the roast
/// timeline (negative before CHARGE once the offset has been applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    #[inline]
    pub const fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Roast milestones, in the order they normally occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Charge,
    TurningPoint,
    DryEnd,
    FcStart,
    FcEnd,
    ScStart,
    ScEnd,
    Drop,
}

impl EventKind {
    pub const ALL: [Self; 8] = [
        Self::Charge,
        Self::TurningPoint,
        Self::DryEnd,
        Self::FcStart,
        Self::FcEnd,
        Self::ScStart,
        Self::ScEnd,
        Self::Drop,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key used in saved profiles.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charge => "CHARGE",
            Self::TurningPoint => "TP",
            Self::DryEnd => "DRY_END",
            Self::FcStart => "FC_START",
            Self::FcEnd => "FC_END",
            Self::ScStart => "SC_START",
            Self::ScEnd => "SC_END",
            Self::Drop => "DROP",
        }
    }

    /// Parse a profile/CLI key. Accepts both `TP` and `TURNING_POINT`.
    pub fn from_key(key: &str) -> Option<Self> {
        let k = key.trim().to_ascii_uppercase();
        match k.as_str() {
            "CHARGE" => Some(Self::Charge),
            "TP" | "TURNING_POINT" => Some(Self::TurningPoint),
            "DRY_END" => Some(Self::DryEnd),
            "FC_START" => Some(Self::FcStart),
            "FC_END" => Some(Self::FcEnd),
            "SC_START" => Some(Self::ScStart),
            "SC_END" => Some(Self::ScEnd),
            "DROP" => Some(Self::Drop),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A milestone pinned to a point of the primary channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoastEvent {
    pub kind: EventKind,
    pub timestamp: i64,
    pub value: f64,
}

impl RoastEvent {
    #[inline]
    pub const fn at(kind: EventKind, sample: Sample) -> Self {
        Self {
            kind,
            timestamp: sample.timestamp,
            value: sample.value,
        }
    }

    #[inline]
    pub const fn sample(&self) -> Sample {
        Sample::new(self.timestamp, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Phase {
    pub duration_secs: i64,
    pub percent: f64,
    pub temp_rise: f64,
}

/// Drying / maillard / development breakdown of the roast so far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Phases {
    pub dry: Phase,
    pub maillard: Phase,
    pub develop: Phase,
}

impl Phases {
    pub fn total_secs(&self) -> i64 {
        self.dry.duration_secs + self.maillard.duration_secs + self.develop.duration_secs
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlarmThreshold {
    pub temperature: f64,
    pub triggered: bool,
}
