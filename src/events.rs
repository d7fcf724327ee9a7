// src/events.rs - typed change events keyed by (negated) geological time

use crate::error::MagellanError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Normal,
    Reverse,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Normal => "n",
            Polarity::Reverse => "r",
        }
    }

    /// +1 for normal, -1 for reverse; multiplies a block's anomaly contribution.
    pub fn sign(&self) -> f64 {
        match self {
            Polarity::Normal => 1.0,
            Polarity::Reverse => -1.0,
        }
    }

    pub fn flipped(&self) -> Polarity {
        match self {
            Polarity::Normal => Polarity::Reverse,
            Polarity::Reverse => Polarity::Normal,
        }
    }
}

impl FromStr for Polarity {
    type Err = MagellanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "normal" => Ok(Polarity::Normal),
            "r" | "reverse" => Ok(Polarity::Reverse),
            _ => Err(MagellanError::UnknownPolarity(s.to_string())),
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time in million years, stored negated so that younger events sort after
/// older ones. Ordered with `total_cmp`; `-0.0` is folded into `0.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeKey(f64);

impl TimeKey {
    pub const ZERO: TimeKey = TimeKey(0.0);

    pub fn new(time: f64) -> Self {
        if time == 0.0 { TimeKey(0.0) } else { TimeKey(time) }
    }

    /// Key for an event `age_myr` million years before present.
    pub fn from_age(age_myr: f64) -> Self {
        TimeKey::new(-age_myr)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for TimeKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeKey {}

impl PartialOrd for TimeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// The fields an event may change. Absent fields leave the running state alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeFields {
    pub asymmetry: Option<f64>,
    /// Half spreading rate, km/Myr.
    pub spreading_rate: Option<f64>,
    /// Signed ridge jump, km. Positive jumps move the axis into the right half.
    pub jump: Option<f64>,
    pub magnetization: Option<f64>,
    pub polarity: Option<Polarity>,
}

impl ChangeFields {
    /// Overwrite fields with every field `other` carries.
    pub fn merge_from(&mut self, other: &ChangeFields) {
        if other.asymmetry.is_some() {
            self.asymmetry = other.asymmetry;
        }
        if other.spreading_rate.is_some() {
            self.spreading_rate = other.spreading_rate;
        }
        if other.jump.is_some() {
            self.jump = other.jump;
        }
        if other.magnetization.is_some() {
            self.magnetization = other.magnetization;
        }
        if other.polarity.is_some() {
            self.polarity = other.polarity;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ChangeFields::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeEvent {
    pub time: f64,
    pub fields: ChangeFields,
}

pub type EventSource = BTreeMap<TimeKey, ChangeFields>;

/// The independent sparse event sources a provider hands to the core.
#[derive(Debug, Clone, Default)]
pub struct EventSources {
    pub asymmetry: EventSource,
    pub spreading_rate: EventSource,
    pub jump: EventSource,
    pub magnetization: EventSource,
    pub polarity: EventSource,
}

impl EventSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_asymmetry(&mut self, age_myr: f64, asymmetry: f64) -> &mut Self {
        self.asymmetry.entry(TimeKey::from_age(age_myr)).or_default().asymmetry = Some(asymmetry);
        self
    }

    /// Record a half spreading rate (km/Myr) starting `age_myr` ago.
    pub fn add_spreading_rate(&mut self, age_myr: f64, half_rate: f64) -> &mut Self {
        self.spreading_rate
            .entry(TimeKey::from_age(age_myr))
            .or_default()
            .spreading_rate = Some(half_rate);
        self
    }

    /// Record a full spreading rate; the core integrates half rates.
    pub fn add_full_spreading_rate(&mut self, age_myr: f64, full_rate: f64) -> &mut Self {
        self.add_spreading_rate(age_myr, full_rate / 2.0)
    }

    pub fn add_jump(&mut self, age_myr: f64, jump_km: f64) -> &mut Self {
        self.jump.entry(TimeKey::from_age(age_myr)).or_default().jump = Some(jump_km);
        self
    }

    pub fn add_magnetization(&mut self, age_myr: f64, magnetization: f64) -> &mut Self {
        self.magnetization
            .entry(TimeKey::from_age(age_myr))
            .or_default()
            .magnetization = Some(magnetization);
        self
    }

    pub fn add_polarity(&mut self, age_myr: f64, polarity: Polarity) -> &mut Self {
        self.polarity.entry(TimeKey::from_age(age_myr)).or_default().polarity = Some(polarity);
        self
    }

    /// Load a reversal timescale given the ages (Myr) at which each chron
    /// ends, youngest first after sorting. The youngest chron is normal and
    /// polarity alternates from there.
    pub fn set_timescale(&mut self, chron_end_ages_myr: &[f64]) -> &mut Self {
        let mut ages = chron_end_ages_myr.to_vec();
        ages.sort_by(|a, b| a.total_cmp(b));

        self.polarity.clear();
        let mut polarity = Polarity::Normal;
        for age in ages {
            self.add_polarity(age, polarity);
            polarity = polarity.flipped();
        }
        self
    }
}
