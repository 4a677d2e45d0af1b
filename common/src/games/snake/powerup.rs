use std::fmt;

use serde::{Deserialize, Serialize};

use super::settings::{GameConfig, SLOW_DOWN_DELTA_MS, SPEED_BOOST_DELTA_MS, SPEED_BOOST_FLOOR_MS};
use super::types::{Millis, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    Speed,
    Bonus,
    Slow,
}

impl PowerupKind {
    /// Weighted pick from a uniform `[0, 1)` roll: 55% speed, 30% slow, 15% bonus.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.55 {
            PowerupKind::Speed
        } else if roll < 0.85 {
            PowerupKind::Slow
        } else {
            PowerupKind::Bonus
        }
    }
}

impl fmt::Display for PowerupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PowerupKind::Speed => "SPEED BOOST",
            PowerupKind::Bonus => "BONUS",
            PowerupKind::Slow => "SLOW DOWN",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Powerup {
    pub position: Point,
    pub kind: PowerupKind,
    pub created_at: Millis,
}

impl Powerup {
    pub fn is_expired(&self, now: Millis, lifetime: Millis) -> bool {
        now.saturating_sub(self.created_at) >= lifetime
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivePower {
    pub kind: PowerupKind,
    pub expires_at: Millis,
}

impl ActivePower {
    pub fn remaining(&self, now: Millis) -> Millis {
        self.expires_at.saturating_sub(now)
    }
}

/// Timed speed effect of the player snake: idle, or exactly one active power.
///
/// Replacing the active power is the cancellation of its pending reversion, so
/// there is never more than one reversion outstanding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PowerEffects {
    active: Option<ActivePower>,
}

impl PowerEffects {
    pub fn active(&self) -> Option<ActivePower> {
        self.active
    }

    /// Applies a timed power on top of `interval` and returns the new interval.
    /// Bonus pickups carry no timed state and leave the interval untouched.
    pub fn activate(
        &mut self,
        kind: PowerupKind,
        now: Millis,
        interval: Millis,
        config: &GameConfig,
    ) -> Millis {
        let new_interval = match kind {
            PowerupKind::Speed => interval
                .saturating_sub(SPEED_BOOST_DELTA_MS)
                .max(SPEED_BOOST_FLOOR_MS),
            PowerupKind::Slow => interval + SLOW_DOWN_DELTA_MS,
            PowerupKind::Bonus => return interval,
        };

        self.active = Some(ActivePower {
            kind,
            expires_at: now + config.powerup_duration,
        });
        new_interval
    }

    /// Reverts to the level baseline once `now` reaches the expiry.
    /// Returns the baseline interval when a reversion happened.
    pub fn expire(&mut self, now: Millis, level: u32, config: &GameConfig) -> Option<Millis> {
        let active = self.active?;
        if now < active.expires_at {
            return None;
        }
        self.active = None;
        Some(config.baseline_interval(level))
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
