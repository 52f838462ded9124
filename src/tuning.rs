//! Data-driven game balance
//!
//! Every gameplay number that isn't fixed geometry lives here so a session can be
//! replayed with different feel without touching the simulation code.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// How the host's frame delta is turned into a simulation step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeStep {
    /// Real elapsed seconds, clamped to `max_dt` (survives tab-backgrounding stalls)
    Variable { max_dt: f32 },
    /// Constant step per frame regardless of elapsed time
    Fixed { dt: f32 },
}

impl Default for TimeStep {
    fn default() -> Self {
        TimeStep::Variable { max_dt: 0.1 }
    }
}

impl TimeStep {
    /// Step size to simulate for a frame that took `elapsed` seconds
    pub fn step(&self, elapsed: f32) -> f32 {
        match *self {
            TimeStep::Variable { max_dt } => elapsed.clamp(0.0, max_dt),
            TimeStep::Fixed { dt } => dt,
        }
    }

    /// Largest step this discipline can produce
    pub fn max_step(&self) -> f32 {
        match *self {
            TimeStep::Variable { max_dt } => max_dt,
            TimeStep::Fixed { dt } => dt,
        }
    }

    /// One frame at 60 Hz, no clamping
    pub fn fixed() -> Self {
        TimeStep::Fixed { dt: SIM_DT }
    }
}

/// Gameplay balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity applied on bounce/jump (negative = up, px/s)
    pub jump_force: f32,
    /// Horizontal speed while steering (px/s)
    pub move_speed: f32,

    /// Vertical gap between consecutive platforms
    pub min_gap: f32,
    pub max_gap: f32,
    pub easy_max_gap: f32,
    /// Horizontal drift between consecutive platforms
    pub max_x_dist: f32,
    pub easy_max_x_dist: f32,
    /// Chance a new platform carries a balloon
    pub item_chance: f64,

    /// Jump-boost balloon multiplies jump force by this...
    pub boost_factor: f32,
    /// ...up to this multiple of the baseline
    pub boost_cap: f32,

    /// Extra landing band below a platform top (px)
    pub collision_tolerance: f32,

    pub time_step: TimeStep,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            jump_force: -550.0,
            move_speed: 300.0,

            min_gap: 60.0,
            max_gap: 100.0,
            easy_max_gap: 80.0,
            max_x_dist: 120.0,
            easy_max_x_dist: 80.0,
            item_chance: 0.4,

            boost_factor: 1.05,
            boost_cap: 1.1,

            collision_tolerance: 5.0,

            time_step: TimeStep::default(),
        }
    }
}

/// Rejected tuning values
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    NonPositive { field: &'static str, value: f32 },
    GapRange { min: f32, max: f32 },
    Unreachable { max_gap: f32, apex: f32 },
    Probability { value: f64 },
    BoostCap { factor: f32, cap: f32 },
    Parse(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
            Self::GapRange { min, max } => {
                write!(f, "invalid platform gap range [{min}, {max}]")
            }
            Self::Unreachable { max_gap, apex } => write!(
                f,
                "max gap {max_gap} exceeds the jump apex {apex:.1}; platforms would be unreachable"
            ),
            Self::Probability { value } => {
                write!(f, "item chance must be within [0, 1], got {value}")
            }
            Self::BoostCap { factor, cap } => {
                write!(f, "boost factor {factor} and cap {cap} must both be >= 1")
            }
            Self::Parse(msg) => write!(f, "invalid tuning json: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Peak height of a bounce at baseline jump force
    pub fn jump_apex(&self) -> f32 {
        self.jump_force * self.jump_force / (2.0 * self.gravity)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [
            ("gravity", self.gravity),
            ("jump_force magnitude", -self.jump_force),
            ("move_speed", self.move_speed),
            ("min_gap", self.min_gap),
            ("easy_max_gap", self.easy_max_gap),
            ("max_gap", self.max_gap),
            ("max_x_dist", self.max_x_dist),
            ("easy_max_x_dist", self.easy_max_x_dist),
            ("collision_tolerance", self.collision_tolerance),
            ("time step", self.time_step.max_step()),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        if self.min_gap > self.easy_max_gap || self.easy_max_gap > self.max_gap {
            return Err(TuningError::GapRange {
                min: self.min_gap,
                max: self.max_gap,
            });
        }

        let apex = self.jump_apex();
        if self.max_gap >= apex {
            return Err(TuningError::Unreachable {
                max_gap: self.max_gap,
                apex,
            });
        }

        if !(0.0..=1.0).contains(&self.item_chance) {
            return Err(TuningError::Probability {
                value: self.item_chance,
            });
        }

        if self.boost_factor < 1.0 || self.boost_cap < 1.0 {
            return Err(TuningError::BoostCap {
                factor: self.boost_factor,
                cap: self.boost_cap,
            });
        }

        Ok(())
    }

    /// This tuning if it validates, otherwise the defaults
    pub fn or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Tuning rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
