use serde::{Deserialize, Serialize};

/// Which flag actions the valuator considers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagPolicy {
    /// Every hidden cell may be revealed or flagged.
    #[default]
    Always,
    /// A cell is only offered as a flag at or above `threshold`, and only offered as a
    /// reveal below it.
    Confident { threshold: f64 },
}

impl FlagPolicy {
    /// Lowest mine probability at which a guessed flag is placed instead of a reveal.
    /// Below it, a board where no reveal beats flagging falls back to the safest reveal.
    pub fn flag_threshold(self) -> f64 {
        match self {
            Self::Always => 1.0,
            Self::Confident { threshold } => threshold,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaxationConfig {
    /// Full passes over every equation before giving up.
    pub max_sweeps: usize,
    /// Largest residual on any equation still accepted as feasible.
    pub tolerance: f64,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 500,
            tolerance: 1e-6,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Largest group of linked frontier cells enumerated exactly.
    pub max_exact_component: usize,
    /// Value of revealing a mine.
    pub hazard_penalty: f64,
    /// Bonus added to a safe reveal that is likely to open up new clues.
    pub info_gain_bonus: f64,
    /// The bonus only applies below this mine probability.
    pub info_gain_threshold: f64,
    pub flag_policy: FlagPolicy,
    pub relaxation: RelaxationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_exact_component: 24,
            hazard_penalty: -10.0,
            info_gain_bonus: 0.2,
            info_gain_threshold: 0.5,
            flag_policy: FlagPolicy::default(),
            relaxation: RelaxationConfig::default(),
        }
    }
}
