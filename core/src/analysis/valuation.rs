use crate::*;

/// One-step expected value of revealing a cell with mine probability `p`.
pub fn reveal_value(p: f64, config: &EngineConfig) -> f64 {
    let bonus = if p < config.info_gain_threshold {
        config.info_gain_bonus
    } else {
        0.0
    };
    (1.0 - p) * (1.0 + bonus) + p * config.hazard_penalty
}

/// Flagging never loses the game but never uncovers anything either.
pub const FLAG_VALUE: f64 = 0.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScoredAction {
    pub action: Action,
    pub value: f64,
}

impl ScoredAction {
    /// Higher value wins; on a tie a reveal beats a flag. Earlier cells win the
    /// remaining ties because candidates arrive in row-major order.
    fn beats(&self, other: &Self) -> bool {
        self.value > other.value
            || (self.value == other.value && self.action.is_reveal() && !other.action.is_reveal())
    }
}

fn candidates<'a>(
    map: &'a ProbabilityMap,
    config: &'a EngineConfig,
) -> impl Iterator<Item = ScoredAction> + 'a {
    map.iter().flat_map(move |(cell, p)| {
        let (reveal, flag) = match config.flag_policy {
            FlagPolicy::Always => (true, true),
            FlagPolicy::Confident { threshold } => (p < threshold, p >= threshold),
        };
        let reveal = reveal.then(|| ScoredAction {
            action: Action::Reveal(cell),
            value: reveal_value(p, config),
        });
        let flag = flag.then_some(ScoredAction {
            action: Action::Flag(cell),
            value: FLAG_VALUE,
        });
        reveal.into_iter().chain(flag)
    })
}

/// First cell in row-major order whose probability is preferred by `better` over every
/// other cell.
fn extreme_cell(
    map: &ProbabilityMap,
    better: impl Fn(f64, f64) -> bool,
) -> Option<(Coord2, f64)> {
    map.iter().fold(None, |best, (cell, p)| match best {
        Some((_, best_p)) if !better(p, best_p) => best,
        _ => Some((cell, p)),
    })
}

/// Handles the degenerate case where no reveal is worth more than a flag. Every flag
/// scores the same, so the value alone does not say which cell to take: the most likely
/// mine is flagged when it clears the policy threshold, and otherwise the least likely
/// one is revealed.
fn resolve_flag_tie(map: &ProbabilityMap, config: &EngineConfig) -> Option<ScoredAction> {
    let (riskiest, p_max) = extreme_cell(map, |p, best| p > best)?;
    if p_max >= config.flag_policy.flag_threshold() {
        return Some(ScoredAction {
            action: Action::Flag(riskiest),
            value: FLAG_VALUE,
        });
    }

    let (safest, p_min) = extreme_cell(map, |p, best| p < best)?;
    log::debug!("No reveal beats flagging, falling back to the safest cell at {p_min:.3}");
    Some(ScoredAction {
        action: Action::Reveal(safest),
        value: reveal_value(p_min, config),
    })
}

/// Picks the action with the greatest one-step expected value, or `None` when no hidden
/// cell is left.
///
/// When a flag comes out on top, every flag ties at [`FLAG_VALUE`]; the choice then goes
/// to the lowest-probability reveal unless some cell is at or above the flag threshold
/// of the [`FlagPolicy`].
///
/// Only a single step is evaluated; a larger `depth` is accepted and treated as one.
pub fn choose_action(map: &ProbabilityMap, config: &EngineConfig, depth: usize) -> Option<ScoredAction> {
    if depth > 1 {
        log::debug!("Lookahead depth {depth} requested, evaluating one step");
    }

    let best = candidates(map, config).fold(None, |best, candidate| match best {
        Some(best) if !candidate.beats(&best) => Some(best),
        _ => Some(candidate),
    })?;

    if best.action.is_reveal() {
        Some(best)
    } else {
        resolve_flag_tie(map, config)
    }
}
