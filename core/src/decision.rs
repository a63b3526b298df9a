use alloc::vec::Vec;

use hashbrown::HashSet;

use crate::*;

/// Runs one decision step at a time over a caller-owned board.
///
/// The engine holds nothing but its configuration: every call re-derives constraints,
/// forced moves and probabilities from the snapshot it is given.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DecisionEngine {
    config: EngineConfig,
}

impl DecisionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Every move the two certain rules allow on `grid`, in clue order.
    pub fn find_forced_moves<G: GridView + ?Sized>(&self, grid: &G) -> Result<Vec<Action>> {
        self.find_forced_moves_excluding(grid, &HashSet::new())
    }

    /// Like [`Self::find_forced_moves`], leaving out moves the caller already applied.
    pub fn find_forced_moves_excluding<G: GridView + ?Sized>(
        &self,
        grid: &G,
        applied: &HashSet<Action>,
    ) -> Result<Vec<Action>> {
        grid.validate()?;
        let set = extract_constraints(grid);
        Ok(deduce_forced_moves(&set.constraints, applied))
    }

    pub fn estimate_probabilities<G: GridView + ?Sized>(&self, grid: &G) -> Result<ProbabilityMap> {
        grid.validate()?;
        let set = extract_constraints(grid);
        Ok(estimate_probabilities_with(grid, &set, &self.config))
    }

    pub fn decide_next_action<G: GridView + ?Sized>(&self, grid: &G) -> Result<Option<Action>> {
        self.decide_with_depth(grid, 1)
    }

    /// Returns a forced move when one exists, and otherwise the best one-step guess.
    /// `None` means no hidden, unflagged cell is left.
    pub fn decide_with_depth<G: GridView + ?Sized>(
        &self,
        grid: &G,
        depth: usize,
    ) -> Result<Option<Action>> {
        grid.validate()?;
        let set = extract_constraints(grid);
        log::trace!("Constraint stats: {:?}", set.stats);

        if let Some(&forced) = deduce_forced_moves(&set.constraints, &HashSet::new()).first() {
            log::debug!("Forced move: {forced}");
            return Ok(Some(forced));
        }

        let probabilities = estimate_probabilities_with(grid, &set, &self.config);
        let chosen = choose_action(&probabilities, &self.config, depth);
        if let Some(scored) = chosen {
            log::debug!(
                "Best guess: {} (value {:.3}, {:?})",
                scored.action,
                scored.value,
                probabilities.estimate()
            );
        }
        Ok(chosen.map(|scored| scored.action))
    }
}

/// [`DecisionEngine::decide_next_action`] with the default configuration.
pub fn decide_next_action<G: GridView + ?Sized>(grid: &G) -> Result<Option<Action>> {
    DecisionEngine::default().decide_next_action(grid)
}

/// [`DecisionEngine::find_forced_moves`] with the default configuration.
pub fn find_forced_moves<G: GridView + ?Sized>(grid: &G) -> Result<Vec<Action>> {
    DecisionEngine::default().find_forced_moves(grid)
}

/// [`DecisionEngine::estimate_probabilities`] with the default configuration.
pub fn estimate_probabilities<G: GridView + ?Sized>(grid: &G) -> Result<ProbabilityMap> {
    DecisionEngine::default().estimate_probabilities(grid)
}
