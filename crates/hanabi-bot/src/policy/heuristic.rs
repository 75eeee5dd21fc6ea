use super::Policy;
use crate::bot::{
    BotParams, CandidateError, ScoredCandidate, SlotMove, error_pressure, fallback_discards,
    hint_candidates, score_discard, score_hint, score_play, select, slot_candidates,
    token_scarcity,
};
use hanabi_core::game::events::Action;
use hanabi_core::game::session::AgentSession;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{Level, event};

/// The fixed heuristic policy: enumerate, score, prune, sample.
///
/// Everything up to the final sample is deterministic; the sample draws
/// from an owned seedable RNG so whole games replay bit-for-bit.
pub struct HeuristicPolicy {
    params: BotParams,
    rng: SmallRng,
}

impl HeuristicPolicy {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            params: BotParams::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn with_params(mut self, params: BotParams) -> Self {
        self.params = params;
        self
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for HeuristicPolicy {
    fn choose_action(&mut self, session: &AgentSession) -> Result<Action, CandidateError> {
        let scarcity = token_scarcity(session.hints_used());
        let pressure = error_pressure(session.errors_used());
        let grid = session.grid();

        let mut moves = slot_candidates(session);
        if session.hints_used() == 0 {
            // Every token is still on the table; discarding buys nothing.
            moves.retain(|candidate| candidate.move_kind == SlotMove::Play);
        }
        let hints = if session.hints_used() < 8 {
            hint_candidates(session)
        } else {
            Vec::new()
        };

        let forced = moves.is_empty() && hints.is_empty();
        if forced {
            moves = fallback_discards(session);
        }

        let mut pool = Vec::with_capacity(moves.len() + hints.len());
        for candidate in &moves {
            let cell = &session.hand()[candidate.slot];
            let (action, reward) = match candidate.move_kind {
                SlotMove::Play => (
                    Action::Play {
                        slot: candidate.slot,
                    },
                    score_play(candidate, cell, grid, scarcity, pressure, &self.params),
                ),
                SlotMove::Discard => (
                    Action::Discard {
                        slot: candidate.slot,
                    },
                    score_discard(candidate, cell, grid, scarcity),
                ),
            };
            pool.push(ScoredCandidate { action, reward });
        }
        for candidate in &hints {
            pool.push(ScoredCandidate {
                action: Action::Hint {
                    player: candidate.player.clone(),
                    hint: candidate.hint,
                },
                reward: score_hint(candidate, scarcity, &self.params),
            });
        }

        let pool_size = pool.len();
        let chosen = select(pool, &self.params, &mut self.rng)?;
        event!(
            target: "hanabi_bot::decide",
            Level::DEBUG,
            hints_used = session.hints_used(),
            errors_used = session.errors_used(),
            candidates = pool_size,
            forced,
            reward = chosen.reward,
            action = ?chosen.action,
        );
        Ok(chosen.action)
    }
}
