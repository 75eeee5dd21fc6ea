//! Reward model for candidate actions.
//!
//! Two pressure terms shape every reward: token scarcity `p`, which grows
//! as hint tokens run out, and error pressure `e`, which grows with each
//! misplay already on the table.

use super::generate::{HintCandidate, SlotCandidate};
use super::params::BotParams;
use hanabi_core::belief::BeliefCell;
use hanabi_core::classify::TierGrid;
use hanabi_core::game::events::Action;
use hanabi_core::model::card::Card;
use hanabi_core::model::color::Color;
use hanabi_core::model::value::Value;

const CHANCE_EPS: f64 = 1e-9;

/// A candidate bound to the action it would emit, with its reward.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub action: Action,
    pub reward: f64,
}

/// Hint-token scarcity: near zero while tokens are plentiful, climbing
/// steeply as they run out. The 8.5 knee keeps the curve finite at the
/// cap; with exactly one token left the pressure is doubled.
pub fn token_scarcity(hints_used: u8) -> f64 {
    let used = hints_used.min(8) as f64;
    let mut scarcity = 1.0 / (8.5 - used) - 1.0 / 8.5;
    if hints_used == 7 {
        scarcity *= 2.0;
    }
    scarcity
}

/// Misplay pressure: 3^errors + 1, so a gamble that was cheap at zero
/// errors is ruinous at two.
pub fn error_pressure(errors_used: u8) -> f64 {
    3.0_f64.powi(errors_used as i32) + 1.0
}

/// Reward for playing a slot: expected success (fives also recover a
/// token), minus the points at stake on critical identities the candidate
/// does not cover, minus the misplay risk on the uncovered mass.
pub fn score_play(
    candidate: &SlotCandidate,
    cell: &BeliefCell,
    grid: &TierGrid,
    scarcity: f64,
    pressure: f64,
    params: &BotParams,
) -> f64 {
    let mut reward = 0.0;
    for hyp in &candidate.hypotheses {
        let bonus = if hyp.card.is_five() {
            1.0 + scarcity
        } else {
            1.0
        };
        reward += hyp.chance * bonus;
    }

    let covered = candidate.total_chance();
    reward -= uncovered_loss(candidate, cell, grid);
    reward -= (1.0 - covered) * pressure;
    if covered >= 1.0 - CHANCE_EPS {
        reward += params.certain_play_bonus;
    }
    reward
}

/// Reward for discarding a slot. Critical hypotheses charge the points
/// they would forfeit; safe ones earn the token-recovery value.
pub fn score_discard(
    candidate: &SlotCandidate,
    cell: &BeliefCell,
    grid: &TierGrid,
    scarcity: f64,
) -> f64 {
    let mut reward = 0.0;
    for hyp in &candidate.hypotheses {
        if hyp.critical {
            reward += (scarcity - (8.0 - hyp.card.value.number() as f64)) * hyp.chance;
        } else {
            reward += scarcity * hyp.chance;
        }
    }
    reward - uncovered_loss(candidate, cell, grid)
}

/// Reward for a hint: points protected on critical cards plus a bonus per
/// playable card, against the cost of the spent token. A hint that
/// protects nothing falls back to a fixed small penalty so it stays a
/// last resort.
pub fn score_hint(candidate: &HintCandidate, scarcity: f64, params: &BotParams) -> f64 {
    let mut saved = 0.0;
    for hinted in &candidate.affected {
        if hinted.critical {
            saved += 6.0 - hinted.card.value.number() as f64;
        }
        if hinted.playable {
            saved += 1.0
                + if hinted.card.is_five() {
                    scarcity
                } else {
                    0.0
                };
        }
    }
    if saved == 0.0 {
        saved = params.last_resort_hint_reward;
    }
    saved - scarcity
}

/// Points surely lost if the slot turns out to be a critical identity the
/// candidate's hypotheses do not account for.
fn uncovered_loss(candidate: &SlotCandidate, cell: &BeliefCell, grid: &TierGrid) -> f64 {
    let mut loss = 0.0;
    for value in Value::ORDERED {
        for color in Color::ALL {
            let card = Card::new(value, color);
            if candidate.covers(card) {
                continue;
            }
            if !grid.tier(card).is_critical() {
                continue;
            }
            let mass = cell.chance(card);
            if mass > 0.0 {
                loss += (6.0 - value.number() as f64) * mass;
            }
        }
    }
    loss
}

#[cfg(test)]
mod tests {
    use super::super::generate::{Hypothesis, SlotCandidate, SlotMove};
    use super::super::generate::{HintCandidate, HintedCard};
    use super::*;
    use hanabi_core::belief::{BeliefCell, DeckCounts};
    use hanabi_core::classify::TierGrid;
    use hanabi_core::model::fireworks::Fireworks;
    use hanabi_core::model::hint::Hint;

    fn card(value: Value, color: Color) -> Card {
        Card::new(value, color)
    }

    #[test]
    fn scarcity_grows_with_spent_tokens() {
        assert_eq!(token_scarcity(0), 0.0);
        assert!(token_scarcity(4) > token_scarcity(1));
        // One token left doubles the pressure past the raw curve.
        let raw_at_seven = 1.0 / 1.5 - 1.0 / 8.5;
        assert!((token_scarcity(7) - raw_at_seven * 2.0).abs() < 1e-12);
        assert!(token_scarcity(7) > token_scarcity(6));
    }

    #[test]
    fn error_pressure_is_exponential() {
        assert_eq!(error_pressure(0), 2.0);
        assert_eq!(error_pressure(1), 4.0);
        assert_eq!(error_pressure(2), 10.0);
    }

    #[test]
    fn certain_play_earns_the_flat_bonus() {
        let counts = DeckCounts::full();
        let grid = TierGrid::compute(&Fireworks::new(), &counts);
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::One), true, &counts).unwrap();
        cell.apply_hint(Hint::Color(Color::Red), true, &counts).unwrap();

        let candidate = SlotCandidate {
            slot: 0,
            move_kind: SlotMove::Play,
            hypotheses: vec![Hypothesis {
                card: card(Value::One, Color::Red),
                chance: 1.0,
                critical: false,
            }],
        };
        let reward = score_play(
            &candidate,
            &cell,
            &grid,
            0.0,
            error_pressure(0),
            &BotParams::default(),
        );
        // Full certainty: 1.0 success, no uncovered mass, no risk term,
        // plus the flat bonus.
        assert!((reward - 3.0).abs() < 1e-9);
    }

    #[test]
    fn uncertain_play_pays_for_uncovered_criticals() {
        let counts = DeckCounts::full();
        let grid = TierGrid::compute(&Fireworks::new(), &counts);
        let cell = BeliefCell::prior(&counts).unwrap();

        // Only the red one is claimed; every five (critical, mass 1/50
        // each) stays uncovered and charges 1 point of expected loss.
        let chance = cell.chance(card(Value::One, Color::Red));
        let candidate = SlotCandidate {
            slot: 0,
            move_kind: SlotMove::Play,
            hypotheses: vec![Hypothesis {
                card: card(Value::One, Color::Red),
                chance,
                critical: false,
            }],
        };
        let reward = score_play(&candidate, &cell, &grid, 0.0, error_pressure(0), &BotParams::default());

        let uncovered_fives = 5.0 * (6.0 - 5.0) * (1.0 / 50.0);
        let expected = chance - uncovered_fives - (1.0 - chance) * 2.0;
        assert!((reward - expected).abs() < 1e-9);
    }

    #[test]
    fn discarding_a_known_critical_is_heavily_punished() {
        let mut counts = DeckCounts::full();
        let five = card(Value::Five, Color::Green);
        let grid = TierGrid::compute(&Fireworks::new(), &counts);
        let mut cell = BeliefCell::prior(&counts).unwrap();
        cell.apply_hint(Hint::Value(Value::Five), true, &counts).unwrap();
        cell.apply_hint(Hint::Color(Color::Green), true, &counts).unwrap();
        counts.take(five).unwrap();

        let candidate = SlotCandidate {
            slot: 0,
            move_kind: SlotMove::Discard,
            hypotheses: vec![Hypothesis {
                card: five,
                chance: 1.0,
                critical: true,
            }],
        };
        let scarcity = token_scarcity(4);
        let reward = score_discard(&candidate, &cell, &grid, scarcity);
        assert!((reward - (scarcity - 3.0)).abs() < 1e-9);
        assert!(reward < 0.0);
    }

    #[test]
    fn safe_discard_tracks_token_recovery_value() {
        let counts = DeckCounts::full();
        let grid = TierGrid::compute(&Fireworks::new(), &counts);
        let cell = BeliefCell::prior(&counts).unwrap();

        let two = card(Value::Two, Color::Red);
        let candidate = SlotCandidate {
            slot: 0,
            move_kind: SlotMove::Discard,
            hypotheses: vec![Hypothesis {
                card: two,
                chance: cell.chance(two),
                critical: false,
            }],
        };
        let low = score_discard(&candidate, &cell, &grid, token_scarcity(1));
        let high = score_discard(&candidate, &cell, &grid, token_scarcity(7));
        assert!(high > low);
    }

    #[test]
    fn hint_rewards_protection_over_noise() {
        let params = BotParams::default();
        let protective = HintCandidate {
            player: "east".to_string(),
            hint: Hint::Value(Value::Five),
            affected: vec![HintedCard {
                card: card(Value::Five, Color::Red),
                critical: true,
                playable: false,
            }],
        };
        let idle = HintCandidate {
            player: "east".to_string(),
            hint: Hint::Value(Value::Two),
            affected: vec![HintedCard {
                card: card(Value::Two, Color::Red),
                critical: false,
                playable: false,
            }],
        };

        let scarcity = token_scarcity(2);
        assert!((score_hint(&protective, scarcity, &params) - (1.0 - scarcity)).abs() < 1e-9);
        assert!(
            (score_hint(&idle, scarcity, &params)
                - (params.last_resort_hint_reward - scarcity))
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn playable_five_hint_includes_scarcity_kicker() {
        let params = BotParams::default();
        let candidate = HintCandidate {
            player: "east".to_string(),
            hint: Hint::Value(Value::Five),
            affected: vec![HintedCard {
                card: card(Value::Five, Color::Red),
                critical: true,
                playable: true,
            }],
        };
        let scarcity = token_scarcity(5);
        let expected = (6.0 - 5.0) + (1.0 + scarcity) - scarcity;
        assert!((score_hint(&candidate, scarcity, &params) - expected).abs() < 1e-9);
    }
}
