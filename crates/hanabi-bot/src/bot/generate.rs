//! Candidate enumeration for one decision cycle.
//!
//! Candidates are transient: rebuilt from the session every turn and
//! discarded after selection.

use hanabi_core::belief::BeliefCell;
use hanabi_core::classify::{Tier, TierGrid};
use hanabi_core::game::session::AgentSession;
use hanabi_core::model::card::Card;
use hanabi_core::model::hint::Hint;

/// Mass close enough to 0 or 1 to count as settled.
const CHANCE_EPS: f64 = 1e-9;

/// One identity a hidden card might have, with its belief mass and
/// whether losing it would cost points permanently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hypothesis {
    pub card: Card,
    pub chance: f64,
    pub critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMove {
    Play,
    Discard,
}

/// All same-kind hypotheses for one hand slot, merged into a single
/// candidate whose chances sum to at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCandidate {
    pub slot: usize,
    pub move_kind: SlotMove,
    pub hypotheses: Vec<Hypothesis>,
}

impl SlotCandidate {
    pub fn covers(&self, card: Card) -> bool {
        self.hypotheses.iter().any(|hyp| hyp.card == card)
    }

    pub fn total_chance(&self) -> f64 {
        self.hypotheses.iter().map(|hyp| hyp.chance).sum()
    }
}

/// One teammate card a hint would touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HintedCard {
    pub card: Card,
    pub critical: bool,
    pub playable: bool,
}

/// A hint to one player; every card matching the target is affected at
/// once, so candidates sharing (player, hint) merge.
#[derive(Debug, Clone, PartialEq)]
pub struct HintCandidate {
    pub player: String,
    pub hint: Hint,
    pub affected: Vec<HintedCard>,
}

/// Play and discard candidates from the agent's own hand. Play draws on
/// playable-tier hypotheses, discard on plainly discardable ones.
pub fn slot_candidates(session: &AgentSession) -> Vec<SlotCandidate> {
    let grid = session.grid();
    let mut out = Vec::new();
    for (slot, cell) in session.hand().iter().enumerate() {
        let mut play = Vec::new();
        let mut discard = Vec::new();
        for (card, chance) in cell.hypotheses() {
            let tier = grid.tier(card);
            if tier.is_playable() {
                play.push(Hypothesis {
                    card,
                    chance,
                    critical: tier.is_critical(),
                });
            } else if tier == Tier::Discardable {
                discard.push(Hypothesis {
                    card,
                    chance,
                    critical: false,
                });
            }
        }
        if !play.is_empty() {
            out.push(SlotCandidate {
                slot,
                move_kind: SlotMove::Play,
                hypotheses: play,
            });
        }
        if !discard.is_empty() {
            out.push(SlotCandidate {
                slot,
                move_kind: SlotMove::Discard,
                hypotheses: discard,
            });
        }
    }
    out
}

/// Last-resort discards: every hypothesis of every slot, flagged critical
/// across the board. Used only when nothing else is on the table; a
/// non-empty hand always yields at least one candidate.
pub fn fallback_discards(session: &AgentSession) -> Vec<SlotCandidate> {
    session
        .hand()
        .iter()
        .enumerate()
        .filter_map(|(slot, cell)| {
            let hypotheses: Vec<Hypothesis> = cell
                .hypotheses()
                .map(|(card, chance)| Hypothesis {
                    card,
                    chance,
                    critical: true,
                })
                .collect();
            (!hypotheses.is_empty()).then_some(SlotCandidate {
                slot,
                move_kind: SlotMove::Discard,
                hypotheses,
            })
        })
        .collect()
}

/// Hints worth sending, highest-stakes tiers first: cards whose loss is
/// permanent, then playable ones. Plainly discardable cards are offered
/// only when neither of those produced anything.
pub fn hint_candidates(session: &AgentSession) -> Vec<HintCandidate> {
    let mut out = Vec::new();
    collect_hints(session, Tier::is_critical, &mut out);
    collect_hints(session, |tier| tier == Tier::Playable, &mut out);
    if out.is_empty() {
        collect_hints(session, |tier| tier == Tier::Discardable, &mut out);
    }
    out
}

fn collect_hints(
    session: &AgentSession,
    wanted: impl Fn(Tier) -> bool,
    out: &mut Vec<HintCandidate>,
) {
    let grid = session.grid();
    for teammate in session.teammates() {
        for slot in teammate.slots() {
            let Some(card) = slot.known() else {
                // A draw still awaiting reconciliation; nothing to point at.
                continue;
            };
            let tier = grid.tier(card);
            if !wanted(tier) {
                continue;
            }
            let belief = slot.belief();
            if !axis_open(belief.chance(card)) {
                continue;
            }
            if !spans_multiple_tiers(belief, grid) {
                continue;
            }

            let hint = if belief.value().is_none() && axis_open(belief.value_mass(card.value)) {
                Hint::Value(card.value)
            } else if belief.color().is_none() && axis_open(belief.color_mass(card.color)) {
                Hint::Color(card.color)
            } else {
                continue;
            };

            let hinted = HintedCard {
                card,
                critical: tier.is_critical(),
                playable: tier.is_playable(),
            };
            match out
                .iter_mut()
                .find(|candidate| candidate.player == teammate.name() && candidate.hint == hint)
            {
                Some(candidate) => candidate.affected.push(hinted),
                None => out.push(HintCandidate {
                    player: teammate.name().to_string(),
                    hint,
                    affected: vec![hinted],
                }),
            }
        }
    }
}

/// A hint only narrows anything if the card's live hypotheses disagree on
/// how much the card matters.
fn spans_multiple_tiers(belief: &BeliefCell, grid: &TierGrid) -> bool {
    let mut seen: Option<Tier> = None;
    for (card, _) in belief.hypotheses() {
        let tier = grid.tier(card);
        match seen {
            None => seen = Some(tier),
            Some(first) if first != tier => return true,
            _ => {}
        }
    }
    false
}

fn axis_open(mass: f64) -> bool {
    mass > CHANCE_EPS && mass < 1.0 - CHANCE_EPS
}
