//! Deterministic self-play referee.
//!
//! The referee owns the real deck and hands, feeds each agent its own
//! per-observer event stream in a single serialized loop, applies the
//! chosen actions and scores the game. It stands in for the network
//! server so the whole engine is exercised end to end in-process.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use hanabi_bot::{CandidateError, HeuristicPolicy, Policy};
use hanabi_core::game::events::{Action, GameEvent, PlayOutcome, PlayerSync, VisibleHand};
use hanabi_core::game::session::{AgentSession, SessionError};
use hanabi_core::model::card::Card;
use hanabi_core::model::deck::Deck;
use hanabi_core::model::fireworks::Fireworks;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

const MAX_ERRORS: u8 = 3;
const MAX_HINT_TOKENS: u8 = 8;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("agent state diverged: {0}")]
    Session(#[from] SessionError),
    #[error("decision failed: {0}")]
    Decision(#[from] CandidateError),
    #[error("agent {player} chose an impossible action: {detail}")]
    InvalidAction { player: String, detail: String },
    #[error("table size {0} is out of range (2-5 players)")]
    BadTableSize(usize),
}

#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub players: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub seed: u64,
    pub players: usize,
    pub score: u8,
    pub turns: u32,
    pub misplays: u8,
    pub hints_given: u32,
    pub discards: u32,
}

struct Table {
    names: Vec<String>,
    hands: Vec<Vec<Card>>,
    deck: Deck,
    stacks: Fireworks,
    hints_used: u8,
    errors_used: u8,
}

pub fn run_game(config: &GameConfig) -> Result<GameSummary, SimError> {
    if !(2..=5).contains(&config.players) {
        return Err(SimError::BadTableSize(config.players));
    }

    let mut table = deal_table(config);
    let mut sessions: Vec<AgentSession> = table
        .names
        .iter()
        .map(|name| AgentSession::new(name.clone()))
        .collect();
    let mut policies: Vec<HeuristicPolicy> = (0..config.players)
        .map(|seat| HeuristicPolicy::with_seed(config.seed.wrapping_add(seat as u64 + 1)))
        .collect();

    for (observer, session) in sessions.iter_mut().enumerate() {
        let hands = table
            .names
            .iter()
            .enumerate()
            .filter(|(seat, _)| *seat != observer)
            .map(|(seat, name)| VisibleHand {
                player: name.clone(),
                cards: table.hands[seat].clone(),
            })
            .collect();
        session.apply(&GameEvent::HandsRevealed { hands })?;
    }

    let mut turns = 0u32;
    let mut misplays = 0u8;
    let mut hints_given = 0u32;
    let mut discards = 0u32;
    let mut last_drawn: Option<(usize, Card)> = None;
    let mut final_turns: Option<usize> = None;

    loop {
        if table.errors_used >= MAX_ERRORS || table.stacks.is_complete() {
            break;
        }
        if final_turns == Some(0) {
            break;
        }

        let current = (turns as usize) % config.players;
        broadcast_sync(&table, &mut sessions, current, last_drawn.take())?;
        debug_assert!(sessions[current].is_my_turn());

        let action = policies[current].choose_action(&sessions[current])?;
        debug!(
            target: "hanabi_bench::turn",
            turn = turns,
            player = %table.names[current],
            action = ?action,
            score = table.stacks.score(),
        );

        match action {
            Action::Play { slot } => {
                let card = remove_card(&mut table, current, slot)?;
                let outcome = if table.stacks.raise(card) {
                    if card.is_five() && table.hints_used > 0 {
                        // A completed five refunds a hint token.
                        table.hints_used -= 1;
                    }
                    PlayOutcome::Played
                } else {
                    table.errors_used += 1;
                    misplays += 1;
                    PlayOutcome::Misplayed
                };
                broadcast(
                    &mut sessions,
                    &GameEvent::ActionResolved {
                        actor: table.names[current].clone(),
                        card,
                        slot,
                        outcome,
                    },
                )?;
                last_drawn = draw_for(&mut table, current);
            }
            Action::Discard { slot } => {
                let card = remove_card(&mut table, current, slot)?;
                if table.hints_used > 0 {
                    table.hints_used -= 1;
                }
                discards += 1;
                broadcast(
                    &mut sessions,
                    &GameEvent::ActionResolved {
                        actor: table.names[current].clone(),
                        card,
                        slot,
                        outcome: PlayOutcome::Discarded,
                    },
                )?;
                last_drawn = draw_for(&mut table, current);
            }
            Action::Hint { ref player, hint } => {
                let target = table
                    .names
                    .iter()
                    .position(|name| name == player)
                    .filter(|seat| *seat != current)
                    .ok_or_else(|| SimError::InvalidAction {
                        player: table.names[current].clone(),
                        detail: format!("hint aimed at {player}"),
                    })?;
                if table.hints_used >= MAX_HINT_TOKENS {
                    return Err(SimError::InvalidAction {
                        player: table.names[current].clone(),
                        detail: "hint with no token available".to_string(),
                    });
                }
                let touched: Vec<usize> = table.hands[target]
                    .iter()
                    .enumerate()
                    .filter(|(_, card)| hint.matches(**card))
                    .map(|(index, _)| index)
                    .collect();
                if touched.is_empty() {
                    return Err(SimError::InvalidAction {
                        player: table.names[current].clone(),
                        detail: format!("hint {hint} touches nothing"),
                    });
                }
                table.hints_used += 1;
                hints_given += 1;
                broadcast(
                    &mut sessions,
                    &GameEvent::HintGiven {
                        source: table.names[current].clone(),
                        destination: player.clone(),
                        hint,
                        touched,
                    },
                )?;
            }
        }

        turns += 1;
        if let Some(remaining) = final_turns.as_mut() {
            *remaining -= 1;
        } else if table.deck.is_empty() {
            // Last card drawn (or none left to draw): everyone gets one
            // closing turn.
            final_turns = Some(config.players);
        }
    }

    Ok(GameSummary {
        seed: config.seed,
        players: config.players,
        score: table.stacks.score(),
        turns,
        misplays,
        hints_given,
        discards,
    })
}

pub fn write_jsonl(path: &Path, rows: &[GameSummary]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("creating results file at {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn deal_table(config: &GameConfig) -> Table {
    let mut deck = Deck::shuffled_with_seed(config.seed);
    let names: Vec<String> = (0..config.players)
        .map(|seat| format!("player-{seat}"))
        .collect();
    let hand_size = if config.players > 3 { 4 } else { 5 };
    let hands: Vec<Vec<Card>> = (0..config.players)
        .map(|_| {
            (0..hand_size)
                .map(|_| deck.draw().expect("a fresh deck covers every opening hand"))
                .collect()
        })
        .collect();

    Table {
        names,
        hands,
        deck,
        stacks: Fireworks::new(),
        hints_used: 0,
        errors_used: 0,
    }
}

fn broadcast_sync(
    table: &Table,
    sessions: &mut [AgentSession],
    current: usize,
    last_drawn: Option<(usize, Card)>,
) -> Result<(), SimError> {
    for (observer, session) in sessions.iter_mut().enumerate() {
        let players = table
            .names
            .iter()
            .enumerate()
            .map(|(seat, name)| PlayerSync {
                player: name.clone(),
                hand_size: table.hands[seat].len(),
                drawn: last_drawn.and_then(|(drawer, card)| {
                    // The drawer never sees its own new card.
                    (drawer == seat && observer != seat).then_some(card)
                }),
            })
            .collect();
        session.apply(&GameEvent::StateSync {
            hints_used: table.hints_used,
            errors_used: table.errors_used,
            current_player: table.names[current].clone(),
            players,
        })?;
    }
    Ok(())
}

fn broadcast(sessions: &mut [AgentSession], event: &GameEvent) -> Result<(), SimError> {
    for session in sessions.iter_mut() {
        session.apply(event)?;
    }
    Ok(())
}

fn remove_card(table: &mut Table, seat: usize, slot: usize) -> Result<Card, SimError> {
    if slot >= table.hands[seat].len() {
        return Err(SimError::InvalidAction {
            player: table.names[seat].clone(),
            detail: format!("slot {slot} out of a {}-card hand", table.hands[seat].len()),
        });
    }
    Ok(table.hands[seat].remove(slot))
}

fn draw_for(table: &mut Table, seat: usize) -> Option<(usize, Card)> {
    let card = table.deck.draw()?;
    table.hands[seat].push(card);
    Some((seat, card))
}
