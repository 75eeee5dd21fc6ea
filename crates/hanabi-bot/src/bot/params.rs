/// Tunables for the heuristic decision pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Candidates within this reward distance of the best stay in the
    /// final draw. Wider bands trade greed for variety.
    pub retain_band: f64,
    /// Flat bonus for a play backed by full certainty, so known-safe
    /// cards leave the hand quickly.
    pub certain_play_bonus: f64,
    /// Stand-in reward for a hint that protects nothing; negative so it
    /// only wins when nothing better exists.
    pub last_resort_hint_reward: f64,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            retain_band: 1.0,
            certain_play_bonus: 2.0,
            last_resort_hint_reward: -0.3,
        }
    }
}
