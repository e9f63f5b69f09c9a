//! The battle's single seeded random stream.
//!
//! Every logical draw consumes exactly one 32-bit word, so the stream position is
//! just the draw counter. Restoring `(seed, draws)` reproduces every later draw.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Serialized form of the RNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
    /// Present only for scripted test streams.
    pub script: Option<Vec<u32>>,
}

#[derive(Debug, Clone)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<u32> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RngState", into = "RngState")]
pub struct BattleRng {
    seed: u64,
    draws: u64,
    source: Source,
}

impl BattleRng {
    /// Value a scripted stream returns once its script runs out. It keeps the
    /// common rolls neutral: no crit, no secondary effect, maximum damage roll.
    pub const NEUTRAL: u32 = 49;

    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            draws: 0,
            source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)),
        }
    }

    /// A stream that returns `values` in order, each clamped into the requested
    /// range, then [`BattleRng::NEUTRAL`] forever.
    pub fn scripted(values: Vec<u32>) -> Self {
        Self {
            seed: 0,
            draws: 0,
            source: Source::Scripted { values },
        }
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> RngState {
        RngState {
            seed: self.seed,
            draws: self.draws,
            script: match &self.source {
                Source::Seeded(_) => None,
                Source::Scripted { values } => Some(values.clone()),
            },
        }
    }

    /// Uniform integer in `[0, bound)`. Always consumes one draw.
    pub fn next_int(&mut self, bound: u32, reason: &str) -> u32 {
        let value = match &mut self.source {
            Source::Seeded(rng) => {
                let word = rng.next_u32();
                ((word as u64 * bound as u64) >> 32) as u32
            }
            Source::Scripted { values } => {
                let raw = values.get(self.draws as usize).copied().unwrap_or(Self::NEUTRAL);
                raw.min(bound.saturating_sub(1))
            }
        };
        trace!(draw = self.draws, bound, value, reason, "rng draw");
        self.draws += 1;
        value
    }

    /// Percentile roll in `1..=100`.
    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        (self.next_int(100, reason) + 1) as u8
    }

    /// `true` with `percent`% probability. Certain outcomes do not draw.
    pub fn chance(&mut self, percent: u8, reason: &str) -> bool {
        if percent >= 100 {
            return true;
        }
        if percent == 0 {
            return false;
        }
        self.next_int(100, reason) < percent as u32
    }
}

impl From<RngState> for BattleRng {
    fn from(state: RngState) -> Self {
        match state.script {
            Some(values) => Self {
                seed: state.seed,
                draws: state.draws,
                source: Source::Scripted { values },
            },
            None => {
                let mut rng = ChaCha8Rng::seed_from_u64(state.seed);
                rng.set_word_pos(state.draws as u128);
                Self {
                    seed: state.seed,
                    draws: state.draws,
                    source: Source::Seeded(rng),
                }
            }
        }
    }
}

impl From<BattleRng> for RngState {
    fn from(rng: BattleRng) -> Self {
        rng.state()
    }
}
