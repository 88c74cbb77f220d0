use std::str::FromStr;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::ALL_MOVES;
use crate::cubie::CubieCube;
use crate::moves::{invert_moves, is_redundant};
use crate::{error::Error, Move};

/// A scrambled cube together with the moves that produced it and the moves that undo them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scramble {
    pub state: CubieCube,
    pub moves: Vec<Move>,
    pub inverse: Vec<Move>,
}

impl From<Vec<Move>> for Scramble {
    fn from(moves: Vec<Move>) -> Self {
        Self {
            state: CubieCube::from(&moves),
            inverse: invert_moves(&moves),
            moves,
        }
    }
}

/// Scramble the solved cube with `size` random face turns.
///
/// No two successive turns are on the same face, and turns of opposite faces come in a fixed order.
/// The same `seed` always gives the same scramble, `None` draws from entropy.
pub fn scramble(size: usize, seed: Option<u64>) -> Scramble {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut moves: Vec<Move> = Vec::with_capacity(size);
    while moves.len() < size {
        let last = moves.last().copied();
        let candidates: Vec<Move> = ALL_MOVES
            .into_iter()
            .filter(|&m| !is_redundant(last, m))
            .collect();
        if let Some(&m) = candidates.choose(&mut rng) {
            moves.push(m);
        }
    }
    Scramble::from(moves)
}

pub fn scramble_from_str(s: &str) -> Result<Vec<Move>, Error> {
    s.split_whitespace()
        .map(|word| Move::from_str(word.trim()))
        .collect()
}

pub fn scramble_to_str(s: &[Move]) -> Result<String, Error> {
    let result: String = s
        .iter()
        .map(|m| m.to_string())
        .fold("".to_string(), |acc, x| format!("{} {}", acc, x));
    Ok(result.trim_start().to_string())
}

/// A random scramble of `length` moves.
pub fn gen_scramble(length: usize) -> Result<Vec<Move>, Error> {
    let scramble = scramble(length, None);
    scramble.state.verify()?;
    Ok(scramble.moves)
}
