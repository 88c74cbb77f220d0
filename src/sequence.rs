use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::cubie::{Corner, CubieCube, Edge};
use crate::moves::{invert_moves, Move};

/// Masked value of a position that holds a last layer piece.
pub const WILDCARD: u8 = 0xFF;

/// Canonical key of a cube state: for every position the piece and its orientation.
///
/// Corners are encoded `piece * 3 + twist`, edges `piece * 2 + flip`. With the wildcard mask the
/// positions holding last layer pieces read [WILDCARD], so states that only differ in the last layer
/// share a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature(pub [u8; N_CORNER + N_EDGE]);

impl Signature {
    pub fn new(cc: &CubieCube, wildcard: bool) -> Self {
        let mut sig = [0; N_CORNER + N_EDGE];
        for i in 0..N_CORNER {
            sig[i] = if wildcard && cc.cp[i] <= Corner::UBR {
                WILDCARD
            } else {
                cc.cp[i] as u8 * 3 + cc.co[i]
            };
        }
        for i in 0..N_EDGE {
            sig[N_CORNER + i] = if wildcard && cc.ep[i] <= Edge::UB {
                WILDCARD
            } else {
                cc.ep[i] as u8 * 2 + cc.eo[i]
            };
        }
        Self(sig)
    }
}

/// All states within a few face turns of solved.
///
/// * `shortest`: exact distance of every full state, used to spot move sequences with a shorter equivalent
/// * `patterns`: the first shortest sequence reaching each signature of the chosen mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceHash {
    pub wildcard: bool,
    pub depth: usize,
    shortest: HashMap<Signature, u8>,
    patterns: HashMap<Signature, Vec<Move>>,
}

/// Build the sequence hash at the default depth.
pub fn create_sequence_hash(wildcard: bool) -> SequenceHash {
    SequenceHash::new(wildcard, SEQUENCE_DEPTH)
}

impl SequenceHash {
    /// Breadth first enumeration of every state within `depth` moves of the solved cube.
    pub fn new(wildcard: bool, depth: usize) -> Self {
        info!("Creating sequence hash, depth {}, wildcard {}", depth, wildcard);
        let solved = CubieCube::default();
        let mut shortest = HashMap::from([(Signature::new(&solved, false), 0)]);
        let mut patterns = HashMap::from([(Signature::new(&solved, wildcard), Vec::new())]);
        let mut frontier: Vec<(CubieCube, Vec<Move>)> = vec![(solved, Vec::new())];

        for d in 1..=depth {
            let mut next = Vec::new();
            for (state, seq) in &frontier {
                for m in ALL_MOVES {
                    let child = state.apply_move(m);
                    let key = Signature::new(&child, false);
                    if shortest.contains_key(&key) {
                        continue;
                    }
                    shortest.insert(key, d as u8);
                    let mut child_seq = seq.clone();
                    child_seq.push(m);
                    patterns
                        .entry(Signature::new(&child, wildcard))
                        .or_insert_with(|| child_seq.clone());
                    next.push((child, child_seq));
                }
            }
            debug!(
                "depth {}: {} new states, {} states, {} patterns",
                d,
                next.len(),
                shortest.len(),
                patterns.len()
            );
            frontier = next;
        }

        info!(
            "Sequence hash done: {} states, {} patterns",
            shortest.len(),
            patterns.len()
        );
        Self {
            wildcard,
            depth,
            shortest,
            patterns,
        }
    }

    pub fn signature(&self, cc: &CubieCube) -> Signature {
        Signature::new(cc, self.wildcard)
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Number of distinct full states.
    pub fn state_count(&self) -> usize {
        self.shortest.len()
    }

    /// Exact distance of `cc` from solved, if within the hash depth.
    pub fn shortest_len(&self, cc: &CubieCube) -> Option<u8> {
        self.shortest.get(&Signature::new(cc, false)).copied()
    }

    /// A sequence of `len` moves whose net effect is `effect` can be replaced by a shorter one.
    pub fn is_redundant_suffix(&self, effect: &CubieCube, len: usize) -> bool {
        self.shortest_len(effect)
            .is_some_and(|shortest| (shortest as usize) < len)
    }

    /// The stored sequence that scrambles solved into a state with the signature of `cc`.
    pub fn lookup(&self, cc: &CubieCube) -> Option<&[Move]> {
        self.patterns.get(&self.signature(cc)).map(Vec::as_slice)
    }

    /// Moves that finish `cc`: Cross and F2L in wildcard mode, the whole cube otherwise.
    pub fn finisher(&self, cc: &CubieCube) -> Option<Vec<Move>> {
        self.lookup(cc).map(invert_moves)
    }

    /// Length of the finisher, if any.
    pub fn distance(&self, cc: &CubieCube) -> Option<u8> {
        self.lookup(cc).map(|seq| seq.len() as u8)
    }
}

#[cfg(test)]
mod test {
    use crate::moves::Move::*;
    use crate::scramble::scramble_from_str;
    use crate::sequence::*;

    #[test]
    fn test_counts() {
        let full = SequenceHash::new(false, 3);
        assert_eq!(full.state_count(), 3502);
        assert_eq!(full.len(), 3502);
        let wildcard = SequenceHash::new(true, 3);
        assert_eq!(wildcard.state_count(), 3502);
        assert_eq!(wildcard.len(), 2852);
        let shallow = SequenceHash::new(true, 1);
        assert_eq!(shallow.state_count(), 19);
        assert_eq!(shallow.len(), 16);
        let default = create_sequence_hash(false);
        assert_eq!(default.depth, 4);
        assert_eq!(default.state_count(), 46741);
    }

    #[test]
    fn test_finisher() {
        let hash = SequenceHash::new(false, 2);
        let solved = CubieCube::default();
        assert_eq!(hash.finisher(&solved), Some(vec![]));
        assert_eq!(hash.finisher(&solved.apply_move(R)), Some(vec![R3]));
        let state = solved.apply_moves(&[F, U2]);
        let finisher = hash.finisher(&state).unwrap();
        assert_eq!(finisher.len(), 2);
        assert!(state.apply_moves(&finisher).is_solved());
        assert_eq!(hash.distance(&solved.apply_moves(&[R, U, F])), None);
    }

    #[test]
    fn test_wildcard_finisher() {
        let hash = SequenceHash::new(true, 3);
        // U turns only move last layer pieces
        let solved = CubieCube::default();
        assert_eq!(hash.distance(&solved.apply_move(U)), Some(0));
        let moves = scramble_from_str("U2 R U' R'").unwrap();
        let state = solved.apply_moves(&moves);
        let finisher = hash.finisher(&state).unwrap();
        assert!(finisher.len() <= 3);
        assert!(state.apply_moves(&finisher).is_cross_f2l_solved());
    }

    #[test]
    fn test_redundant_suffix() {
        let hash = SequenceHash::new(true, 3);
        let solved = CubieCube::default();
        assert!(hash.is_redundant_suffix(&solved.apply_moves(&[R, R]), 2));
        assert!(hash.is_redundant_suffix(&solved.apply_moves(&[R, L, R3]), 3));
        assert!(!hash.is_redundant_suffix(&solved.apply_moves(&[R, U]), 2));
        assert!(!hash.is_redundant_suffix(&solved.apply_moves(&[R, U, F, D]), 4));
        assert_eq!(hash.shortest_len(&solved.apply_moves(&[R, U])), Some(2));
    }
}
