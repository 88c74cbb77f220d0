use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::facelet::{Color, FaceCube};
use crate::moves::{invert_moves, Move, Move::*};

/// The last layer step a cube is in once Cross and F2L are solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Some U layer piece does not show U on top.
    Oll,
    /// The U layer is oriented, its pieces still have to be permuted.
    Pll,
}

impl Stage {
    pub fn of(cc: &CubieCube) -> Self {
        if cc.is_oll_solved() {
            Stage::Pll
        } else {
            Stage::Oll
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Oll => write!(f, "OLL"),
            Stage::Pll => write!(f, "PLL"),
        }
    }
}

/// A named last layer case and the algorithm solving it.
///
/// `signatures[k]` is the signature of the case after `k` U turns, so one entry recognises the case
/// under every pre-AUF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastLayerPattern {
    pub name: &'static str,
    pub stage: Stage,
    pub moves: &'static [Move],
    pub signatures: [u32; 4],
}

impl LastLayerPattern {
    fn new(name: &'static str, stage: Stage, moves: &'static [Move]) -> Self {
        let mut case = CubieCube::default().apply_moves(&invert_moves(moves));
        let mut signatures = [0; 4];
        for sig in signatures.iter_mut() {
            *sig = signature(stage, &case);
            case = case.apply_move(U);
        }
        Self {
            name,
            stage,
            moves,
            signatures,
        }
    }
}

/// A pattern recognised on a cube, and the U turn lining the cube up with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch {
    pub pattern: &'static LastLayerPattern,
    pub pre_auf: Option<Move>,
}

impl PatternMatch {
    /// The pre-AUF followed by the algorithm.
    pub fn moves(&self) -> Vec<Move> {
        self.pre_auf
            .into_iter()
            .chain(self.pattern.moves.iter().copied())
            .collect()
    }
}

/// Which of the 20 U layer stickers off the center show the U color, one bit each.
pub fn oll_signature(fc: &FaceCube) -> u32 {
    LAST_LAYER_FACELET
        .iter()
        .enumerate()
        .filter(|&(_, &p)| fc.f[p as usize] == Color::U)
        .fold(0, |sig, (i, _)| sig | 1 << i)
}

/// The 12 side stickers of the U layer as colors relative to the first one, two bits each.
///
/// Colors count around the cube F, L, B, R. A U or D sticker on the side gives `u32::MAX`, which no
/// pattern carries.
pub fn pll_signature(fc: &FaceCube) -> u32 {
    let order = |c: Color| match c {
        Color::F => Some(0),
        Color::L => Some(1),
        Color::B => Some(2),
        Color::R => Some(3),
        Color::U | Color::D => None,
    };
    let mut sig = 0;
    let mut base = 0;
    for (i, &p) in LAST_LAYER_SIDE_FACELET.iter().enumerate() {
        let Some(o) = order(fc.f[p as usize]) else {
            return u32::MAX;
        };
        if i == 0 {
            base = o;
        }
        sig |= ((o + 4 - base) % 4) << (2 * i);
    }
    sig
}

fn signature(stage: Stage, cc: &CubieCube) -> u32 {
    let fc = FaceCube::from(cc);
    match stage {
        Stage::Oll => oll_signature(&fc),
        Stage::Pll => pll_signature(&fc),
    }
}

const OLL_ALGORITHMS: [(&str, &[Move]); 57] = [
    ("OLL 1", &[R, U2, R2, F, R, F3, U2, R3, F, R, F3]),
    ("OLL 2", &[F, R, U, R3, U3, F3, B, U, L, U3, L3, B3]),
    ("OLL 3", &[B, U, L, U3, L3, B3, U3, F, R, U, R3, U3, F3]),
    ("OLL 4", &[B, U, L, U3, L3, B3, U, F, R, U, R3, U3, F3]),
    ("OLL 5", &[L3, B2, R, B, R3, B, L]),
    ("OLL 6", &[L, F2, R3, F3, R, F3, L3]),
    ("OLL 7", &[L, F, R3, F, R, F2, L3]),
    ("OLL 8", &[R3, F3, L, F3, L3, F2, R]),
    ("OLL 9", &[R, U, R3, U3, R3, F, R2, U, R3, U3, F3]),
    ("OLL 10", &[R, U, R3, U, R3, F, R, F3, R, U2, R3]),
    ("OLL 11", &[L, F, R3, F, R3, D, R, D3, R, F2, L3]),
    ("OLL 12", &[R3, L, R3, F3, R, F3, R3, F2, R, F3, R, L3]),
    ("OLL 13", &[F, U, R, U3, R2, F3, R, U, R, U3, R3]),
    ("OLL 14", &[R3, F, R, U, R3, F3, R, F, U3, F3]),
    ("OLL 15", &[L3, B3, L, R3, U3, R, U, L3, B, L]),
    ("OLL 16", &[L, F, L3, R, U, R3, U3, L, F3, L3]),
    ("OLL 17", &[R, U, R3, U, R3, F, R, F3, U2, R3, F, R, F3]),
    ("OLL 18", &[L, F, R3, F, R, F2, L2, B3, R, B3, R3, B2, L]),
    ("OLL 19", &[L3, R, B, R, B, R3, B3, R3, L, R3, F, R, F3]),
    ("OLL 20", &[L, F, R3, F3, R2, L2, B, R, B3, R3, B3, R3, L]),
    ("OLL 21", &[R, U2, R3, U3, R, U, R3, U3, R, U3, R3]),
    ("OLL 22", &[R, U2, R2, U3, R2, U3, R2, U2, R]),
    ("OLL 23", &[R2, D3, R, U2, R3, D, R, U2, R]),
    ("OLL 24", &[L, F, R3, F3, L3, F, R, F3]),
    ("OLL 25", &[F3, L, F, R3, F3, L3, F, R]),
    ("OLL 26", &[R, U2, R3, U3, R, U3, R3]),
    ("OLL 27", &[R, U, R3, U, R, U2, R3]),
    ("OLL 28", &[L, F, R3, F3, L3, R, U, R, U3, R3]),
    ("OLL 29", &[R, U, R3, U3, R, U3, R3, F3, U3, F, R, U, R3]),
    ("OLL 30", &[F, R3, F, R2, U3, R3, U3, R, U, R3, F2]),
    ("OLL 31", &[R3, U3, F, U, R, U3, R3, F3, R]),
    ("OLL 32", &[L, U, F3, U3, L3, U, L, F, L3]),
    ("OLL 33", &[R, U, R3, U3, R3, F, R, F3]),
    ("OLL 34", &[R, U, R2, U3, R3, F, R, U, R, U3, F3]),
    ("OLL 35", &[R, U2, R2, F, R, F3, R, U2, R3]),
    ("OLL 36", &[L3, U3, L, U3, L3, U, L, U, L, F3, L3, F]),
    ("OLL 37", &[F, R3, F3, R, U, R, U3, R3]),
    ("OLL 38", &[R, U, R3, U, R, U3, R3, U3, R3, F, R, F3]),
    ("OLL 39", &[L, F3, L3, U3, L, U, F, U3, L3]),
    ("OLL 40", &[R3, F, R, U, R3, U3, F3, U, R]),
    ("OLL 41", &[R, U, R3, U, R, U2, R3, F, R, U, R3, U3, F3]),
    ("OLL 42", &[R3, U3, R, U3, R3, U2, R, F, R, U, R3, U3, F3]),
    ("OLL 43", &[F3, U3, L3, U, L, F]),
    ("OLL 44", &[F, U, R, U3, R3, F3]),
    ("OLL 45", &[F, R, U, R3, U3, F3]),
    ("OLL 46", &[R3, U3, R3, F, R, F3, U, R]),
    ("OLL 47", &[R3, U3, R3, F, R, F3, R3, F, R, F3, U, R]),
    ("OLL 48", &[F, R, U, R3, U3, R, U, R3, U3, F3]),
    ("OLL 49", &[L, F3, L2, B, L2, F, L2, B3, L]),
    ("OLL 50", &[L3, B, L2, F3, L2, B3, L2, F, L3]),
    ("OLL 51", &[F, U, R, U3, R3, U, R, U3, R3, F3]),
    ("OLL 52", &[R, U, R3, U, R, U3, B, U3, B3, R3]),
    ("OLL 53", &[R3, F2, L, F, L3, F3, L, F, L3, F, R]),
    ("OLL 54", &[L, F2, R3, F3, R, F, R3, F3, R, F3, L3]),
    ("OLL 55", &[R3, F, R, U, R, U3, R2, F3, R2, U3, R3, U, R, U, R3]),
    ("OLL 56", &[L3, B3, L, U3, R3, U, R, U3, R3, U, R, L3, B, L]),
    ("OLL 57", &[R, U, R3, U3, R3, L, F, R, F3, L3]),
];

const PLL_ALGORITHMS: [(&str, &[Move]); 21] = [
    ("Aa", &[R3, F, R3, B2, R, F3, R3, B2, R2]),
    ("Ab", &[R2, B2, R, F, R3, B2, R, F3, R]),
    ("E", &[R, B3, R3, F, R, B, R3, F3, R, B, R3, F, R, B3, R3, F3]),
    ("F", &[R3, U3, F3, R, U, R3, U3, R3, F, R2, U3, R3, U3, R, U, R3, U, R]),
    ("Ga", &[R2, U, R3, U, R3, U3, R, U3, R2, U3, D, R3, U, R, D3]),
    ("Gb", &[R3, U3, R, U, D3, R2, U, R3, U, R, U3, R, U3, R2, D]),
    ("Gc", &[R2, U3, R, U3, R, U, R3, U, R2, U, D3, R, U3, R3, D]),
    ("Gd", &[R, U, R3, U3, D, R2, U3, R, U3, R3, U, R3, U, R2, D3]),
    ("H", &[R2, U2, R, U2, R2, U2, R2, U2, R, U2, R2]),
    ("Ja", &[R3, U, L3, U2, R, U3, R3, U2, R, L]),
    ("Jb", &[R, U, R3, F3, R, U, R3, U3, R3, F, R2, U3, R3]),
    ("Na", &[R, U, R3, U, R, U, R3, F3, R, U, R3, U3, R3, F, R2, U3, R3, U2, R, U3, R3]),
    ("Nb", &[R3, U, R, U3, R3, F3, U3, F, R, U, R3, F, R3, F3, R, U3, R]),
    ("Ra", &[R, U3, R3, U3, R, U, R, D, R3, U3, R, D3, R3, U2, R3]),
    ("Rb", &[R2, F, R, U, R, U3, R3, F3, R, U2, R3, U2, R]),
    ("T", &[R, U, R3, U3, R3, F, R2, U3, R3, U3, R, U, R3, F3]),
    ("Ua", &[R, U3, R, U, R, U, R, U3, R3, U3, R2]),
    ("Ub", &[R2, U, R, U, R3, U3, R3, U3, R3, U, R3]),
    ("V", &[R3, U, R3, U3, B3, R3, B2, U3, B3, U, B3, R, B, R]),
    ("Y", &[F, R, U3, R3, U3, R, U, R3, F3, R, U, R3, U3, R3, F, R, F3]),
    ("Z", &[R2, L2, D, R2, L2, U, R3, L, F2, R2, L2, B2, R3, L]),
];

lazy_static! {
    /// Every OLL case, the PLL skip, and every PLL case.
    static ref LIBRARY: Vec<LastLayerPattern> = {
        let mut library: Vec<LastLayerPattern> = OLL_ALGORITHMS
            .iter()
            .map(|&(name, moves)| LastLayerPattern::new(name, Stage::Oll, moves))
            .collect();
        library.push(LastLayerPattern::new("PLL skip", Stage::Pll, &[]));
        library.extend(
            PLL_ALGORITHMS
                .iter()
                .map(|&(name, moves)| LastLayerPattern::new(name, Stage::Pll, moves)),
        );
        library
    };
}

/// The last layer algorithm library.
pub fn library() -> &'static [LastLayerPattern] {
    &LIBRARY
}

/// Every pattern of the cube's stage matching it, with its pre-AUF.
pub fn matching_patterns(cc: &CubieCube) -> Vec<PatternMatch> {
    let stage = Stage::of(cc);
    let sig = signature(stage, cc);
    library()
        .iter()
        .filter(|pattern| pattern.stage == stage)
        .filter_map(|pattern| {
            let k = pattern.signatures.iter().position(|&s| s == sig)?;
            Some(PatternMatch {
                pattern,
                pre_auf: AUF[(4 - k) % 4],
            })
        })
        .collect()
}

/// The pattern matching a cube with Cross and F2L solved.
pub fn match_last_layer(cc: &CubieCube) -> Result<PatternMatch, Error> {
    if !cc.is_cross_f2l_solved() {
        return Err(Error::PatternNotFound);
    }
    matching_patterns(cc)
        .into_iter()
        .next()
        .ok_or(Error::PatternNotFound)
}

/// Solve the last layer of a cube with Cross and F2L solved: OLL, then PLL, then the final AUF.
///
/// Returns the moves and the solved cube.
pub fn solve_last_layer(cc: &CubieCube) -> Result<(Vec<Move>, CubieCube), Error> {
    let mut moves = Vec::new();
    let mut state = *cc;
    for _ in 0..2 {
        let found = match_last_layer(&state)?;
        debug!(
            "{} case {}, pre-AUF {:?}",
            found.pattern.stage, found.pattern.name, found.pre_auf
        );
        let step = found.moves();
        state = state.apply_moves(&step);
        moves.extend(step);
        if found.pattern.stage == Stage::Pll {
            break;
        }
    }
    for auf in AUF {
        let finished = match auf {
            Some(m) => state.apply_move(m),
            None => state,
        };
        if finished.is_solved() {
            moves.extend(auf);
            return Ok((moves, finished));
        }
    }
    Err(Error::PatternNotFound)
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use crate::cubie::{ALL_CORNERS, ALL_EDGES};
    use crate::last_layer::*;
    use crate::scramble::scramble_from_str;

    fn permutations(items: [u8; 4]) -> Vec<[u8; 4]> {
        let mut result = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        if HashSet::<usize>::from(idx).len() == 4 {
                            result.push(idx.map(|i| items[i]));
                        }
                    }
                }
            }
        }
        result
    }

    fn parity(p: &[u8; 4]) -> usize {
        let mut s = 0;
        for i in 0..4 {
            for j in 0..i {
                if p[j] > p[i] {
                    s += 1;
                }
            }
        }
        s % 2
    }

    /// Every solvable last layer on top of a solved F2L.
    fn all_last_layers() -> Vec<CubieCube> {
        let mut states = Vec::new();
        let perms = permutations([0, 1, 2, 3]);
        for cp in &perms {
            for ep in perms.iter().filter(|ep| parity(ep) == parity(cp)) {
                for twist in 0..27u8 {
                    for flip in 0..8u8 {
                        let mut cc = CubieCube::default();
                        for i in 0..4 {
                            cc.cp[i] = ALL_CORNERS[cp[i] as usize];
                            cc.ep[i] = ALL_EDGES[ep[i] as usize];
                        }
                        let co = [twist % 3, twist / 3 % 3, twist / 9];
                        cc.co[..3].copy_from_slice(&co);
                        cc.co[3] = (6 - co.iter().sum::<u8>()) % 3;
                        let eo = [flip & 1, flip >> 1 & 1, flip >> 2 & 1];
                        cc.eo[..3].copy_from_slice(&eo);
                        cc.eo[3] = eo.iter().sum::<u8>() % 2;
                        states.push(cc);
                    }
                }
            }
        }
        states
    }

    #[test]
    fn test_library() {
        let lib = library();
        assert_eq!(lib.len(), 79);
        assert_eq!(lib.iter().filter(|p| p.stage == Stage::Oll).count(), 57);
        assert_eq!(lib.iter().filter(|p| p.stage == Stage::Pll).count(), 22);
        let names: HashSet<&str> = lib.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), 79);
        for pattern in lib {
            let case = CubieCube::default().apply_moves(&invert_moves(pattern.moves));
            assert!(case.is_cross_f2l_solved(), "{} breaks F2L", pattern.name);
            assert_eq!(Stage::of(&case), pattern.stage, "{}", pattern.name);
        }
    }

    #[test]
    fn test_skip() {
        let found = match_last_layer(&CubieCube::default()).unwrap();
        assert_eq!(found.pattern.name, "PLL skip");
        assert_eq!(found.pre_auf, None);
        assert!(found.moves().is_empty());
        let (moves, state) = solve_last_layer(&CubieCube::default().apply_move(U)).unwrap();
        assert_eq!(moves, vec![U3]);
        assert!(state.is_solved());
    }

    #[test]
    fn test_known_cases() {
        let sune = scramble_from_str("R U R' U R U2 R'").unwrap();
        let case = CubieCube::default().apply_moves(&invert_moves(&sune));
        let found = match_last_layer(&case).unwrap();
        assert_eq!(found.pattern.name, "OLL 27");
        assert_eq!(found.pre_auf, None);

        let t_perm = scramble_from_str("R U R' U' R' F R2 U' R' U' R U R' F'").unwrap();
        let case = CubieCube::default().apply_moves(&invert_moves(&t_perm)).apply_move(U);
        let found = match_last_layer(&case).unwrap();
        assert_eq!(found.pattern.name, "T");
        assert_eq!(found.pre_auf, Some(U3));
    }

    #[test]
    fn test_not_f2l() {
        let state = CubieCube::default().apply_move(R);
        assert!(matches!(match_last_layer(&state), Err(Error::PatternNotFound)));
        assert!(matches!(solve_last_layer(&state), Err(Error::PatternNotFound)));
    }

    #[test]
    fn test_every_last_layer() {
        let states = all_last_layers();
        assert_eq!(states.len(), 62208);
        for cc in states {
            assert_eq!(matching_patterns(&cc).len(), 1, "{:?}", cc);
            let (moves, solved) = solve_last_layer(&cc).unwrap();
            assert!(solved.is_solved());
            assert_eq!(cc.apply_moves(&moves), solved);
        }
    }
}
