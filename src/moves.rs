use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use self::Move::*;
use crate::constants::*;
use crate::cubie::{Corner::*, CubieCube, Edge::*};
use crate::error::Error;

/// Layer moves, Up, Right, Front, Down, Left, Back.
///
/// $ clockwise, $2 double, $3 counter-clockwise.
#[rustfmt::skip]
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy, Serialize, Deserialize)]
pub enum Move {
    U, U2, U3,
    R, R2, R3,
    F, F2, F3,
    D, D2, D3,
    L, L2, L3,
    B, B2, B3,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            U3 => write!(f, "U'"),
            D3 => write!(f, "D'"),
            R3 => write!(f, "R'"),
            L3 => write!(f, "L'"),
            F3 => write!(f, "F'"),
            B3 => write!(f, "B'"),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "R" => Ok(R),
            "R'" => Ok(R3),
            "R2" => Ok(R2),
            "L" => Ok(L),
            "L'" => Ok(L3),
            "L2" => Ok(L2),
            "U" => Ok(U),
            "U'" => Ok(U3),
            "U2" => Ok(U2),
            "D" => Ok(D),
            "D'" => Ok(D3),
            "D2" => Ok(D2),
            "F" => Ok(F),
            "F'" => Ok(F3),
            "F2" => Ok(F2),
            "B" => Ok(B),
            "B'" => Ok(B3),
            "B2" => Ok(B2),
            _ => Err(Error::NoLegalMove(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_MOVES
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::NoLegalMove(value.to_string()))
    }
}

#[rustfmt::skip]
impl Move {
    /// Moves on opposite faces, which commute.
    pub fn is_inverse(&self, other: Move) -> bool {
        matches!(
            (&self, other),
            (U | U2 | U3, D | D2 | D3)
            | (D | D2 | D3, U | U2 | U3)
            | (R | R2 | R3, L | L2 | L3)
            | (L | L2 | L3, R | R2 | R3)
            | (F | F2 | F3, B | B2 | B3)
            | (B | B2 | B3, F | F2 | F3),
        )
    }

    pub fn is_same_layer(&self, other: Move) -> bool {
        self.face() == other.face()
    }

    pub fn get_inverse(self) -> Self {
        match self {
            U => U3,
            U3 => U,
            D => D3,
            D3 => D,
            R => R3,
            R3 => R,
            L => L3,
            L3 => L,
            F => F3,
            F3 => F,
            B => B3,
            B3 => B,
            _ => self,
        }
    }

    /// Face index in U, R, F, D, L, B order.
    pub fn face(self) -> usize {
        self as usize / 3
    }

    /// Number of clockwise quarter turns, 1 to 3.
    pub fn quarter_turns(self) -> usize {
        self as usize % 3 + 1
    }

    /// The turn of `face` by `quarter_turns` clockwise quarter turns, `None` when that is the identity.
    pub fn from_face(face: usize, quarter_turns: usize) -> Option<Self> {
        match quarter_turns % 4 {
            0 => None,
            q => ALL_MOVES.get(3 * face + q - 1).copied(),
        }
    }
}

/// Successive moves on the same face, or on the same axis in the wrong order, never belong to a
/// canonical move sequence.
pub fn is_redundant(last: Option<Move>, next: Move) -> bool {
    match last {
        Some(last) => {
            let diff = last.face() as i8 - next.face() as i8;
            [0, 3].contains(&diff)
        }
        None => false,
    }
}

/// The sequence undoing `moves`.
pub fn invert_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|m| m.get_inverse()).collect()
}

/// Merge successive turns of the same face, dropping those that cancel out.
pub fn simplify(moves: &[Move]) -> Vec<Move> {
    let mut result: Vec<Move> = Vec::with_capacity(moves.len());
    for &m in moves {
        match result.last() {
            Some(&last) if last.is_same_layer(m) => {
                result.pop();
                if let Some(merged) =
                    Move::from_face(m.face(), last.quarter_turns() + m.quarter_turns())
                {
                    result.push(merged);
                }
            }
            _ => result.push(m),
        }
    }
    result
}

/// The basic six cube moves described by permutations and changes in orientation.
///
/// U_MOVE
pub const U_MOVE: CubieCube = CubieCube {
    cp: [UBR, URF, UFL, ULB, DFR, DLF, DBL, DRB],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UB, UR, UF, UL, DR, DF, DL, DB, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// R_MOVE
pub const R_MOVE: CubieCube = CubieCube {
    cp: [DFR, UFL, ULB, URF, DRB, DLF, DBL, UBR], //permutation of the corners
    co: [2, 0, 0, 1, 1, 0, 0, 2],                 //changes of the orientations of the corners
    ep: [FR, UF, UL, UB, BR, DF, DL, DB, DR, FL, BL, UR], //permutation of the edges
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],     //changes of the permutations of the edges
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// F_MOVE
pub const F_MOVE: CubieCube = CubieCube {
    cp: [UFL, DLF, ULB, UBR, URF, DFR, DBL, DRB],
    co: [1, 2, 0, 0, 2, 1, 0, 0],
    ep: [UR, FL, UL, UB, DR, FR, DL, DB, UF, DF, BL, BR],
    eo: [0, 1, 0, 0, 0, 1, 0, 0, 1, 1, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// D_MOVE
pub const D_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, ULB, UBR, DLF, DBL, DRB, DFR],
    co: [0, 0, 0, 0, 0, 0, 0, 0],
    ep: [UR, UF, UL, UB, DF, DL, DB, DR, FR, FL, BL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// L_MOVE
pub const L_MOVE: CubieCube = CubieCube {
    cp: [URF, ULB, DBL, UBR, DFR, UFL, DLF, DRB],
    co: [0, 1, 2, 0, 0, 2, 1, 0],
    ep: [UR, UF, BL, UB, DR, DF, FL, DB, FR, UL, DL, BR],
    eo: [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
};

/// The basic six cube moves described by permutations and changes in orientation.
///
/// B_MOVE
pub const B_MOVE: CubieCube = CubieCube {
    cp: [URF, UFL, UBR, DRB, DFR, DLF, ULB, DBL],
    co: [0, 0, 1, 2, 0, 0, 2, 1],
    ep: [UR, UF, UL, BR, DR, DF, DL, BL, FR, FL, UB, DB],
    eo: [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 1, 1],
};

/// Basic move cubes in U, R, F, D, L, B order.
pub const BASIC_MOVE_CUBES: [CubieCube; 6] = [U_MOVE, R_MOVE, F_MOVE, D_MOVE, L_MOVE, B_MOVE];

lazy_static! {
    /// The cubie level effect of every move, indexed by `Move as usize`.
    pub static ref MOVE_CUBES: [CubieCube; N_MOVE] = move_cubes();

    /// Where every sticker position goes under every move, indexed by `Move as usize` and position.
    pub static ref FACELET_MOVES: [[u8; N_FACELET]; N_MOVE] = facelet_moves(&MOVE_CUBES);
}

fn move_cubes() -> [CubieCube; N_MOVE] {
    let mut cubes = [CubieCube::default(); N_MOVE];
    for (j, basic) in BASIC_MOVE_CUBES.iter().enumerate() {
        let mut a = CubieCube::default();
        // three moves for each face, for example U, U2, U3 = U'
        for k in 0..3 {
            a.multiply(*basic);
            cubes[3 * j + k] = a;
        }
    }
    cubes
}

fn facelet_moves(cubes: &[CubieCube; N_MOVE]) -> [[u8; N_FACELET]; N_MOVE] {
    let mut table = [[0; N_FACELET]; N_MOVE];
    for (m, cube) in cubes.iter().enumerate() {
        for p in 0..N_FACELET {
            // in the solved cube the sticker at p is the one whose home is p
            table[m][p] = cube.sticker_position(p as u8);
        }
    }
    table
}
