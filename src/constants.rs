use crate::moves::Move::{self, *};

/// Number of face turns: six faces, three turns each.
pub const N_MOVE: usize = 18;
pub const N_FACELET: usize = 54;
pub const N_CORNER: usize = 8;
pub const N_EDGE: usize = 12;

pub const ALL_MOVES: [Move; N_MOVE] = [
    U, U2, U3, R, R2, R3, F, F2, F3, D, D2, D3, L, L2, L3, B, B2, B3,
];

/// The U face turns used to adjust the last layer, indexed by quarter turns.
pub const AUF: [Option<Move>; 4] = [None, Some(U), Some(U2), Some(U3)];

/// Map the corner positions to facelet positions.
///
/// The first facelet of every corner lies on the U or D face, the other two follow clockwise.
pub const CORNER_FACELET: [[u8; 3]; N_CORNER] = [
    [8, 9, 20],   // URF: U9 R1 F3
    [6, 18, 38],  // UFL: U7 F1 L3
    [0, 36, 47],  // ULB: U1 L1 B3
    [2, 45, 11],  // UBR: U3 B1 R3
    [29, 26, 15], // DFR: D3 F9 R7
    [27, 44, 24], // DLF: D1 L9 F7
    [33, 53, 42], // DBL: D7 B9 L7
    [35, 17, 51], // DRB: D9 R9 B7
];

/// Map the edge positions to facelet positions.
pub const EDGE_FACELET: [[u8; 2]; N_EDGE] = [
    [5, 10],  // UR: U6 R2
    [7, 19],  // UF: U8 F2
    [3, 37],  // UL: U4 L2
    [1, 46],  // UB: U2 B2
    [32, 16], // DR: D6 R8
    [28, 25], // DF: D2 F8
    [30, 43], // DL: D4 L8
    [34, 52], // DB: D8 B8
    [23, 12], // FR: F6 R4
    [21, 41], // FL: F4 L6
    [50, 39], // BL: B6 L4
    [48, 14], // BR: B4 R6
];

/// Facelets of the centers, they never move under face turns.
pub const CENTER_FACELET: [u8; 6] = [4, 13, 22, 31, 40, 49];

/// The U face stickers other than the center, then the top rows of R, F, L and B.
pub const LAST_LAYER_FACELET: [u8; 20] = [
    0, 1, 2, 3, 5, 6, 7, 8, 9, 10, 11, 18, 19, 20, 36, 37, 38, 45, 46, 47,
];

/// The top rows of R, F, L and B.
pub const LAST_LAYER_SIDE_FACELET: [u8; 12] = [9, 10, 11, 18, 19, 20, 36, 37, 38, 45, 46, 47];

/// Adjacent cross edges, keyed by their D stickers: DF-DR, DR-DB, DB-DL, DL-DF.
pub const CROSS_PAIRS: [[u8; 2]; 4] = [[28, 32], [32, 34], [34, 30], [30, 28]];

/// The four F2L slots, keyed by the side stickers of the slot corner and slot edge on one face:
/// FR (F9, F6), FL (L9, L6), BL (B9, B6), BR (R9, R6).
pub const F2L_PAIRS: [[u8; 2]; 4] = [[26, 23], [44, 41], [53, 50], [17, 14]];

/// Depth of the breadth first sequence enumeration.
pub const SEQUENCE_DEPTH: usize = 4;
/// Depth of the orbit enumeration of a facelet pair.
pub const ORBIT_DEPTH: usize = 5;

pub const PASS1_ITERATIONS: usize = 50_000;
pub const PASS2_ITERATIONS: usize = 100_000;
pub const PASS1_EXPLORATION: f64 = 0.5;
pub const PASS2_EXPLORATION: f64 = 0.1;
pub const ROLLOUT_DEPTH: usize = 2;
pub const MAX_SEARCH_DEPTH: usize = 40;
pub const MAX_NODES: usize = 20_000_000;

pub const SCRAMBLE_LENGTH: usize = 20;

pub const SOLVED_FACELET: &str = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
