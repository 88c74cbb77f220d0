use serde::{Deserialize, Serialize};

use self::Corner::*;
use self::Edge::*;
use crate::constants::*;
use crate::error::Error;
use crate::moves::{Move, MOVE_CUBES};

/// The names of the corner positions of the cube. Corner URF e.g. has an U(p), a R(ight) and a F(ront) facelet.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Corner {
    URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB,
}

pub const ALL_CORNERS: [Corner; N_CORNER] = [URF, UFL, ULB, UBR, DFR, DLF, DBL, DRB];

impl TryFrom<u8> for Corner {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_CORNERS
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidFaceletValue)
    }
}

/// The names of the edge positions of the cube. Edge UR e.g. has an U(p) and R(ight) facelet.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Edge {
    UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR,
}

pub const ALL_EDGES: [Edge; N_EDGE] = [UR, UF, UL, UB, DR, DF, DL, DB, FR, FL, BL, BR];

impl TryFrom<u8> for Edge {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ALL_EDGES
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidFaceletValue)
    }
}

/// Where a sticker lives in the solved cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StickerHome {
    Center,
    /// Corner piece and twist slot.
    Corner(usize, usize),
    /// Edge piece and flip slot.
    Edge(usize, usize),
}

lazy_static! {
    static ref STICKER_HOME: [StickerHome; N_FACELET] = {
        let mut homes = [StickerHome::Center; N_FACELET];
        for (j, facelets) in CORNER_FACELET.iter().enumerate() {
            for (n, &f) in facelets.iter().enumerate() {
                homes[f as usize] = StickerHome::Corner(j, n);
            }
        }
        for (j, facelets) in EDGE_FACELET.iter().enumerate() {
            for (n, &f) in facelets.iter().enumerate() {
                homes[f as usize] = StickerHome::Edge(j, n);
            }
        }
        homes
    };
}

/// Represent a cube on the cubie level with 8 corner cubies, 12 edge cubies and the cubie orientations.
///
/// A `CubieCube` is a plain value: applying a move returns a new cube and leaves the old one untouched,
/// so states can be shared freely between branches of a search tree.
///
/// * `cp`: corner permutation, the cubie that sits at each corner position
/// * `co`: corner orientation, 0..3 twist of each corner position
/// * `ep`: edge permutation, the cubie that sits at each edge position
/// * `eo`: edge orientation, 0..2 flip of each edge position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubieCube {
    pub cp: [Corner; N_CORNER],
    pub co: [u8; N_CORNER],
    pub ep: [Edge; N_EDGE],
    pub eo: [u8; N_EDGE],
}

impl Default for CubieCube {
    fn default() -> Self {
        SOLVED_CUBIE_CUBE
    }
}

/// The solved cube on the cubie level.
pub const SOLVED_CUBIE_CUBE: CubieCube = CubieCube {
    cp: ALL_CORNERS,
    co: [0; N_CORNER],
    ep: ALL_EDGES,
    eo: [0; N_EDGE],
};

impl From<&[Move]> for CubieCube {
    fn from(moves: &[Move]) -> Self {
        CubieCube::default().apply_moves(moves)
    }
}

impl From<&Vec<Move>> for CubieCube {
    fn from(moves: &Vec<Move>) -> Self {
        CubieCube::from(moves.as_slice())
    }
}

impl CubieCube {
    /// Multiply this cubie cube with another cubie cube b, restricted to the corners.
    pub fn corner_multiply(&mut self, b: CubieCube) {
        let mut c_perm = [URF; N_CORNER];
        let mut c_ori = [0; N_CORNER];
        for i in 0..N_CORNER {
            let from = b.cp[i] as usize;
            c_perm[i] = self.cp[from];
            c_ori[i] = (self.co[from] + b.co[i]) % 3;
        }
        self.cp = c_perm;
        self.co = c_ori;
    }

    /// Multiply this cubie cube with another cubie cube b, restricted to the edges.
    pub fn edge_multiply(&mut self, b: CubieCube) {
        let mut e_perm = [UR; N_EDGE];
        let mut e_ori = [0; N_EDGE];
        for i in 0..N_EDGE {
            let from = b.ep[i] as usize;
            e_perm[i] = self.ep[from];
            e_ori[i] = (self.eo[from] + b.eo[i]) % 2;
        }
        self.ep = e_perm;
        self.eo = e_ori;
    }

    /// Multiply this cubie cube with another cubie cube b, the result is self followed by b.
    pub fn multiply(&mut self, b: CubieCube) {
        self.corner_multiply(b);
        self.edge_multiply(b);
    }

    /// The inverse of this cubie cube.
    pub fn inverse_cubie_cube(&self) -> Self {
        let mut d = CubieCube::default();
        for (i, &c) in self.cp.iter().enumerate() {
            d.cp[c as usize] = ALL_CORNERS[i];
        }
        for (i, &e) in self.ep.iter().enumerate() {
            d.ep[e as usize] = ALL_EDGES[i];
        }
        for i in 0..N_CORNER {
            d.co[i] = (3 - self.co[d.cp[i] as usize]) % 3;
        }
        for i in 0..N_EDGE {
            d.eo[i] = self.eo[d.ep[i] as usize];
        }
        d
    }

    /// Apply a move, returning the new cube.
    pub fn apply_move(&self, m: Move) -> Self {
        let mut c = *self;
        c.multiply(MOVE_CUBES[m as usize]);
        c
    }

    /// Apply a move sequence in order, returning the new cube.
    pub fn apply_moves(&self, moves: &[Move]) -> Self {
        moves.iter().fold(*self, |c, &m| c.apply_move(m))
    }

    /// Give the parity of the corner permutation.
    pub fn corner_parity(&self) -> u8 {
        let mut s = 0;
        for i in (1..N_CORNER).rev() {
            for j in 0..i {
                if self.cp[j] > self.cp[i] {
                    s += 1;
                }
            }
        }
        s % 2
    }

    /// Give the parity of the edge permutation. A solvable cube has the same corner and edge parity.
    pub fn edge_parity(&self) -> u8 {
        let mut s = 0;
        for i in (1..N_EDGE).rev() {
            for j in 0..i {
                if self.ep[j] > self.ep[i] {
                    s += 1;
                }
            }
        }
        s % 2
    }

    /// Check if cubiecube is valid.
    pub fn verify(&self) -> Result<(), Error> {
        let mut edge_count = [0; N_EDGE];
        for e in self.ep {
            edge_count[e as usize] += 1;
        }
        if edge_count.iter().any(|&c| c != 1) {
            return Err(Error::InvalidState("not all 12 edges exist exactly once".to_string()));
        }
        if self.eo.iter().any(|&o| o > 1) || self.eo.iter().sum::<u8>() % 2 != 0 {
            return Err(Error::InvalidState("flip error, one edge has to be flipped".to_string()));
        }

        let mut corner_count = [0; N_CORNER];
        for c in self.cp {
            corner_count[c as usize] += 1;
        }
        if corner_count.iter().any(|&c| c != 1) {
            return Err(Error::InvalidState("not all 8 corners exist exactly once".to_string()));
        }
        if self.co.iter().any(|&o| o > 2) || self.co.iter().sum::<u8>() % 3 != 0 {
            return Err(Error::InvalidState("twist error, one corner has to be twisted".to_string()));
        }

        if self.edge_parity() != self.corner_parity() {
            return Err(Error::InvalidState(
                "parity error, two corners or two edges have to be exchanged".to_string(),
            ));
        }
        Ok(())
    }

    /// The position now holding the sticker whose solved position is `home`.
    pub fn sticker_position(&self, home: u8) -> u8 {
        match STICKER_HOME[home as usize] {
            StickerHome::Center => home,
            StickerHome::Corner(j, n) => {
                let i = self.cp.iter().position(|&c| c as usize == j).unwrap_or(j);
                CORNER_FACELET[i][(n + self.co[i] as usize) % 3]
            }
            StickerHome::Edge(j, n) => {
                let i = self.ep.iter().position(|&e| e as usize == j).unwrap_or(j);
                EDGE_FACELET[i][(n + self.eo[i] as usize) % 2]
            }
        }
    }

    pub fn is_solved(&self) -> bool {
        *self == SOLVED_CUBIE_CUBE
    }

    fn is_edge_solved(&self, e: Edge) -> bool {
        self.ep[e as usize] == e && self.eo[e as usize] == 0
    }

    fn is_corner_solved(&self, c: Corner) -> bool {
        self.cp[c as usize] == c && self.co[c as usize] == 0
    }

    /// The four D layer edges are home and oriented.
    pub fn is_cross_solved(&self) -> bool {
        [DR, DF, DL, DB].iter().all(|&e| self.is_edge_solved(e))
    }

    /// The cross, the four D layer corners and the four middle layer edges are home and oriented.
    pub fn is_cross_f2l_solved(&self) -> bool {
        self.is_cross_solved()
            && [DFR, DLF, DBL, DRB].iter().all(|&c| self.is_corner_solved(c))
            && [FR, FL, BL, BR].iter().all(|&e| self.is_edge_solved(e))
    }

    /// Every piece in the U layer shows its U sticker on the U face.
    pub fn is_oll_solved(&self) -> bool {
        self.co[..4].iter().all(|&o| o == 0)
            && self.eo[..4].iter().all(|&o| o == 0)
            && self.cp[..4].iter().all(|&c| c <= UBR)
            && self.ep[..4].iter().all(|&e| e <= UB)
    }
}

#[cfg(test)]
mod test {
    use crate::cubie::*;
    use crate::moves::Move::*;
    use crate::scramble::scramble_from_str;

    #[test]
    fn test_multiply_inverse() {
        let moves = scramble_from_str("R D2 B2 R2 L2 B' U F' D2 R B2 R2 F2 B2 R2 D2 B").unwrap();
        let cc = CubieCube::from(&moves);
        assert!(cc.verify().is_ok());
        let mut product = cc;
        product.multiply(cc.inverse_cubie_cube());
        assert!(product.is_solved());
        let mut product = cc.inverse_cubie_cube();
        product.multiply(cc);
        assert!(product.is_solved());
        assert!(!cc.apply_move(R3).is_solved());
    }

    #[test]
    fn test_value_semantics() {
        let cc = CubieCube::default();
        let turned = cc.apply_move(F);
        assert!(cc.is_solved());
        assert!(!turned.is_solved());
        assert_eq!(turned.apply_moves(&[F, F, F]), cc);
    }

    #[test]
    fn test_verify() {
        let mut cc = CubieCube::default().apply_moves(&[R, U, F3]);
        assert!(cc.verify().is_ok());
        cc.co[0] = (cc.co[0] + 1) % 3;
        assert!(matches!(cc.verify(), Err(Error::InvalidState(_))));

        let mut cc = CubieCube::default();
        cc.eo[3] = 1;
        assert!(cc.verify().is_err());

        let mut cc = CubieCube::default();
        cc.ep.swap(0, 1);
        assert!(cc.verify().is_err());

        let mut cc = CubieCube::default();
        cc.cp[0] = UFL;
        assert!(cc.verify().is_err());
    }

    #[test]
    fn test_predicates() {
        let cc = CubieCube::default();
        assert!(cc.is_cross_solved() && cc.is_cross_f2l_solved() && cc.is_oll_solved());
        let u = cc.apply_move(U);
        assert!(u.is_cross_f2l_solved());
        assert!(u.is_oll_solved());
        assert!(!u.is_solved());
        let r = cc.apply_move(R);
        assert!(!r.is_cross_solved());
        assert!(!r.is_cross_f2l_solved());
        let sexy = cc.apply_moves(&[R, U, R3, U3]);
        assert!(sexy.is_cross_solved());
        assert!(!sexy.is_cross_f2l_solved());
        // sune keeps F2L but twists the U corners
        let sune = cc.apply_moves(&[R, U, R3, U, R, U2, R3]);
        assert!(sune.is_cross_f2l_solved());
        assert!(!sune.is_oll_solved());
    }

    #[test]
    fn test_sticker_position() {
        let cc = CubieCube::default();
        for p in 0..N_FACELET as u8 {
            assert_eq!(cc.sticker_position(p), p);
        }
        let u = cc.apply_move(U);
        // the front top row moves to the left face
        assert_eq!(u.sticker_position(18), 36);
        assert_eq!(u.sticker_position(19), 37);
        assert_eq!(u.sticker_position(4), 4);
    }
}
