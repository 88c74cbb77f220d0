use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use crate::constants::*;

/// Whole cube rotations about the x (R), y (U) and z (F) axes, clockwise seen from that face.
///
/// Rotations reorient the cube without changing its state and never appear in a solution.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    X, X2, X3,
    Y, Y2, Y3,
    Z, Z2, Z3,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rotation::X => "x",
            Rotation::X2 => "x2",
            Rotation::X3 => "x'",
            Rotation::Y => "y",
            Rotation::Y2 => "y2",
            Rotation::Y3 => "y'",
            Rotation::Z => "z",
            Rotation::Z2 => "z2",
            Rotation::Z3 => "z'",
        };
        write!(f, "{}", s)
    }
}

type Vector = [i8; 3];

/// Center of a sticker, scaled by two: twice the cubie position plus the face normal.
fn facelet_point(pos: usize) -> Vector {
    let (face, r, c) = (pos / 9, (pos % 9 / 3) as i8, (pos % 3) as i8);
    let (cubie, normal) = match face {
        0 => ([c - 1, 1, r - 1], [0, 1, 0]),
        1 => ([1, 1 - r, 1 - c], [1, 0, 0]),
        2 => ([c - 1, 1 - r, 1], [0, 0, 1]),
        3 => ([c - 1, -1, 1 - r], [0, -1, 0]),
        4 => ([-1, 1 - r, c - 1], [-1, 0, 0]),
        _ => ([1 - c, 1 - r, -1], [0, 0, -1]),
    };
    [
        2 * cubie[0] + normal[0],
        2 * cubie[1] + normal[1],
        2 * cubie[2] + normal[2],
    ]
}

fn rotate_x([x, y, z]: Vector) -> Vector {
    [x, z, -y]
}

fn rotate_y([x, y, z]: Vector) -> Vector {
    [-z, y, x]
}

fn rotate_z([x, y, z]: Vector) -> Vector {
    [y, -x, z]
}

fn mirror_lr([x, y, z]: Vector) -> Vector {
    [-x, y, z]
}

/// A permutation of the 54 facelet positions induced by a rigid motion of the whole cube.
///
/// `perm[p]` is where the sticker at `p` ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symmetry {
    pub perm: [u8; N_FACELET],
}

impl Default for Symmetry {
    fn default() -> Self {
        let mut perm = [0; N_FACELET];
        for (p, q) in perm.iter_mut().enumerate() {
            *q = p as u8;
        }
        Self { perm }
    }
}

impl Symmetry {
    fn from_map(f: impl Fn(Vector) -> Vector) -> Self {
        let index: HashMap<Vector, u8> = (0..N_FACELET)
            .map(|p| (facelet_point(p), p as u8))
            .collect();
        let mut perm = [0; N_FACELET];
        for (p, q) in perm.iter_mut().enumerate() {
            *q = index[&f(facelet_point(p))];
        }
        Self { perm }
    }

    /// The symmetry applying `self` first, then `other`.
    pub fn then(&self, other: &Symmetry) -> Self {
        let mut perm = [0; N_FACELET];
        for (p, q) in perm.iter_mut().enumerate() {
            *q = other.perm[self.perm[p] as usize];
        }
        Self { perm }
    }

    pub fn apply(&self, pos: u8) -> u8 {
        self.perm[pos as usize]
    }

    /// Mirror symmetries swap the handedness of the cube.
    pub fn is_mirror(&self) -> bool {
        // the U R F stickers of a corner have negative orientation unless mirrored
        let [u, r, f] =
            CORNER_FACELET[0].map(|p| facelet_point(self.apply(p) as usize).map(i32::from));
        let det = u[0] * (r[1] * f[2] - r[2] * f[1]) - u[1] * (r[0] * f[2] - r[2] * f[0])
            + u[2] * (r[0] * f[1] - r[1] * f[0]);
        det > 0
    }
}

/// The facelet permutation of a whole cube rotation.
pub fn rotation_perm(r: Rotation) -> Symmetry {
    let (f, turns): (fn(Vector) -> Vector, usize) = match r {
        Rotation::X => (rotate_x, 1),
        Rotation::X2 => (rotate_x, 2),
        Rotation::X3 => (rotate_x, 3),
        Rotation::Y => (rotate_y, 1),
        Rotation::Y2 => (rotate_y, 2),
        Rotation::Y3 => (rotate_y, 3),
        Rotation::Z => (rotate_z, 1),
        Rotation::Z2 => (rotate_z, 2),
        Rotation::Z3 => (rotate_z, 3),
    };
    Symmetry::from_map(move |v| (0..turns).fold(v, |v, _| f(v)))
}

/// The facelet permutation of the reflection exchanging the left and right faces.
pub fn mirror_perm() -> Symmetry {
    Symmetry::from_map(mirror_lr)
}

/// Close a set of generators under composition, identity first.
fn closure(generators: &[Symmetry]) -> Vec<Symmetry> {
    let identity = Symmetry::default();
    let mut seen = HashSet::from([identity]);
    let mut group = vec![identity];
    let mut queue = VecDeque::from([identity]);
    while let Some(s) = queue.pop_front() {
        for g in generators {
            let t = s.then(g);
            if seen.insert(t) {
                group.push(t);
                queue.push_back(t);
            }
        }
    }
    group
}

lazy_static! {
    /// The 24 rotations of the cube.
    pub static ref ROTATIONS: Vec<Symmetry> =
        closure(&[rotation_perm(Rotation::X), rotation_perm(Rotation::Y)]);

    /// The 48 symmetries of the cube, rotations and their mirror images.
    pub static ref SYMMETRIES: Vec<Symmetry> = closure(&[
        rotation_perm(Rotation::X),
        rotation_perm(Rotation::Y),
        mirror_perm(),
    ]);
}

#[cfg(test)]
mod test {
    use crate::moves::{Move, FACELET_MOVES};
    use crate::symmetries::*;

    #[test]
    fn test_group_sizes() {
        assert_eq!(ROTATIONS.len(), 24);
        assert_eq!(SYMMETRIES.len(), 48);
        assert_eq!(SYMMETRIES.iter().filter(|s| s.is_mirror()).count(), 24);
        assert!(ROTATIONS.iter().all(|s| !s.is_mirror()));
    }

    #[test]
    fn test_rotations() {
        let x = rotation_perm(Rotation::X);
        let four = x.then(&x).then(&x).then(&x);
        assert_eq!(four, Symmetry::default());
        assert_eq!(x.then(&x), rotation_perm(Rotation::X2));
        assert_eq!(rotation_perm(Rotation::Z3).then(&rotation_perm(Rotation::Z)), Symmetry::default());
        assert_eq!(Rotation::Y3.to_string(), "y'");
        // centers are permuted among themselves
        for s in SYMMETRIES.iter() {
            for c in CENTER_FACELET {
                assert!(CENTER_FACELET.contains(&s.apply(c)));
            }
        }
        // y carries the front center to the left center
        assert_eq!(rotation_perm(Rotation::Y).apply(22), 40);
    }

    #[test]
    fn test_turns_are_layer_rotations() {
        // R turns the x = 1 layer like x turns the whole cube
        let x = rotation_perm(Rotation::X);
        let r = FACELET_MOVES[Move::R as usize];
        for p in 0..N_FACELET as u8 {
            if r[p as usize] != p {
                assert_eq!(r[p as usize], x.apply(p));
            }
        }
    }
}
