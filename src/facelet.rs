use std::fmt;

use serde::{Deserialize, Serialize};

use self::Color::*;
use crate::constants::*;
use crate::cubie::{CubieCube, ALL_CORNERS, ALL_EDGES};
use crate::error::Error;

/// The six colors, named after the face whose center carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    U,
    R,
    F,
    D,
    L,
    B,
}

pub const ALL_COLORS: [Color; 6] = [U, R, F, D, L, B];

impl Color {
    /// The color a facelet position shows on the solved cube.
    pub fn of_facelet(pos: u8) -> Self {
        ALL_COLORS[pos as usize / 9]
    }
}

impl TryFrom<char> for Color {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'U' => Ok(U),
            'R' => Ok(R),
            'F' => Ok(F),
            'D' => Ok(D),
            'L' => Ok(L),
            'B' => Ok(B),
            _ => Err(Error::InvalidFaceletString),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Cube on the facelet level.
///
/// The facelets are numbered face by face in U, R, F, D, L, B order, nine per face, row by row:
///
/// ```text
///              |************|
///              |*U1**U2**U3*|
///              |************|
///              |*U4**U5**U6*|
///              |************|
///              |*U7**U8**U9*|
///              |************|
/// |************|************|************|************|
/// |*L1**L2**L3*|*F1**F2**F3*|*R1**R2**R3*|*B1**B2**B3*|
/// |************|************|************|************|
/// |*L4**L5**L6*|*F4**F5**F6*|*R4**R5**R6*|*B4**B5**B6*|
/// |************|************|************|************|
/// |*L7**L8**L9*|*F7**F8**F9*|*R7**R8**R9*|*B7**B8**B9*|
/// |************|************|************|************|
///              |************|
///              |*D1**D2**D3*|
///              |************|
///              |*D4**D5**D6*|
///              |************|
///              |*D7**D8**D9*|
///              |************|
/// ```
///
/// A cube definition string "UBL..." means for example: In position U1 we have the U-color, in position U2 we have the
/// B-color, in position U3 we have the L color etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceCube {
    pub f: [Color; N_FACELET],
}

impl Default for FaceCube {
    fn default() -> Self {
        let mut f = [U; N_FACELET];
        for (i, c) in f.iter_mut().enumerate() {
            *c = Color::of_facelet(i as u8);
        }
        Self { f }
    }
}

impl TryFrom<&str> for FaceCube {
    type Error = Error;

    /// Construct a facelet cube from a string. Every color has to appear exactly nine times.
    fn try_from(cube_string: &str) -> Result<Self, Self::Error> {
        if cube_string.chars().count() != N_FACELET {
            return Err(Error::InvalidFaceletString);
        }
        let mut f = [U; N_FACELET];
        let mut count = [0; 6];
        for (i, ch) in cube_string.chars().enumerate() {
            let color = Color::try_from(ch)?;
            f[i] = color;
            count[color as usize] += 1;
        }
        if count.iter().any(|&c| c != 9) {
            return Err(Error::InvalidFaceletString);
        }
        Ok(Self { f })
    }
}

impl fmt::Display for FaceCube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.f {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

impl From<&CubieCube> for FaceCube {
    /// Return a facelet representation of the cube.
    fn from(cc: &CubieCube) -> Self {
        let mut fc = FaceCube::default();
        for (i, facelets) in CORNER_FACELET.iter().enumerate() {
            let j = cc.cp[i] as usize;
            let ori = cc.co[i] as usize;
            for n in 0..3 {
                fc.f[facelets[(n + ori) % 3] as usize] = Color::of_facelet(CORNER_FACELET[j][n]);
            }
        }
        for (i, facelets) in EDGE_FACELET.iter().enumerate() {
            let j = cc.ep[i] as usize;
            let ori = cc.eo[i] as usize;
            for n in 0..2 {
                fc.f[facelets[(n + ori) % 2] as usize] = Color::of_facelet(EDGE_FACELET[j][n]);
            }
        }
        fc
    }
}

impl TryFrom<&FaceCube> for CubieCube {
    type Error = Error;

    /// Return a cubie representation of the facelet cube.
    fn try_from(fc: &FaceCube) -> Result<Self, Self::Error> {
        for (i, &center) in CENTER_FACELET.iter().enumerate() {
            if fc.f[center as usize] != ALL_COLORS[i] {
                return Err(Error::InvalidFaceletValue);
            }
        }

        let mut cc = CubieCube::default();
        for (i, facelets) in CORNER_FACELET.iter().enumerate() {
            // get the colors of the cubie at corner i, starting with the U/D color
            let ori = (0..3)
                .find(|&o| matches!(fc.f[facelets[o] as usize], U | D))
                .ok_or(Error::InvalidFaceletValue)?;
            let col1 = fc.f[facelets[(ori + 1) % 3] as usize];
            let col2 = fc.f[facelets[(ori + 2) % 3] as usize];
            let j = CORNER_FACELET
                .iter()
                .position(|home| {
                    col1 == Color::of_facelet(home[1]) && col2 == Color::of_facelet(home[2])
                })
                .ok_or(Error::InvalidFaceletValue)?;
            cc.cp[i] = ALL_CORNERS[j];
            cc.co[i] = ori as u8;
        }

        for (i, facelets) in EDGE_FACELET.iter().enumerate() {
            let c0 = fc.f[facelets[0] as usize];
            let c1 = fc.f[facelets[1] as usize];
            let (j, ori) = EDGE_FACELET
                .iter()
                .enumerate()
                .find_map(|(j, home)| {
                    let h0 = Color::of_facelet(home[0]);
                    let h1 = Color::of_facelet(home[1]);
                    if c0 == h0 && c1 == h1 {
                        Some((j, 0))
                    } else if c0 == h1 && c1 == h0 {
                        Some((j, 1))
                    } else {
                        None
                    }
                })
                .ok_or(Error::InvalidFaceletValue)?;
            cc.ep[i] = ALL_EDGES[j];
            cc.eo[i] = ori;
        }

        cc.verify().map_err(|_| Error::InvalidFaceletValue)?;
        Ok(cc)
    }
}

impl TryFrom<&str> for CubieCube {
    type Error = Error;

    fn try_from(cube_string: &str) -> Result<Self, Self::Error> {
        let fc = FaceCube::try_from(cube_string)?;
        CubieCube::try_from(&fc)
    }
}
