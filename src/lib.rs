//! A crate for solving the 3x3 Rubik's cube the way a human speedsolver does, with the
//! [CFOP method](https://www.speedsolving.com/wiki/index.php/CFOP_method): Cross, F2L, OLL and PLL.
//!
//! Cross and F2L are found by a two pass UCB tree search guided by precomputed orbit and sequence tables,
//! the last layer is finished by looking the case up in a fixed OLL/PLL algorithm library.

#[macro_use]
extern crate lazy_static;

/// Module containing functions for scrambling the cube.
pub mod scramble;

pub mod error;

/// Module containing 3x3 cube constants.
pub mod constants;
pub mod cubie;
pub mod facelet;
pub mod heuristic;
pub mod last_layer;
pub mod moves;
pub mod orbit;
pub mod search;
pub mod sequence;
pub mod solver;
pub mod symmetries;

use std::{fs, path::Path};

use bincode::{
    config::{self, Configuration},
    error::DecodeError,
};
use serde::{de::DeserializeOwned, Serialize};

pub use crate::cubie::CubieCube;
pub use crate::error::Error;
pub use crate::moves::Move;

const CONFIG: Configuration = config::standard();

pub fn write_table<P, T: Serialize>(path: P, table: &T) -> Result<(), Error>
where
    P: AsRef<Path>,
{
    let encoded = bincode::serde::encode_to_vec(table, CONFIG)?;
    if let Some(dir) = path.as_ref().parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, encoded)?;
    Ok(())
}

pub fn decode_table<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    let (decoded, written) = bincode::serde::decode_from_slice(bytes, CONFIG)?;
    let additional = bytes.len() - written;

    if additional != 0 {
        return Err(DecodeError::UnexpectedEnd { additional })?;
    }
    Ok(decoded)
}
