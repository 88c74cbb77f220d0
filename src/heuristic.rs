use std::path::{Path, PathBuf};
use std::thread;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::cubie::CubieCube;
use crate::error::Error;
use crate::moves::Move;
use crate::orbit::{get_orbit_pairs, FaceletPair, OrbitSet};
use crate::sequence::SequenceHash;
use crate::{decode_table, write_table};

/// Distance of every configuration of one sticker pair, indexed by `54 * position_a + position_b`.
///
/// Configurations outside the orbit read `orbit depth + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairTable {
    pub pair: FaceletPair,
    distances: Vec<u8>,
}

impl PairTable {
    pub fn from_orbit(orbit: &OrbitSet) -> Self {
        let mut distances = vec![orbit.depth as u8 + 1; N_FACELET * N_FACELET];
        // symmetric configurations share the distance of their class
        for (rep, members) in orbit.classes() {
            let d = orbit.distance(rep).unwrap_or(orbit.depth as u8 + 1);
            for [p, q] in members {
                distances[p as usize * N_FACELET + q as usize] = d;
            }
        }
        Self {
            pair: orbit.pair,
            distances,
        }
    }

    /// Estimated number of moves to bring the pair home.
    pub fn distance(&self, cc: &CubieCube) -> u8 {
        let [a, b] = self.pair;
        let p = cc.sticker_position(a) as usize;
        let q = cc.sticker_position(b) as usize;
        self.distances[p * N_FACELET + q]
    }
}

/// Heuristic of the F2L search: pair tables for the cross and the four slots, backed by a sequence hash
/// for states close to solved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicTable {
    pub sequence: SequenceHash,
    cross: Vec<PairTable>,
    slots: Vec<PairTable>,
}

/// Build the pair tables on top of a sequence hash, one thread per pair.
pub fn create_heuristic_hash(sequence: SequenceHash) -> Result<HeuristicTable, Error> {
    info!(
        "Creating heuristic hash for {} cross and {} slot pairs",
        CROSS_PAIRS.len(),
        F2L_PAIRS.len()
    );
    let build = |pairs: &[FaceletPair]| -> Result<Vec<PairTable>, Error> {
        thread::scope(|s| {
            let handles: Vec<_> = pairs
                .iter()
                .map(|&pair| {
                    s.spawn(move || get_orbit_pairs(pair).map(|o| PairTable::from_orbit(&o)))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join()
                        .map_err(|_| Error::Precompute("orbit thread panicked".to_string()))?
                })
                .collect()
        })
    };
    let cross = build(&CROSS_PAIRS)?;
    let slots = build(&F2L_PAIRS)?;
    info!("Heuristic hash done");
    Ok(HeuristicTable {
        sequence,
        cross,
        slots,
    })
}

impl HeuristicTable {
    /// Build the sequence hash and the pair tables from scratch.
    pub fn build(wildcard: bool, depth: usize) -> Result<Self, Error> {
        create_heuristic_hash(SequenceHash::new(wildcard, depth))
    }

    pub fn wildcard(&self) -> bool {
        self.sequence.wildcard
    }

    pub fn depth(&self) -> usize {
        self.sequence.depth
    }

    /// Estimated number of moves to solve Cross and F2L.
    ///
    /// Zero exactly when they are solved. States the sequence hash knows get their stored distance,
    /// all others the largest cross pair distance plus the slot pair distances. Not admissible.
    pub fn heuristic(&self, cc: &CubieCube) -> u32 {
        if cc.is_cross_f2l_solved() {
            return 0;
        }
        if let Some(d) = self.sequence.distance(cc) {
            return d as u32;
        }
        let cross = self
            .cross
            .iter()
            .map(|t| t.distance(cc) as u32)
            .max()
            .unwrap_or(0);
        let slots: u32 = self.slots.iter().map(|t| t.distance(cc) as u32).sum();
        let h = cross + slots;
        if self.wildcard() {
            // every state within the hash depth has been looked up already
            h.max(self.depth() as u32 + 1)
        } else {
            h
        }
    }

    /// Moves finishing `cc` straight from the sequence hash.
    pub fn finisher(&self, cc: &CubieCube) -> Option<Vec<Move>> {
        self.sequence.finisher(cc)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        write_table(path, self)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        decode_table(&bytes)
    }

    /// Load the table cached in `dir`, or build and cache it.
    pub fn load_or_create<P: AsRef<Path>>(
        dir: P,
        wildcard: bool,
        depth: usize,
    ) -> Result<Self, Error> {
        let fname = table_path(dir, wildcard, depth);
        if fname.exists() {
            info!("Loading {} table...", fname.display());
            let table = Self::load(&fname)?;
            if table.wildcard() == wildcard && table.depth() == depth {
                return Ok(table);
            }
            debug!("{} holds another table, rebuilding", fname.display());
        }
        info!("Creating {} table...", fname.display());
        let table = Self::build(wildcard, depth)?;
        table.save(&fname)?;
        Ok(table)
    }
}

/// File name of a cached heuristic table.
pub fn table_path<P: AsRef<Path>>(dir: P, wildcard: bool, depth: usize) -> PathBuf {
    let mode = if wildcard { "wildcard" } else { "full" };
    dir.as_ref().join(format!("heuristic_{}_{}", mode, depth))
}
