use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::Error;
use crate::moves::FACELET_MOVES;
use crate::symmetries::SYMMETRIES;

/// Two sticker positions. As a key it names the stickers by their solved positions, as a configuration
/// it holds where those stickers currently are.
pub type FaceletPair = [u8; 2];

/// The local configurations of a sticker pair reachable from solved within a fixed number of face turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitSet {
    pub pair: FaceletPair,
    pub depth: usize,
    /// Distance of every reached configuration.
    configurations: HashMap<FaceletPair, u8>,
    /// Symmetries mapping the pair onto itself, by index into [SYMMETRIES], and whether they swap it.
    stabilizer: Vec<(usize, bool)>,
}

fn check_pair(pair: FaceletPair) -> Result<(), Error> {
    let [a, b] = pair;
    let valid = |p: u8| (p as usize) < N_FACELET && !CENTER_FACELET.contains(&p);
    if !valid(a) || !valid(b) || a == b {
        return Err(Error::InvalidFaceletValue);
    }
    Ok(())
}

/// Enumerate the configurations of `pair` within `depth` face turns of solved.
pub fn enumerate_orbit(pair: FaceletPair, depth: usize) -> Result<OrbitSet, Error> {
    check_pair(pair)?;
    let mut configurations = HashMap::from([(pair, 0)]);
    let mut frontier = vec![pair];
    for d in 1..=depth {
        let mut next = Vec::new();
        for [p, q] in frontier {
            for perm in FACELET_MOVES.iter() {
                let config = [perm[p as usize], perm[q as usize]];
                if !configurations.contains_key(&config) {
                    configurations.insert(config, d as u8);
                    next.push(config);
                }
            }
        }
        frontier = next;
    }

    let [a, b] = pair;
    let stabilizer = SYMMETRIES
        .iter()
        .enumerate()
        .filter_map(|(i, s)| match (s.apply(a), s.apply(b)) {
            (x, y) if x == a && y == b => Some((i, false)),
            (x, y) if x == b && y == a => Some((i, true)),
            _ => None,
        })
        .collect();

    let orbit = OrbitSet {
        pair,
        depth,
        configurations,
        stabilizer,
    };
    debug!(
        "orbit {:?}: {} configurations, {} classes, depth {}",
        pair,
        orbit.len(),
        orbit.class_count(),
        depth
    );
    Ok(orbit)
}

lazy_static! {
    static ref ORBIT_CACHE: Mutex<HashMap<FaceletPair, Arc<OrbitSet>>> = Mutex::new(HashMap::new());
}

/// The orbit of `pair` at the default depth, enumerated once per process.
pub fn get_orbit_pairs(pair: FaceletPair) -> Result<Arc<OrbitSet>, Error> {
    if let Some(orbit) = ORBIT_CACHE
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .get(&pair)
    {
        return Ok(Arc::clone(orbit));
    }
    let orbit = Arc::new(enumerate_orbit(pair, ORBIT_DEPTH)?);
    let mut cache = ORBIT_CACHE.lock().unwrap_or_else(|e| e.into_inner());
    Ok(Arc::clone(cache.entry(pair).or_insert(orbit)))
}

impl OrbitSet {
    /// Number of configurations.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn distance(&self, config: FaceletPair) -> Option<u8> {
        self.configurations.get(&config).copied()
    }

    pub fn stabilizer_size(&self) -> usize {
        self.stabilizer.len()
    }

    /// The smallest image of `config` under the symmetries fixing the pair.
    pub fn representative(&self, config: FaceletPair) -> FaceletPair {
        let [p, q] = config;
        self.stabilizer
            .iter()
            .map(|&(i, swap)| {
                let s = &SYMMETRIES[i];
                if swap {
                    [s.apply(q), s.apply(p)]
                } else {
                    [s.apply(p), s.apply(q)]
                }
            })
            .min()
            .unwrap_or(config)
    }

    /// Configurations grouped by class representative.
    pub fn classes(&self) -> BTreeMap<FaceletPair, Vec<FaceletPair>> {
        let mut classes: BTreeMap<FaceletPair, Vec<FaceletPair>> = BTreeMap::new();
        for &config in self.configurations.keys() {
            classes
                .entry(self.representative(config))
                .or_default()
                .push(config);
        }
        for members in classes.values_mut() {
            members.sort();
        }
        classes
    }

    pub fn class_count(&self) -> usize {
        self.classes().len()
    }

    /// Number of configurations at each distance.
    pub fn histogram(&self) -> Vec<usize> {
        let mut histogram = vec![0; self.depth + 1];
        for &d in self.configurations.values() {
            histogram[d as usize] += 1;
        }
        histogram
    }
}

#[cfg(test)]
mod test {
    use crate::orbit::*;

    #[test]
    fn test_slot_orbit() {
        let orbit = enumerate_orbit([26, 23], 5).unwrap();
        assert_eq!(orbit.len(), 574);
        assert_eq!(orbit.stabilizer_size(), 1);
        assert_eq!(orbit.class_count(), 574);
        assert_eq!(orbit.histogram(), vec![1, 9, 54, 195, 265, 50]);
        assert_eq!(orbit.distance([26, 23]), Some(0));
        assert_eq!(enumerate_orbit([26, 23], 1).unwrap().len(), 10);
        assert_eq!(enumerate_orbit([26, 23], 2).unwrap().len(), 64);
    }

    #[test]
    fn test_cross_orbit() {
        let orbit = enumerate_orbit([28, 32], 5).unwrap();
        assert_eq!(orbit.len(), 528);
        assert_eq!(orbit.stabilizer_size(), 2);
        assert_eq!(orbit.class_count(), 274);
        assert_eq!(orbit.histogram(), vec![1, 9, 62, 215, 223, 18]);
        assert_eq!(enumerate_orbit([28, 32], 2).unwrap().len(), 72);
    }

    #[test]
    fn test_classes_partition() {
        for pair in [[32, 34], [38, 41]] {
            let orbit = enumerate_orbit(pair, 5).unwrap();
            let classes = orbit.classes();
            let total: usize = classes.values().map(Vec::len).sum();
            assert_eq!(total, orbit.len());
            for (rep, members) in &classes {
                assert!(members.contains(rep));
                let d = orbit.distance(*rep);
                assert!(members.iter().all(|&m| orbit.distance(m) == d));
                assert!(members.iter().all(|&m| orbit.representative(m) == *rep));
            }
        }
    }

    #[test]
    fn test_invalid_pairs() {
        assert!(matches!(enumerate_orbit([4, 23], 5), Err(Error::InvalidFaceletValue)));
        assert!(matches!(get_orbit_pairs([23, 23]), Err(Error::InvalidFaceletValue)));
        assert!(matches!(get_orbit_pairs([54, 23]), Err(Error::InvalidFaceletValue)));
    }

    #[test]
    fn test_cache() {
        let a = get_orbit_pairs([44, 41]).unwrap();
        let b = get_orbit_pairs([44, 41]).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), 574);
    }
}
