use crate::constraint::StructureDvh;
use crate::dvh::{Dvh, DvhError};

use log::debug;
use rayon::prelude::*;
use std::collections::HashMap;

/// Identifier of a structure within the loaded patient data (ROI number).
pub type StructureId = u32;

/// Per-structure input supplied by the data-loading collaborator.
pub struct StructureDose {
    /// Cumulative histogram: index = dose bin (cGy), value = cc receiving at
    /// least that dose.
    pub bins: Vec<f64>,
    /// Structure volume in cc.
    pub volume_cc: f64,
    /// Maximum dose reached, in percent of the prescription dose.
    pub max_relative_dose: f64,
}

/// Immutable DVH instances keyed by structure id.
///
/// Built DVHs stay valid until the underlying dose data is reloaded, so a
/// structure toggled off and on again reuses the existing instance instead of
/// recomputing from the raw histogram.
#[derive(Default)]
pub struct DvhCache {
    entries: HashMap<StructureId, StructureDvh>,
}

impl DvhCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and cache the DVH for one structure
    ///
    /// # Errors
    ///
    /// Returns error if the structure's histogram fails validation
    pub fn insert(
        &mut self,
        id: StructureId,
        structure: StructureDose,
    ) -> Result<&StructureDvh, DvhError> {
        let dvh = Dvh::new(structure.bins)?;
        debug!("built DVH for structure {id} ({} bins)", dvh.max_dose() + 1);
        let entry = StructureDvh {
            dvh,
            volume_cc: structure.volume_cc,
            max_relative_dose: structure.max_relative_dose,
        };
        Ok(self.entries.entry(id).insert_entry(entry).into_mut())
    }

    pub fn get(&self, id: StructureId) -> Option<&StructureDvh> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: StructureId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Drop the DVH for one structure, e.g. when its dose data is reloaded
    pub fn invalidate(&mut self, id: StructureId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!("invalidated DVH for structure {id}");
        }
        removed
    }

    /// Drop all cached DVHs, e.g. when a new patient is loaded
    pub fn clear(&mut self) {
        debug!("cleared DVH cache ({} structures)", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace the cache contents with DVHs for the given structures, built
    /// in parallel.
    ///
    /// Structures whose histogram fails validation are skipped; callers treat
    /// a missing entry as "no DVH available" and disable the corresponding
    /// constraint controls.
    pub fn rebuild(&mut self, structures: Vec<(StructureId, StructureDose)>) {
        let requested = structures.len();
        let entries: HashMap<StructureId, StructureDvh> = structures
            .into_par_iter()
            .filter_map(|(id, structure)| {
                let dvh = Dvh::new(structure.bins).ok()?;
                let entry = StructureDvh {
                    dvh,
                    volume_cc: structure.volume_cc,
                    max_relative_dose: structure.max_relative_dose,
                };
                Some((id, entry))
            })
            .collect();
        debug!(
            "rebuilt DVH cache: {} of {requested} structures valid",
            entries.len()
        );
        self.entries = entries;
    }
}

#[cfg(test)]
mod test_cache {
    use super::*;

    fn structure(bins: Vec<f64>) -> StructureDose {
        StructureDose {
            bins,
            volume_cc: 20.0,
            max_relative_dose: 110.0,
        }
    }

    #[test]
    fn insert_then_query() {
        let mut cache = DvhCache::new();
        let entry = cache.insert(1, structure(vec![10.0, 8.0, 4.0])).unwrap();
        assert_eq!(entry.dvh.max_volume(), 10.0);
        assert_eq!(entry.volume_cc, 20.0);
        assert!(cache.contains(1));
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut cache = DvhCache::new();
        cache.insert(1, structure(vec![10.0, 8.0])).unwrap();
        cache.insert(1, structure(vec![6.0, 2.0])).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1).unwrap().dvh.max_volume(), 6.0);
    }

    #[test]
    fn invalid_histogram_is_not_cached() {
        let mut cache = DvhCache::new();
        assert!(cache.insert(1, structure(vec![])).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = DvhCache::new();
        cache.insert(1, structure(vec![10.0])).unwrap();
        cache.insert(2, structure(vec![5.0])).unwrap();
        assert!(cache.invalidate(1));
        assert!(!cache.invalidate(1));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn rebuild_skips_invalid_structures() {
        let mut cache = DvhCache::new();
        cache.insert(9, structure(vec![1.0])).unwrap();
        cache.rebuild(vec![
            (1, structure(vec![10.0, 8.0, 4.0])),
            (2, structure(vec![])),
            (3, structure(vec![7.0, -1.0])),
            (4, structure(vec![5.0, 5.0])),
        ]);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(1));
        assert!(cache.contains(4));
        // rebuild replaces, it does not merge
        assert!(!cache.contains(9));
    }
}
