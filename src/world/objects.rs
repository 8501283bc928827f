//! Structure storage and queries

use std::collections::BTreeMap;

use crate::core::types::{AreaId, StructureId};
use crate::world::structure::Structure;

/// Storage for all structures, iterated in id order
#[derive(Debug, Default)]
pub struct WorldObjects {
    instances: BTreeMap<StructureId, Structure>,
}

impl WorldObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowest id not currently in use
    pub fn next_id(&self) -> StructureId {
        let mut id = 0;
        while self.instances.contains_key(&StructureId(id)) {
            id += 1;
        }
        StructureId(id)
    }

    /// Add a structure, replacing any with the same id
    pub fn add(&mut self, structure: Structure) {
        self.instances.insert(structure.id, structure);
    }

    pub fn get(&self, id: StructureId) -> Option<&Structure> {
        self.instances.get(&id)
    }

    pub fn remove(&mut self, id: StructureId) -> Option<Structure> {
        self.instances.remove(&id)
    }

    /// Structures located in `area`
    pub fn in_area(&self, area: AreaId) -> impl Iterator<Item = &Structure> {
        self.instances
            .values()
            .filter(move |s| s.location.area == area)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
