use std::collections::HashMap;

/// Bidirectional mapping between an external id and its matrix position
///
/// Ids are held in ascending order, so the position of an id is stable for a
/// given id set regardless of the order the source returned rows in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdIndexMap {
    ids: Vec<i64>,
    positions: HashMap<i64, usize>,
}

impl IdIndexMap {
    /// Builds the canonical ordering from any id sequence (duplicates allowed)
    pub fn from_ids<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        let mut ids: Vec<i64> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();

        let positions = ids.iter().enumerate().map(|(idx, id)| (*id, idx)).collect();

        Self { ids, positions }
    }

    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn id_at(&self, index: usize) -> Option<i64> {
        self.ids.get(index).copied()
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
