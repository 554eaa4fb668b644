//! Capacity-bounded, multi-resource storages.
//!
//! A [`Storage`] holds quantities of several [`ResourceKind`]s under one
//! shared capacity. [`Storage::add`] and [`Storage::remove`] are the only
//! mutators. Neither fails: both move as much as fits (or as much as is
//! held) and report the amount actually moved.

use std::collections::BTreeMap;

use hamlet_types::{Coordinate, ResourceKind, StorageId};
use serde::Serialize;

/// A named store of goods at a fixed place on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    /// Identifier.
    id: StorageId,
    /// Display name.
    name: String,
    /// Maximum total quantity across all resource kinds.
    capacity: u32,
    /// Position on the map.
    coordinate: Coordinate,
    /// Held quantities. Kinds with zero quantity are not present.
    inventory: BTreeMap<ResourceKind, u32>,
}

impl Storage {
    /// Create an empty storage.
    pub fn new(
        id: impl Into<StorageId>,
        name: impl Into<String>,
        capacity: u32,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            coordinate,
            inventory: BTreeMap::new(),
        }
    }

    /// Identifier.
    pub const fn id(&self) -> &StorageId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum total quantity.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Position on the map.
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Read-only view of the held quantities.
    pub const fn inventory(&self) -> &BTreeMap<ResourceKind, u32> {
        &self.inventory
    }

    /// Quantity held of one kind.
    pub fn quantity(&self, kind: ResourceKind) -> u32 {
        self.inventory.get(&kind).copied().unwrap_or(0)
    }

    /// Whether at least `amount` of `kind` is held.
    pub fn has(&self, kind: ResourceKind, amount: u32) -> bool {
        self.quantity(kind) >= amount
    }

    /// Whether every `(kind, amount)` requirement is met.
    pub fn has_all(&self, requirements: &BTreeMap<ResourceKind, u32>) -> bool {
        requirements
            .iter()
            .all(|(kind, amount)| self.has(*kind, *amount))
    }

    /// Sum of all held quantities.
    pub fn total_stored(&self) -> u32 {
        self.inventory
            .values()
            .fold(0_u32, |acc, qty| acc.saturating_add(*qty))
    }

    /// Room left before the storage is full.
    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.total_stored())
    }

    /// Fill level as a percentage in `0.0..=100.0`. A zero-capacity
    /// storage reports itself as full.
    pub fn fill_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 100.0;
        }
        f64::from(self.total_stored()) * 100.0 / f64::from(self.capacity)
    }

    /// Add up to `amount` of `kind`, bounded by free capacity. Returns the
    /// amount actually added.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let added = amount.min(self.free_capacity());
        if added > 0 {
            let entry = self.inventory.entry(kind).or_insert(0);
            *entry = entry.saturating_add(added);
        }
        added
    }

    /// Remove up to `amount` of `kind`, bounded by what is held. Returns the
    /// amount actually removed.
    pub fn remove(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let held = self.quantity(kind);
        let removed = amount.min(held);
        let remaining = held.saturating_sub(removed);
        if remaining == 0 {
            self.inventory.remove(&kind);
        } else {
            self.inventory.insert(kind, remaining);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granary(capacity: u32) -> Storage {
        Storage::new("granary", "Granary", capacity, Coordinate::new(50.0, 50.0))
    }

    #[test]
    fn add_within_capacity() {
        let mut store = granary(100);
        assert_eq!(store.add(ResourceKind::Food, 30), 30);
        assert_eq!(store.quantity(ResourceKind::Food), 30);
        assert_eq!(store.total_stored(), 30);
    }

    #[test]
    fn add_is_bounded_by_shared_capacity() {
        let mut store = granary(50);
        assert_eq!(store.add(ResourceKind::Wood, 40), 40);
        assert_eq!(store.add(ResourceKind::Food, 30), 10);
        assert_eq!(store.total_stored(), 50);
        assert_eq!(store.add(ResourceKind::Ore, 1), 0);
        assert!(!store.inventory().contains_key(&ResourceKind::Ore));
    }

    #[test]
    fn remove_is_bounded_by_holdings() {
        let mut store = granary(100);
        store.add(ResourceKind::Iron, 3);
        assert_eq!(store.remove(ResourceKind::Iron, 5), 3);
        assert_eq!(store.quantity(ResourceKind::Iron), 0);
        assert!(!store.inventory().contains_key(&ResourceKind::Iron));
        assert_eq!(store.remove(ResourceKind::Tools, 2), 0);
    }

    #[test]
    fn has_and_has_all() {
        let mut store = granary(100);
        store.add(ResourceKind::Wood, 2);
        assert!(store.has(ResourceKind::Wood, 2));
        assert!(!store.has(ResourceKind::Wood, 3));
        assert!(store.has(ResourceKind::Iron, 0));

        let needs = BTreeMap::from([(ResourceKind::Wood, 2), (ResourceKind::Iron, 1)]);
        assert!(!store.has_all(&needs));
        store.add(ResourceKind::Iron, 1);
        assert!(store.has_all(&needs));
    }

    #[test]
    fn fill_percent_tracks_total() {
        let mut store = granary(200);
        assert!(store.fill_percent().abs() < f64::EPSILON);
        store.add(ResourceKind::Food, 50);
        assert!((store.fill_percent() - 25.0).abs() < 1e-9);
        assert!((granary(0).fill_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_never_exceeds_capacity() {
        let mut store = granary(37);
        for (i, kind) in [ResourceKind::Food, ResourceKind::Wood, ResourceKind::Ore]
            .into_iter()
            .cycle()
            .take(30)
            .enumerate()
        {
            let amount = u32::try_from(i % 7).unwrap_or(0);
            store.add(kind, amount);
            if i % 5 == 0 {
                store.remove(kind, 2);
            }
            assert!(store.total_stored() <= store.capacity());
        }
    }
}
