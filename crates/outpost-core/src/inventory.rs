//! Spending, granting, and pruning station inventories.

use std::collections::BTreeMap;

use outpost_catalog::Catalog;

/// Amounts at or below this are treated as empty and pruned.
pub const INVENTORY_EPSILON: f64 = 1e-9;

/// Whether `inventory` covers every entry of `cost`.
pub fn has_materials(inventory: &BTreeMap<String, f64>, cost: &BTreeMap<String, f64>) -> bool {
    cost.iter().all(|(material, needed)| {
        inventory.get(material).copied().unwrap_or(0.0) + INVENTORY_EPSILON >= *needed
    })
}

/// Deduct `cost` from `inventory` if it is fully covered.
///
/// Returns `false` and leaves the inventory untouched when any material is
/// short. Entries that drop to zero are removed.
pub fn try_spend(inventory: &mut BTreeMap<String, f64>, cost: &BTreeMap<String, f64>) -> bool {
    if !has_materials(inventory, cost) {
        return false;
    }
    for (material, amount) in cost {
        if let Some(held) = inventory.get_mut(material) {
            *held -= amount;
        }
    }
    inventory.retain(|_, amount| *amount > INVENTORY_EPSILON);
    true
}

/// Add `amount` of a material.
pub fn add(inventory: &mut BTreeMap<String, f64>, material: &str, amount: f64) {
    *inventory.entry(material.to_owned()).or_insert(0.0) += amount;
    inventory.retain(|_, held| *held > INVENTORY_EPSILON);
}

/// Drop unknown materials and empty or non-finite entries.
///
/// Returns whether anything was removed.
pub fn clean(inventory: &mut BTreeMap<String, f64>, catalog: &Catalog) -> bool {
    let before = inventory.len();
    inventory.retain(|material, amount| {
        amount.is_finite() && *amount > INVENTORY_EPSILON && catalog.is_valid_material(material)
    });
    inventory.len() != before
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing;

    fn inv(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    #[test]
    fn spend_deducts_and_prunes() {
        let mut inventory = inv(&[("iron_bar", 4.0), ("iron_ore", 3.0)]);
        assert!(try_spend(&mut inventory, &inv(&[("iron_bar", 4.0), ("iron_ore", 1.0)])));
        assert_eq!(inventory, inv(&[("iron_ore", 2.0)]));
    }

    #[test]
    fn short_spend_changes_nothing() {
        let mut inventory = inv(&[("iron_bar", 1.0), ("iron_ore", 9.0)]);
        let before = inventory.clone();
        assert!(!try_spend(&mut inventory, &inv(&[("iron_ore", 1.0), ("iron_bar", 4.0)])));
        assert_eq!(inventory, before);
    }

    #[test]
    fn missing_material_is_short() {
        let inventory = inv(&[("iron_ore", 9.0)]);
        assert!(!has_materials(&inventory, &inv(&[("copper_ore", 1.0)])));
        assert!(has_materials(&inventory, &BTreeMap::new()));
    }

    #[test]
    fn add_creates_entry() {
        let mut inventory = BTreeMap::new();
        add(&mut inventory, "iron_ore", 2.5);
        add(&mut inventory, "iron_ore", 0.5);
        assert!((inventory["iron_ore"] - 3.0).abs() < INVENTORY_EPSILON);
    }

    #[test]
    fn clean_prunes_unknown_and_dust() {
        let catalog = testing::catalog();
        let mut inventory = inv(&[("iron_ore", 1.0), ("unobtainium", 5.0), ("iron_bar", 1e-12)]);
        assert!(clean(&mut inventory, &catalog));
        assert_eq!(inventory, inv(&[("iron_ore", 1.0)]));
        assert!(!clean(&mut inventory, &catalog));
    }
}
