//! Main position / sub-position reconciliation.
//!
//! A main position holds the primary (window) product. Every other selected
//! product is an accessory and lives in its own sub-position `"{main}.{i}"`.
//! [`plan`] computes which sub-positions to update, create or delete so that
//! the stored records match a product selection. It is pure; the position
//! repository applies the result inside a single transaction.

use std::collections::HashSet;

use crate::position::{self, Position};

/// Keywords marking the primary product of a selection (matched lowercase)
pub const WINDOW_KEYWORDS: &[&str] = &["fenster", "window"];

/// A product selection split into the main product and its accessories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub primary: String,
    pub accessories: Vec<String>,
}

/// Split an ordered product selection.
///
/// The first entry containing a window keyword is primary, otherwise the
/// first entry. Everything else is an accessory, in its original order.
/// Returns `None` for an empty selection.
pub fn partition_selection(products: &[String]) -> Option<Selection> {
    if products.is_empty() {
        return None;
    }
    let primary_index = products
        .iter()
        .position(|p| {
            let lower = p.to_lowercase();
            WINDOW_KEYWORDS.iter().any(|k| lower.contains(k))
        })
        .unwrap_or(0);

    let accessories = products
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != primary_index)
        .map(|(_, p)| p.clone())
        .collect();

    Some(Selection {
        primary: products[primary_index].clone(),
        accessories,
    })
}

/// Changes needed to bring the sub-positions of one main position in line
/// with an accessory list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Existing sub-positions whose content changes, already rewritten
    pub updates: Vec<Position>,
    /// Sub-positions to insert
    pub creates: Vec<Position>,
    /// Ids of sub-positions to delete along with their measurements
    pub deletes: Vec<String>,
    /// Ids of sub-positions that already match
    pub unchanged: Vec<String>,
}

impl ReconcilePlan {
    /// True when applying the plan would not write anything
    pub fn is_noop(&self) -> bool {
        self.updates.is_empty() && self.creates.is_empty() && self.deletes.is_empty()
    }

    /// Ids the main position has as sub-positions once the plan is applied
    pub fn resulting_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .updates
            .iter()
            .chain(self.creates.iter())
            .map(|p| p.id.clone())
            .chain(self.unchanged.iter().cloned())
            .collect();
        ids.sort_by_key(|id| position::sub_index(id));
        ids
    }
}

/// Plan the sub-positions of `main` for `accessories`.
///
/// Matching is by index: accessory `i` (1-based) belongs in `"{main}.{i}"`,
/// whatever that record held before. A matched record keeps its own id,
/// creation time, status and measurement flag; only the shared fields and
/// the product are rewritten. `existing` are the records whose parent is
/// `main`; any of them not addressed by the new list is deleted, including
/// ids whose index does not parse.
pub fn plan(main: &Position, accessories: &[String], existing: &[Position]) -> ReconcilePlan {
    let shared = main.shared_fields();
    let mut plan = ReconcilePlan::default();

    let wanted: Vec<String> = (1..=accessories.len())
        .map(|i| position::sub_position_id(&main.id, i))
        .collect();
    let wanted_set: HashSet<&str> = wanted.iter().map(String::as_str).collect();

    for (id, product) in wanted.iter().zip(accessories) {
        match existing.iter().find(|p| &p.id == id) {
            Some(current) => {
                let mut next = current.clone();
                next.apply_shared(&shared);
                next.product = product.clone();
                next.project_id = main.project_id;
                next.is_main_position = false;
                next.parent_id = Some(main.id.clone());
                next.accessories.clear();
                if next == *current {
                    plan.unchanged.push(id.clone());
                } else {
                    plan.updates.push(next);
                }
            }
            None => {
                let index = position::sub_index(id).unwrap_or(plan.creates.len() + 1);
                plan.creates.push(Position::sub_position(main, index, product.clone()));
            }
        }
    }

    for current in existing {
        if !wanted_set.contains(current.id.as_str()) {
            plan.deletes.push(current.id.clone());
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::SharedFields;
    use crate::status::Status;

    fn products(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn main_position() -> Position {
        let mut main = Position {
            id: "1".into(),
            project_id: 7,
            product: "Fenster Standard".into(),
            ..Default::default()
        };
        main.apply_shared(&SharedFields::named("Wohnzimmer"));
        main
    }

    /// Apply a plan to an in-memory list of sub-positions
    fn apply(existing: &[Position], plan: &ReconcilePlan) -> Vec<Position> {
        let mut subs: Vec<Position> = existing
            .iter()
            .filter(|p| !plan.deletes.contains(&p.id))
            .map(|p| plan.updates.iter().find(|u| u.id == p.id).unwrap_or(p).clone())
            .collect();
        subs.extend(plan.creates.iter().cloned());
        subs.sort_by_key(|p| position::sub_index(&p.id));
        subs
    }

    #[test]
    fn test_partition_prefers_window_keyword() {
        let sel = partition_selection(&products(&["Rollladen", "Kunststoff-Fenster", "Insektenschutz"])).unwrap();
        assert_eq!(sel.primary, "Kunststoff-Fenster");
        assert_eq!(sel.accessories, products(&["Rollladen", "Insektenschutz"]));

        let sel = partition_selection(&products(&["Sliding WINDOW"])).unwrap();
        assert_eq!(sel.primary, "Sliding WINDOW");
        assert!(sel.accessories.is_empty());
    }

    #[test]
    fn test_partition_falls_back_to_first() {
        let sel = partition_selection(&products(&["Haustür", "Vordach"])).unwrap();
        assert_eq!(sel.primary, "Haustür");
        assert_eq!(sel.accessories, products(&["Vordach"]));
        assert!(partition_selection(&[]).is_none());
    }

    #[test]
    fn test_partition_keeps_duplicate_accessories() {
        let sel = partition_selection(&products(&["Fenster", "Rollladen", "Rollladen"])).unwrap();
        assert_eq!(sel.accessories, products(&["Rollladen", "Rollladen"]));
    }

    #[test]
    fn test_plan_creates_from_scratch() {
        let main = main_position();
        let plan = plan(&main, &products(&["Rollladen", "Insektenschutz"]), &[]);
        assert!(plan.updates.is_empty() && plan.deletes.is_empty());
        let ids: Vec<&str> = plan.creates.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1.1", "1.2"]);
        assert_eq!(plan.creates[1].product, "Insektenschutz");
        assert_eq!(plan.creates[0].name, "Wohnzimmer");
        assert_eq!(plan.creates[0].parent_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_plan_is_idempotent() {
        let main = main_position();
        let accessories = products(&["Rollladen", "Insektenschutz"]);
        let first = plan(&main, &accessories, &[]);
        let subs = apply(&[], &first);

        let second = plan(&main, &accessories, &subs);
        assert!(second.is_noop());
        assert_eq!(second.resulting_ids(), vec!["1.1".to_string(), "1.2".to_string()]);
    }

    #[test]
    fn test_removing_middle_accessory_shifts_content() {
        let main = main_position();
        let subs = apply(&[], &plan(&main, &products(&["Rollladen", "Insektenschutz"]), &[]));

        let shrink = plan(&main, &products(&["Insektenschutz"]), &subs);
        assert_eq!(shrink.deletes, vec!["1.2".to_string()]);
        assert_eq!(shrink.updates.len(), 1);
        assert_eq!(shrink.updates[0].id, "1.1");
        assert_eq!(shrink.updates[0].product, "Insektenschutz");
        assert!(shrink.creates.is_empty());
    }

    #[test]
    fn test_update_preserves_identity_fields() {
        let main = main_position();
        let mut subs = apply(&[], &plan(&main, &products(&["Rollladen"]), &[]));
        subs[0].status = Status::Measured;
        subs[0].has_measurement_data = true;
        let created = subs[0].created_at;

        let mut renamed = main.clone();
        renamed.apply_shared(&SharedFields::named("Küche"));
        let next = plan(&renamed, &products(&["Raffstore"]), &subs);
        let updated = &next.updates[0];
        assert_eq!(updated.name, "Küche");
        assert_eq!(updated.product, "Raffstore");
        assert_eq!(updated.status, Status::Measured);
        assert!(updated.has_measurement_data);
        assert_eq!(updated.created_at, created);
    }

    #[test]
    fn test_zero_accessories_deletes_everything() {
        let main = main_position();
        let mut subs = apply(&[], &plan(&main, &products(&["A", "B", "C"]), &[]));
        subs.push(Position {
            id: "1.x".into(),
            is_main_position: false,
            parent_id: Some("1".into()),
            ..Default::default()
        });

        let clear = plan(&main, &[], &subs);
        assert_eq!(clear.deletes.len(), 4);
        assert!(clear.deletes.contains(&"1.x".to_string()));
        assert!(clear.resulting_ids().is_empty());
    }

    #[test]
    fn test_growing_creates_missing_indices() {
        let main = main_position();
        let subs = apply(&[], &plan(&main, &products(&["A"]), &[]));
        let grow = plan(&main, &products(&["A", "B", "C"]), &subs);
        assert!(grow.updates.is_empty());
        assert_eq!(grow.unchanged, vec!["1.1".to_string()]);
        let ids: Vec<&str> = grow.creates.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1.2", "1.3"]);
    }
}
