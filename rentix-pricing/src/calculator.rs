//! Pure pricing derivations over a resolved rent.
//!
//! These run at presentation time, after equipment and period snapshots have
//! been resolved onto the rent. They never touch the network, never mutate,
//! and apply no currency rounding; rounding happens in the delivery quote
//! step only.

use rentix_core::models::{Item, Rent};

/// `qty * price-for-period` for one item.
///
/// An item whose equipment has no renting value for the period, or whose
/// equipment snapshot is unresolved, contributes 0. That is policy, not an
/// error: a price table simply has nothing to say about that period.
pub fn item_subtotal(item: &Item, period_id: &str) -> f64 {
    let price = item
        .equipment
        .as_ref()
        .and_then(|equipment| equipment.price_for_period(period_id))
        .unwrap_or(0.0);

    item.qty as f64 * price
}

/// Sum of item subtotals for the rent's own period.
pub fn rent_subtotal(rent: &Rent) -> f64 {
    rent.items
        .iter()
        .map(|item| item_subtotal(item, &rent.period_id))
        .sum()
}

/// Subtotal plus delivery, minus discount.
pub fn rent_total(rent: &Rent) -> f64 {
    rent_subtotal(rent) + rent.delivery_value - rent.discount
}

/// What the customer gets back from the bill they handed over.
pub fn change(rent: &Rent) -> f64 {
    rent.bill - rent.paid_value
}

/// What is still owed after the paid value.
pub fn remaining(rent: &Rent) -> f64 {
    rent_total(rent) - rent.paid_value
}

/// Total shipped weight, from the equipment snapshots.
pub fn total_weight(rent: &Rent) -> f64 {
    rent.items
        .iter()
        .map(|item| {
            let weight = item
                .equipment
                .as_ref()
                .map(|equipment| equipment.weight)
                .unwrap_or(0.0);
            item.qty as f64 * weight
        })
        .sum()
}

/// Replacement value of everything on the rent.
pub fn total_unit_value(rent: &Rent) -> f64 {
    rent.items
        .iter()
        .map(|item| {
            let unit_value = item
                .equipment
                .as_ref()
                .map(|equipment| equipment.unit_value)
                .unwrap_or(0.0);
            item.qty as f64 * unit_value
        })
        .sum()
}

/// Total number of pieces across all items.
pub fn total_pieces(rent: &Rent) -> i64 {
    rent.items.iter().map(|item| item.qty).sum()
}
