//! Crate packing rule

/// Pouches a full crate holds
pub const CRATE_CAPACITY: i64 = 8;

/// Split a pouch total into crate loads
///
/// Every crate holds [`CRATE_CAPACITY`] except the last, which takes the
/// remainder (1..=8). Returns an empty list for totals below one.
pub fn pack(pouch_total: i64) -> Vec<i64> {
    if pouch_total < 1 {
        return Vec::new();
    }
    let full = (pouch_total - 1) / CRATE_CAPACITY;
    let last = pouch_total - full * CRATE_CAPACITY;
    let mut crates = vec![CRATE_CAPACITY; full as usize];
    crates.push(last);
    crates
}

/// Pouch yield for a fruit weight, floored
pub fn pouches_for_weight(weight_kg: f64, pouches_per_kg: f64) -> i64 {
    if !weight_kg.is_finite() || !pouches_per_kg.is_finite() {
        return 0;
    }
    (weight_kg * pouches_per_kg).floor() as i64
}
