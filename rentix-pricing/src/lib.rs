pub mod calculator;

pub use calculator::{
    change, item_subtotal, remaining, rent_subtotal, rent_total, total_pieces, total_unit_value,
    total_weight,
};
