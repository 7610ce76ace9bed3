// src/normalize/mod.rs
//! Pure text → canonical value mappings applied while extracting.
//! Nothing here fails loudly: unrecognized input passes through or comes back `None`.

pub mod datetime;
pub mod label;

pub use datetime::{display_timestamp, iso_timestamp, normalize_datetime};
pub use label::normalize_label;
