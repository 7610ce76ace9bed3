// src/specs/mod.rs
//! # Page-specific extraction
//!
//! Each module here encodes *where the ground truth lives in one vendor's markup* and
//! *how to read it tolerantly*. They only extract: merging across cards and
//! documents lives in `aggregate`, persistence in `file`.
//!
//! ## Conventions
//! - Work through `core::DomNode` only, never a parser's concrete types, so extractors
//!   run against any tree (and against hand-built trees in tests).
//! - A missing sub-element or an unreadable value drops that field, not the card.
//!   A card that faults outright drops only itself.
//! - Output is `data::RawEvent`, already filtered: every event returned has at
//!   least one opponent and one valid price.
//!
//! ## Current pages
//! - `psel`: Parions Sport En Ligne event cards (`psel-event-main`, `psel-event-live`).
pub mod psel;
