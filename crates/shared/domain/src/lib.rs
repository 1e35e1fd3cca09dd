//! # Domain Models
//!
//! Pure data shared by every slice: configuration sections, pack modes and layers, shared
//! constants, and the type-erased slice registry.
//! Only `serde` and `bitflags` are allowed here: no I/O, networking, or heavy logic.

pub mod config;
pub mod constants;
pub mod pack;
pub mod registry;
