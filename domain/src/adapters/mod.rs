//! Test-only adapters that live inside the domain crate for convenience.
//!
//! These are intended purely for unit testing and local demos. Real storage
//! adapters belong in separate crates behind the `LinkRepository` port.

pub mod memory_repo;
