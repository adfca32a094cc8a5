//! Domain types shared across all Sitemart services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod id;
pub mod money;
pub mod order;
pub mod pagination;
pub mod user;
