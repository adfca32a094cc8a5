//! SeaORM entities for the orders service.

pub mod comments;
pub mod orders;
pub mod sites;
