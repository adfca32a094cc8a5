//! Service plumbing shared by Sitemart HTTP services.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
