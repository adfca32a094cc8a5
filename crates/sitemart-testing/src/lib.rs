//! Test utilities for Sitemart services.
//!
//! Provides `MockAuth` for minting caller credentials and canned payment
//! gateway payloads. Import from dev-dependencies only, never from production
//! code.

pub mod auth;
pub mod payloads;
