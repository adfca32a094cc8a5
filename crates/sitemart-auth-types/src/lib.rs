//! Authentication contract shared by Sitemart services.
//!
//! Users authenticate against the auth service, which issues HS256 access
//! tokens. Other services only validate those tokens and extract the
//! [`principal::Principal`]; they never see credentials.

pub mod principal;
pub mod token;
