//! cookieport - session cookie portability over the DevTools protocol
//!
//! This crate copies cookies between web origins, clears cookies for a site,
//! and can automate a login form to establish a session first, by driving a
//! live Chromium-family browser through its remote debugging endpoint.

pub mod cdp;
pub mod cli;
pub mod config;
pub mod cookies;
pub mod error;
pub mod exit_code;
pub mod logging;
pub mod ops;
pub mod output;
pub mod utils;

pub use error::{CookieportError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
