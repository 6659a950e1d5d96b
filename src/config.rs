//! Environment translation for the composition point. Nothing outside `main`
//! should read process environment state.

use std::env;

pub const DEFAULT_PORT: u16 = 5000;

/// Loads `.env` into the process environment, ignoring a missing file
pub fn load_env() {
    _ = dotenvy::dotenv();
}

pub fn is_production_environment() -> bool {
    env::var("ENVIRONMENT").is_ok_and(|e| e == "production")
}

pub fn server_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
