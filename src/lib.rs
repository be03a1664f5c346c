pub mod api;
pub mod config;
pub mod logging;
pub mod reconcile;
pub mod resolver;

use std::env;

/// Reads an environment variable.
///
/// When the `dotenv` feature is enabled, a local `.env` file is loaded the first time any module
/// asks for a variable, so values from it are visible regardless of call order.
pub fn get_var(key: &str) -> Result<String, env::VarError> {
    #[cfg(feature = "dotenv")]
    {
        static DOTENV: std::sync::Once = std::sync::Once::new();
        DOTENV.call_once(|| {
            let _ = dotenvy::dotenv();
        });
    }

    env::var(key)
}
