//! spodivide library
//!
//! Divides the tracks of one Spotify playlist, or the Liked Songs, over
//! several target playlists. The user steps through the source one track at
//! a time and moves, copies or removes it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the divide wizard
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `divide` - Source loading, cursor navigation and action dispatch
//! - `error` - Error types for provider, divide, store and configuration failures
//! - `management` - Token cache and session stores
//! - `server` - The axum web server
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spodivide::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spodivide::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::load()?;
//!     server::start_api_server(config, false).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod divide;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for binaries and top-level flows that mix error types.
///
/// Library code returns the typed results from [`error`]; they convert into
/// this boxed form with `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line with a blue `o` marker.
///
/// ```
/// info!("Session {} created.", id);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red error line and exits with status 1.
///
/// Only for startup and CLI failures; request handlers never call it.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line with a yellow `!` marker.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
