//! Cooldify Backend Library
//!
//! Backend for a playlist browsing and upload application. It proxies the
//! Spotify Web API, stores uploaded songs in Supabase, and infers a mood for
//! whole playlists from the tracks' acoustic features.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and request extractors
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `management` - Local token cache for the command line
//! - `mood` - Playlist mood inference
//! - `server` - Router assembly and HTTP server
//! - `spotify` - Spotify Web API client and OAuth token exchange
//! - `storage` - Song storage backends
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use cooldify::mood::{self, AudioFeatures};
//!
//! let summary = mood::calculate_mood(&[Some(AudioFeatures {
//!     energy: 0.2,
//!     valence: 0.2,
//!     tempo: 80.0,
//!     danceability: 0.3,
//! })]);
//! assert_eq!(summary.overall_mood, "Melancholic & Reflective");
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod management;
pub mod mood;
pub mod server;
pub mod spotify;
pub mod storage;
pub mod types;

/// Boxed-error result used by the command-line glue.
///
/// Library layers return their own `thiserror` enums; the CLI collapses them
/// into this alias before reporting.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Waiting for Spotify to redirect to {}", redirect_uri);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// The expansion diverges, so it can stand in for a value in a `match` arm:
///
/// ```
/// let config = match Config::from_env() {
///     Ok(c) => c,
///     Err(e) => error!("Invalid configuration: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
