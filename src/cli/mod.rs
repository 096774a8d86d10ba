//! # CLI Module
//!
//! Command implementations behind the `cooldify` binary. Each command is an
//! `async fn` that reports through the colored output macros and exits the
//! process on unrecoverable errors.
//!
//! ## Commands
//!
//! - [`serve`] - run the HTTP backend
//! - [`auth`] - authorize with Spotify and cache the token locally
//! - [`mood`] - print the mood of a playlist, or of a local features file
//!
//! ## Usage
//!
//! ```bash
//! cooldify serve
//! cooldify auth
//! cooldify mood 37i9dQZF1DXcBWIGoYBM5M
//! cooldify mood --file features.json
//! ```

mod auth;
mod mood;
mod serve;

pub use auth::auth;
pub use auth::wait_for_token;
pub use mood::mood;
pub use mood::mood_from_file;
pub use serve::serve;
