//! Impressionist-style repainting of photographs.
//!
//! A [`PaintingSession`] samples colors from a source photograph under the
//! user's pointer and stamps them as translucent dabs whose size and opacity
//! follow pointer speed. The [`export`] module saves finished paintings on a
//! background worker; [`config`] holds the TOML settings shared with the CLI.

pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod input;
pub mod session;
pub mod util;

pub use config::Config;
pub use error::PaintError;
pub use session::PaintingSession;
