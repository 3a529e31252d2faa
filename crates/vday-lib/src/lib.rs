//! vday-lib — Chronicles server engine.
//!
//! Static site serving, per-year narration clips, the ElevenLabs synthesis
//! proxy, and the local narration player. Depends on vday-core for the page
//! table and the slideshow controller.

pub mod audio;
pub mod config;
pub mod elevenlabs;
pub mod files;
pub mod player;
pub mod server;

// Re-export vday-core for convenience
pub use vday_core;
