//! vday-core — Pure page and slideshow state for the V-Day chronicles.
//!
//! No async runtime, no I/O, no platform dependencies.

pub mod controller;
pub mod pages;
