//! quadview — a minimal binary PPM viewer.
//!
//! The image is decoded once ([`ppm`]), uploaded as a texture ([`gpu`]) and
//! drawn as a quad whose view matrix ([`transform`]) the keyboard drives
//! ([`app`]).

pub mod logger;

pub mod app;
pub mod cli;
pub mod gpu;
pub mod matrix;
pub mod ppm;
pub mod transform;
