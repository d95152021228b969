//! Flappy Neuro - Flappy Bird flown by evolved neural networks.
//!
//! The simulation core (`flappy` and `core`) is independent of how birds are
//! controlled and how frames are shown; `neural` and `trainer` supply evolved
//! controllers and `ui` draws frames in the terminal.

pub mod build_info;
pub mod config;
pub mod core;
pub mod error;
pub mod flappy;
pub mod neural;
pub mod trainer;
pub mod ui;

pub use config::Settings;
pub use error::{Error, Result};
