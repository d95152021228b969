//! The simulation loop and the contracts it drives.

pub mod constants;
pub mod controller;
pub mod frame;
pub mod generation;

pub use controller::{Controller, Entrant, GapFollower, Script, ScriptedController, ScriptedEntrant};
pub use frame::{DoneReason, FailureTally, FrameView, GenerationOutcome, Headless, Presenter, Signal};
pub use generation::{Generation, GenerationState, Session};
