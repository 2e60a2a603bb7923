//! Input subsystem.
//!
//! Only what the render loop needs to decide when to stop. The runtime
//! translates `winit` events into [`InputEvent`]s; nothing here names a
//! `winit` type.

mod state;

pub use state::{InputEvent, InputState, Key};
