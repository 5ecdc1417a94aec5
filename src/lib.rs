pub mod cli;
pub mod core;
pub mod runtime;
pub mod screens;
pub mod state;
pub mod task;

pub use core::{FormState, Value};
pub use runtime::{Route, Screen};
pub use screens::{ScreenConfig, ScreenKind};
