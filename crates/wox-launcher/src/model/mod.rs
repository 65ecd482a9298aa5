//! State model for the Wox query box.
//!
//! This module contains the reconciliation and windowing state machine.
//! All types are independent of any UI toolkit for testability.

mod accumulator;
mod selection;
mod window;

pub use accumulator::{BatchOutcome, ResultAccumulator};
pub use selection::{Direction, SelectionController};
pub use window::{Window, WindowedView};
