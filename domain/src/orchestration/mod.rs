//! Turn orchestration rules: the turn state machine and control words.

pub mod control;
pub mod turn;

pub use control::ControlWord;
pub use turn::{TurnPhase, TurnState};
