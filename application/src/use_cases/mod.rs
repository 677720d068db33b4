//! Application use cases

pub mod respond;
pub(crate) mod tool_helpers;
