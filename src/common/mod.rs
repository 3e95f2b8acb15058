//! Common, shared types.

pub mod body;
pub mod input;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
