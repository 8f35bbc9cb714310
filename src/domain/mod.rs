mod classify;
mod extract;
#[cfg(test)]
pub(crate) mod fixtures;
mod smartlog;
mod types;

pub use classify::*;
pub use extract::*;
pub use smartlog::*;
pub use types::*;
