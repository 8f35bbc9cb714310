mod logging;
mod sapling;
mod terminal;

pub use logging::*;
pub use sapling::*;
pub use terminal::*;
