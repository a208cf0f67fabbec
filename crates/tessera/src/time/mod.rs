mod epoch_clock;
mod interface;

pub use epoch_clock::*;
pub use interface::*;
