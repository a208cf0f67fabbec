mod parse;
mod structured;

pub use structured::*;
