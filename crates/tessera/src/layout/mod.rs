mod debug;
mod dual;
mod field;
mod fixed;
mod preset;
mod values;

pub use debug::*;
pub use dual::*;
pub use field::*;
pub use fixed::*;
pub use preset::*;
pub use values::*;
