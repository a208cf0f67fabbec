mod counter;
mod free_running;
mod interface;
mod monotonic;
mod mutex;
mod overrides;

pub use counter::*;
pub use free_running::*;
pub use interface::*;
pub use monotonic::*;
pub(crate) use mutex::*;
pub use overrides::*;
