mod config;
mod error;
mod gas;
mod util;

pub use config::*;
pub use error::*;
pub use gas::*;
pub use util::*;
