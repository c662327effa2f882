mod address;
mod config_ext;
mod error;
mod signer;

pub use address::*;
pub use config_ext::*;
pub use error::*;
pub use signer::*;
