mod helpers;
mod proto;

pub use helpers::*;
pub use proto::*;
