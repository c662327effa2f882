pub mod prelude;

pub use warden_core::{
    // listed by hand so the core prelude stays out, it's merged into `prelude` below
    // along with config and address
    cache,
    controller,
    dispatch,
    error,
    overview,
    querier,
    signing,
    store,
    transaction,
};

// for building messages by hand
pub mod proto {
    pub use warden_proto::*;
}
