pub mod cache;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod overview;
pub mod prelude;
pub mod querier;
pub mod signing;
pub mod store;
pub mod transaction;
