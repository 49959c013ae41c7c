#[allow(clippy::needless_update)]
mod auth;
#[allow(clippy::needless_update)]
mod category;
mod common;
pub mod prelude;
#[allow(clippy::needless_update)]
mod product;
#[allow(clippy::needless_update)]
mod user;
