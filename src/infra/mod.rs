pub mod clock;
pub mod factory;
pub mod repositories;
pub mod store;
