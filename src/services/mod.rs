pub mod analytics;
pub mod presenter;
pub mod store;
pub mod youtube;
