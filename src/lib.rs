pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use services::store::ChannelStore;

pub struct AppState {
    pub store: Box<dyn ChannelStore>,
}
