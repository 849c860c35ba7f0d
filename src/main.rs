#[macro_use]
extern crate rocket;

use channel_analytics::{api, config};
use log::info;

#[launch]
fn rocket() -> _ {
    config::load_environment();
    config::init_logger();
    info!("Starting channel data backend...");

    let state = config::create_app_state().expect("Channel store setup failed.");
    let cors = config::create_cors().expect("CORS setup failed.");

    rocket::build()
        .manage(state)
        .attach(cors)
        .mount("/", routes![api::data::get_data])
}
