#[macro_use]
extern crate log;

#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

/// Construct the rocket instance with all routes and fairings attached.
/// The database connection is established during ignition by
/// [`config::DatabaseFairing`].
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(config::DatabaseFairing)
        .attach(logging::LoggerFairing)
}

#[cfg(test)]
async fn client_and_db() -> (rocket::local::asynchronous::Client, mongodb::Database) {
    let client = rocket::local::asynchronous::Client::tracked(build())
        .await
        .unwrap();
    let db = client
        .rocket()
        .state::<mongodb::Database>()
        .expect("Database not in managed state")
        .clone();
    (client, db)
}
