#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Binary entry point for the incident dashboard API server.
//!
//! Configuration comes from `DATA_PATH`, `BIND_ADDR` and `PORT`; logging
//! from `RUST_LOG`.

use incident_dashboard_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    run_server(ServerConfig::from_env()).await?;

    Ok(())
}
