#![deny(missing_docs)]

//! # Mockery CLI
//!
//! Serves mocked responses for every operation in an OpenAPI v2 document.
//!
//! Clients can ask for a specific declared response with the
//! `x-mock-response-code` header.

use clap::Parser;
use log::info;
use mockery_core::parse_document;

use crate::config::{init_logging, Config};
use crate::error::CliResult;

mod config;
mod error;
mod server;

#[actix_web::main]
async fn main() -> CliResult<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    println!("{}", server::startup_banner());
    init_logging(&config);

    info!("Will try to load spec document: {:?}", config.spec_file);
    let document = parse_document(&config.spec_file)?;

    server::run(&config, document).await
}
