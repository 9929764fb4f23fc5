mod chart;
mod poller;
mod routes;
mod source;
mod structures;
mod view;

use std::path::PathBuf;

use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use log::info;
use reqwest::Client;

use crate::{
    poller::Poller,
    routes::Refresh,
    source::StatusSource,
    structures::{config::Config, errors::DashboardError},
};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// path to config file
    #[arg(long, env, default_value = "./config.yaml")]
    config_path: PathBuf,
}

#[actix_web::main]
async fn main() -> Result<(), DashboardError> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    info!("Started with args: {:?}", args);

    let config = Config::load(&args.config_path)?;
    info!("Using config: {:?}", config);

    let source = StatusSource::new(config.status_file.clone());
    let refresh = Refresh(config.poll_interval());
    let poller = Poller::new(Client::new(), config.upstream_url(), config.poll_interval());
    let latest = poller.subscribe();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(source.clone()))
            .app_data(web::Data::new(latest.clone()))
            .app_data(web::Data::new(refresh))
            .configure(routes::configure)
    })
    .bind((config.bind.as_str(), config.port))?;
    info!("Listening on {}:{}", config.bind, config.port);

    // Poll only once the listener exists, so the first fetch can hit ourselves
    let handle = poller.spawn();
    server.run().await?;
    handle.stop();
    Ok(())
}
