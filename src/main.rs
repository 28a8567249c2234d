use log::LevelFilter;
use std::error::Error;

mod app;
mod assets;
mod config;
mod core;
mod game;
mod screens;
mod ui;
mod utils;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .filter_module("arrowlapse::screens", LevelFilter::Debug)
        .filter_module("arrowlapse::game", LevelFilter::Debug)
        .init();

    config::load();

    if let Err(e) = app::run() {
        log::error!("Application exited with error: {}", e);
        return Err(e);
    }

    log::info!("Application exited gracefully.");
    Ok(())
}
