#![deny(clippy::all)]
#![allow(dead_code)]

#[macro_use]
extern crate log;

#[allow(unused_imports)]
use simplelog::LevelFilter;
#[allow(unused_imports)]
use simplelog::SimpleLogger;

use winsys::xdata::xconnection::XConnection;
pub use winsys::Result;

#[macro_use]
mod common;

mod action;
mod binding;
mod config;
mod frame;
mod model;
mod monitor;
mod registry;
mod util;
mod window;

use config::Configuration;
use model::Model;

pub fn main() -> Result<()> {
    #[cfg(debug_assertions)]
    SimpleLogger::init(LevelFilter::Debug, simplelog::Config::default())?;
    #[cfg(not(debug_assertions))]
    SimpleLogger::init(LevelFilter::Info, simplelog::Config::default())?;

    info!("starting {}", WM_NAME!());

    let mut configuration = match Configuration::default_path() {
        Some(path) if path.exists() => match Configuration::load(&path) {
            Ok(configuration) => configuration,
            Err(err) => {
                warn!("{}; falling back to the defaults", err);
                Configuration::default()
            },
        },
        _ => Configuration::default(),
    };

    binding::merge_default_key_bindings(&mut configuration);
    binding::merge_default_button_bindings(&mut configuration);

    let (conn, screen_num) = x11rb::connect(None)?;
    let mut xconn = XConnection::new(&conn, screen_num)?;

    Model::new(&mut xconn, configuration).run();

    Ok(())
}
