//! # vpredict lib

use std::{env, sync::LazyLock};

use tokio::sync::RwLock;

use crate::config::Config;

pub mod api;
pub mod config;
pub mod controller;
pub mod ds;
pub mod error;
pub mod gui;
pub mod prediction;
pub mod presenter;
pub mod session;
pub mod utils;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();
}

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(config::load()));
