//! Settings read from the environment, after `.env` has been loaded.
//!
//! - `DATABASE_URL`: sqlite url of the store (default: `sqlite://shop.db`)
//! - `BIND_ADDRESS`: HTTP listen address (default: `0.0.0.0:8000`)
//! - `LOG_DIR` / `LOG_FILE`: where the plain-text log goes (default: `./logs.log`)
//! - `SEED_ON_START`: create and seed an empty store on startup (default: `true`)

use std::env;
use std::path::PathBuf;

use crate::error::{Result, ShopError};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
	pub database_url: String,
	pub bind_address: String,
	pub log_dir: PathBuf,
	pub log_file: String,
	pub seed_on_start: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			database_url: "sqlite://shop.db".to_string(),
			bind_address: "0.0.0.0:8000".to_string(),
			log_dir: PathBuf::from("."),
			log_file: "logs.log".to_string(),
			seed_on_start: true,
		}
	}
}

impl Config {
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	fn from_lookup<F>(var: F) -> Result<Self>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let mut config = Config::default();
		if let Some(url) = var("DATABASE_URL") {
			config.database_url = url;
		}
		if let Some(addr) = var("BIND_ADDRESS") {
			config.bind_address = addr;
		}
		if let Some(dir) = var("LOG_DIR") {
			config.log_dir = PathBuf::from(dir);
		}
		if let Some(file) = var("LOG_FILE") {
			config.log_file = file;
		}
		if let Some(seed) = var("SEED_ON_START") {
			config.seed_on_start = parse_bool("SEED_ON_START", seed)?;
		}
		Ok(config)
	}
}

fn parse_bool(key: &'static str, value: String) -> Result<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ShopError::Config{ key, value }),
	}
}
