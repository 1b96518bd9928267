use thiserror::Error;

use crate::types::Uid;

#[derive(Debug, Error)]
pub enum ShopError {
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),

	#[error("no user with id {0}")]
	UserNotFound(Uid),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("bad value for {key}: {value}")]
	Config { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ShopError>;
