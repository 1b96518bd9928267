use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::error::Result;

// "user" and "order" are keywords, keep them quoted everywhere
pub const TABLE_SCHEMA: [&str; 5] = [
	r#"
CREATE TABLE IF NOT EXISTS "user" (
	user_id INTEGER NOT NULL PRIMARY KEY,
	last_name TEXT NOT NULL,
	first_name TEXT NOT NULL,
	email TEXT NOT NULL
);"#,
	r#"
CREATE TABLE IF NOT EXISTS book (
	book_id INTEGER NOT NULL PRIMARY KEY,
	book_name TEXT NOT NULL,
	author TEXT NOT NULL,
	release_date DATE NOT NULL
);"#,
	r#"
CREATE TABLE IF NOT EXISTS shop (
	shop_id INTEGER NOT NULL PRIMARY KEY,
	shop_name TEXT NOT NULL,
	address TEXT NOT NULL
);"#,
	r#"
CREATE TABLE IF NOT EXISTS "order" (
	order_id INTEGER NOT NULL PRIMARY KEY,
	reg_date DATE NOT NULL,
	user_id INTEGER NOT NULL,
	FOREIGN KEY(user_id) REFERENCES "user"(user_id)
);"#,
	r#"
CREATE TABLE IF NOT EXISTS order_item (
	order_item_id INTEGER NOT NULL PRIMARY KEY,
	order_id INTEGER NOT NULL,
	book_id INTEGER NOT NULL,
	shop_id INTEGER NOT NULL,
	quantity INTEGER NOT NULL,
	FOREIGN KEY(order_id) REFERENCES "order"(order_id),
	FOREIGN KEY(book_id) REFERENCES book(book_id),
	FOREIGN KEY(shop_id) REFERENCES shop(shop_id)
);"#,
];

// children first
const DROP_TABLES: [&str; 5] = [
	"DROP TABLE IF EXISTS order_item;",
	r#"DROP TABLE IF EXISTS "order";"#,
	"DROP TABLE IF EXISTS shop;",
	"DROP TABLE IF EXISTS book;",
	r#"DROP TABLE IF EXISTS "user";"#,
];

const USERS: [(i64, &str, &str, &str); 2] = [
	(1, "Dorian", "John", "dr.acula@scrubs.com"),
	(2, "Kelso", "Robert", "BobKelso@scrubs.com"),
];

const BOOKS: [(i64, &str, &str, &str); 4] = [
	(1, "War and peace", "L. Tolstoy", "2020-01-01"),
	(2, "Atlas shrugged", "A. Rand", "2020-07-07"),
	(3, "The Lord of the rings", "J. R. R. Tolkien", "2019-06-12"),
	(4, "The adventures of Sherlock Holmes", "A. K. Doyle", "2018-05-22"),
];

const SHOPS: [(i64, &str, &str); 2] = [
	(1, "BookShop#1", "NY"),
	(2, "Books", "LA"),
];

// (order_id, reg_date, user_id)
const ORDERS: [(i64, &str, i64); 4] = [
	(1, "2021-01-01", 1),
	(2, "2021-07-07", 2),
	(3, "2021-08-04", 1),
	(4, "2021-08-04", 2),
];

// (order_item_id, order_id, book_id, shop_id, quantity)
const ORDER_ITEMS: [(i64, i64, i64, i64, i64); 6] = [
	(1, 1, 1, 1, 1),
	(2, 2, 2, 2, 2),
	(3, 3, 1, 2, 3),
	(4, 4, 2, 1, 1),
	(5, 1, 1, 1, 1),
	(6, 2, 2, 2, 2),
];

pub async fn open(url: &str) -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(url)?
		.create_if_missing(true)
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(5)
		.acquire_timeout(Duration::from_secs(3))
		.connect_with(options).await?;

	Ok(pool)
}

/// Single-connection pool over a private in-memory database.
///
/// Every sqlite memory connection is its own database, so the pool must never
/// open a second one or drop the first.
pub async fn open_in_memory() -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")?
		.foreign_keys(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.min_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options).await?;

	Ok(pool)
}

pub async fn create_schema(db: &SqlitePool) -> Result<()> {
	for statement in TABLE_SCHEMA {
		sqlx::query(statement).execute(db).await?;
	}
	Ok(())
}

pub async fn seed(db: &SqlitePool) -> Result<()> {
	let mut tx = db.begin().await?;

	for (id, last_name, first_name, email) in USERS {
		sqlx::query(r#"INSERT INTO "user" (user_id, last_name, first_name, email) VALUES (?, ?, ?, ?)"#)
			.bind(id).bind(last_name).bind(first_name).bind(email)
			.execute(&mut *tx).await?;
	}
	for (id, name, author, released) in BOOKS {
		sqlx::query("INSERT INTO book (book_id, book_name, author, release_date) VALUES (?, ?, ?, ?)")
			.bind(id).bind(name).bind(author).bind(released)
			.execute(&mut *tx).await?;
	}
	for (id, name, address) in SHOPS {
		sqlx::query("INSERT INTO shop (shop_id, shop_name, address) VALUES (?, ?, ?)")
			.bind(id).bind(name).bind(address)
			.execute(&mut *tx).await?;
	}
	for (id, reg_date, user_id) in ORDERS {
		sqlx::query(r#"INSERT INTO "order" (order_id, reg_date, user_id) VALUES (?, ?, ?)"#)
			.bind(id).bind(reg_date).bind(user_id)
			.execute(&mut *tx).await?;
	}
	for (id, order_id, book_id, shop_id, quantity) in ORDER_ITEMS {
		sqlx::query(r#"
INSERT INTO order_item
	(order_item_id, order_id, book_id, shop_id, quantity)
VALUES
	(?, ?, ?, ?, ?)"#)
			.bind(id).bind(order_id).bind(book_id).bind(shop_id).bind(quantity)
			.execute(&mut *tx).await?;
	}

	tx.commit().await?;
	info!(
		users = USERS.len(),
		books = BOOKS.len(),
		shops = SHOPS.len(),
		orders = ORDERS.len(),
		order_items = ORDER_ITEMS.len(),
		"sample rows inserted"
	);
	Ok(())
}

/// Drops every table and rebuilds the store with the sample rows.
pub async fn reset(db: &SqlitePool) -> Result<()> {
	for statement in DROP_TABLES {
		sqlx::query(statement).execute(db).await?;
	}
	create_schema(db).await?;
	seed(db).await
}

/// Creates missing tables and seeds them when no user exists yet.
pub async fn ensure_seeded(db: &SqlitePool) -> Result<bool> {
	create_schema(db).await?;
	let users: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user""#)
		.fetch_one(db).await?;
	if users > 0 {
		return Ok(false);
	}
	seed(db).await?;
	Ok(true)
}

#[cfg(test)]
pub(crate) async fn count(db: &SqlitePool, table: &str) -> i64 {
	sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
		.fetch_one(db).await
		.unwrap()
}
