//! Lookups by section and the validated insertion of new orders.

use std::collections::HashSet;

use chrono::Local;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{Result, ShopError};
use crate::types::{
	Lookup, NewOrder, Oid, Order, OrderItemDetail, Section, Uid, User, Warning,
};

pub async fn lookup(db: &SqlitePool, section: &str, item_id: i64) -> Result<Lookup> {
	let section = match section.parse::<Section>() {
		Ok(section) => section,
		Err(wrong) => {
			warn!("{wrong}");
			return Ok(Lookup::Messages(vec![wrong.to_string()]));
		},
	};

	match section {
		Section::Users => user(db, item_id).await.map(Lookup::User),
		Section::History => history(db, item_id).await.map(Lookup::History),
		Section::Order => order_items(db, item_id).await.map(Lookup::Order),
	}
}

pub async fn user(db: &SqlitePool, user_id: Uid) -> Result<User> {
	sqlx::query_as::<_, User>(r#"
SELECT
	user_id, last_name, first_name, email
FROM
	"user"
WHERE
	user_id = ?"#)
		.bind(user_id)
		.fetch_optional(db).await?
		.ok_or(ShopError::UserNotFound(user_id))
}

pub async fn history(db: &SqlitePool, user_id: Uid) -> Result<Vec<Order>> {
	let orders = sqlx::query_as::<_, Order>(r#"
SELECT
	order_id, reg_date, user_id
FROM
	"order"
WHERE
	user_id = ?
ORDER BY
	order_id"#)
		.bind(user_id)
		.fetch_all(db).await?;
	Ok(orders)
}

pub async fn order_items(db: &SqlitePool, order_id: Oid) -> Result<Vec<OrderItemDetail>> {
	let items = sqlx::query_as::<_, OrderItemDetail>(r#"
SELECT
	oi.order_item_id, oi.order_id,
	b.book_id, b.book_name, b.author, b.release_date,
	s.shop_id, s.shop_name, s.address,
	oi.quantity
FROM
	order_item oi
	JOIN book b ON b.book_id = oi.book_id
	JOIN shop s ON s.shop_id = oi.shop_id
WHERE
	oi.order_id = ?
ORDER BY
	oi.order_item_id"#)
		.bind(order_id)
		.fetch_all(db).await?;
	Ok(items)
}

/// Inserts an order and its valid items, returning the warnings for whatever
/// was rejected. An empty list means everything went in.
///
/// Ids are the table maximum plus one, which is only safe for a single writer.
pub async fn insert_order(db: &SqlitePool, order: &NewOrder) -> Result<Vec<Warning>> {
	let mut warnings = Vec::new();
	let mut tx = db.begin().await?;

	let users = known_ids(&mut tx, r#"SELECT user_id FROM "user""#).await?;
	if !users.contains(&order.user_id) {
		warnings.push(Warning::User(order.user_id));
		return Ok(warnings);
	}

	let books = known_ids(&mut tx, "SELECT book_id FROM book").await?;
	let shops = known_ids(&mut tx, "SELECT shop_id FROM shop").await?;

	let order_id = next_id(&mut tx, r#"SELECT COALESCE(MAX(order_id), 0) + 1 FROM "order""#).await?;
	let first_item_id = next_id(&mut tx, "SELECT COALESCE(MAX(order_item_id), 0) + 1 FROM order_item").await?;

	sqlx::query(r#"INSERT INTO "order" (order_id, reg_date, user_id) VALUES (?, ?, ?)"#)
		.bind(order_id)
		.bind(Local::now().date_naive())
		.bind(order.user_id)
		.execute(&mut *tx).await?;

	let mut item_id = first_item_id;
	for item in &order.data {
		if !books.contains(&item.book_id) {
			warnings.push(Warning::Book(item.book_id));
			continue;
		}
		if !shops.contains(&item.shop_id) {
			warnings.push(Warning::Shop(item.shop_id));
			continue;
		}
		sqlx::query(r#"
INSERT INTO order_item
	(order_item_id, order_id, book_id, shop_id, quantity)
VALUES
	(?, ?, ?, ?, ?)"#)
			.bind(item_id)
			.bind(order_id)
			.bind(item.book_id)
			.bind(item.shop_id)
			.bind(item.quantity)
			.execute(&mut *tx).await?;
		item_id += 1;
	}

	tx.commit().await?;

	info!(order_id, user_id = order.user_id, "line inserted in order");
	let inserted = item_id - first_item_id;
	if inserted > 0 {
		info!(
			inserted,
			first = first_item_id,
			last = item_id - 1,
			"lines inserted in order_item"
		);
	}
	Ok(warnings)
}

async fn known_ids(conn: &mut SqliteConnection, query: &str) -> Result<HashSet<i64>> {
	let ids: Vec<i64> = sqlx::query_scalar::<Sqlite, i64>(query)
		.fetch_all(&mut *conn).await?;
	Ok(ids.into_iter().collect())
}

async fn next_id(conn: &mut SqliteConnection, query: &str) -> Result<i64> {
	let id = sqlx::query_scalar::<Sqlite, i64>(query)
		.fetch_one(&mut *conn).await?;
	Ok(id)
}
