// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Runtime contracts exercised against an in-memory SQLite database.
//!
//! Generated Create/Update methods rely on three behaviours checked here:
//! unique violations surface as conflicts, a dropped transaction rolls back,
//! and a nested `begin` is a savepoint that can fail without taking the outer
//! transaction down.

use dbmapper_core::{Error, affected_one, found};
use sqlx::{Connection, SqliteConnection};

const CREATE: &str = "INSERT INTO widgets (name, tag) VALUES (?, ?)";

async fn connect() -> SqliteConnection {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
    sqlx::query(
        "CREATE TABLE widgets (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE, tag TEXT)"
    )
    .execute(&mut conn)
    .await
    .unwrap();
    conn
}

async fn count(conn: &mut SqliteConnection) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM widgets")
        .fetch_one(conn)
        .await
        .unwrap()
}

#[tokio::test]
async fn unique_violation_is_conflict() {
    let mut conn = connect().await;
    sqlx::query(CREATE)
        .bind("a")
        .bind(None::<String>)
        .execute(&mut conn)
        .await
        .unwrap();

    let err = sqlx::query(CREATE)
        .bind("a")
        .bind(Some("x"))
        .execute(&mut conn)
        .await
        .map_err(|err| Error::from_write(err, "widget"))
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(err.to_string(), "this \"widget\" entry already exists");
}

#[tokio::test]
async fn dropped_transaction_rolls_back() {
    let mut conn = connect().await;
    {
        let mut tx = conn.begin().await.unwrap();
        sqlx::query(CREATE)
            .bind("a")
            .bind(None::<String>)
            .execute(&mut *tx)
            .await
            .unwrap();
    }

    assert_eq!(count(&mut conn).await, 0);
}

#[tokio::test]
async fn nested_begin_is_a_savepoint() {
    let mut conn = connect().await;
    let mut outer = conn.begin().await.unwrap();
    sqlx::query(CREATE)
        .bind("kept")
        .bind(None::<String>)
        .execute(&mut *outer)
        .await
        .unwrap();

    {
        let mut inner = Connection::begin(&mut *outer).await.unwrap();
        sqlx::query(CREATE)
            .bind("discarded")
            .bind(None::<String>)
            .execute(&mut *inner)
            .await
            .unwrap();
    }

    outer.commit().await.unwrap();
    assert_eq!(count(&mut conn).await, 1);
}

#[tokio::test]
async fn update_row_count_contract() {
    let mut conn = connect().await;
    sqlx::query(CREATE)
        .bind("a")
        .bind(None::<String>)
        .execute(&mut conn)
        .await
        .unwrap();

    let result = sqlx::query("UPDATE widgets SET tag = ? WHERE name = ?")
        .bind("t")
        .bind("a")
        .execute(&mut conn)
        .await
        .unwrap();
    assert!(affected_one(result.rows_affected(), "widget").is_ok());

    let result = sqlx::query("UPDATE widgets SET tag = ? WHERE name = ?")
        .bind("t")
        .bind("missing")
        .execute(&mut conn)
        .await
        .unwrap();
    assert!(
        affected_one(result.rows_affected(), "widget")
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn id_lookup_maps_absence() {
    let mut conn = connect().await;
    let row: Option<i64> = sqlx::query_scalar("SELECT id FROM widgets WHERE name = ?")
        .bind("a")
        .fetch_optional(&mut conn)
        .await
        .unwrap();

    assert!(found(row, "widget").unwrap_err().is_not_found());
}
