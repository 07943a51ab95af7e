// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

// Appended after the generated units and run by trybuild.

use sqlx::{Connection, SqliteConnection};

async fn open(tables: &[&str]) -> SqliteConnection {
    let mut conn = SqliteConnection::connect("sqlite::memory:").await.unwrap();
    for table in tables {
        sqlx::query(table).execute(&mut conn).await.unwrap();
    }
    conn
}

async fn count(conn: &mut SqliteConnection, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(conn).await.unwrap()
}

fn widget(name: &str, tag: Option<&str>) -> Widget {
    Widget {
        id:   0,
        name: name.to_string(),
        tag:  tag.map(str::to_string)
    }
}

fn forward(network_id: i64, listen_address: &str, config: &[(&str, &str)]) -> NetworkForward {
    NetworkForward {
        id: 0,
        network_id,
        node_id: None,
        location: None,
        listen_address: listen_address.to_string(),
        description: "edge".to_string(),
        ports: vec![Port {
            protocol:       "tcp".to_string(),
            listen_port:    "80".to_string(),
            target_address: "10.0.0.2".to_string()
        }],
        config: config.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }
}

async fn widget_lifecycle() {
    let mut conn = open(&[
        "CREATE TABLE widgets (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, tag TEXT)"
    ])
    .await;

    let first = create_widget(&mut conn, &widget("bolt", Some("m8"))).await.unwrap();
    let second = create_widget(&mut conn, &widget("nut", None)).await.unwrap();
    assert_ne!(first, second);

    let loaded = get_widget(&mut conn, first).await.unwrap();
    assert_eq!(loaded.id, first);
    assert_eq!(loaded.name, "bolt");
    assert_eq!(loaded.tag.as_deref(), Some("m8"));
    assert_eq!(get_widget_id(&mut conn, second).await.unwrap(), second);

    let mut changed = loaded;
    changed.name = "screw".to_string();
    changed.tag = None;
    update_widget(&mut conn, first, &changed).await.unwrap();
    let updated = get_widget(&mut conn, first).await.unwrap();
    assert_eq!(updated.name, "screw");
    assert_eq!(updated.tag, None);
    let untouched = get_widget(&mut conn, second).await.unwrap();
    assert_eq!(untouched.name, "nut");

    let by_name = get_widgets(&mut conn, &WidgetFilter {
        name: Some("nut".to_string())
    })
    .await
    .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, second);
    let all = get_widgets(&mut conn, &WidgetFilter { name: None }).await.unwrap();
    assert_eq!(all.len(), 2);

    delete_widget(&mut conn, first).await.unwrap();
    assert!(matches!(
        get_widget(&mut conn, first).await,
        Err(dbmapper_core::Error::NotFound { entity: "widget" })
    ));
    assert!(!widget_exists(&mut conn, first).await.unwrap());
    assert!(widget_exists(&mut conn, second).await.unwrap());
    assert!(matches!(
        delete_widget(&mut conn, first).await,
        Err(dbmapper_core::Error::NotFound { .. })
    ));

    assert_eq!(delete_widgets(&mut conn, "nut").await.unwrap(), 1);
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM widgets").await, 0);
}

async fn ambiguous_writes_roll_back() {
    let mut conn = open(&[
        "CREATE TABLE widgets (id INTEGER NOT NULL, name TEXT NOT NULL, tag TEXT)",
        "INSERT INTO widgets (id, name) VALUES (1, 'a'), (1, 'b'), (2, 'c')"
    ])
    .await;

    let err = update_widget(&mut conn, 1, &widget("z", None)).await.unwrap_err();
    assert!(matches!(err, dbmapper_core::Error::Consistency { count: 2, .. }), "{err}");
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM widgets WHERE name = 'z'").await, 0);

    let err = delete_widget(&mut conn, 1).await.unwrap_err();
    assert!(matches!(err, dbmapper_core::Error::Consistency { count: 2, .. }), "{err}");
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM widgets").await, 3);

    update_widget(&mut conn, 2, &widget("d", None)).await.unwrap();
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM widgets WHERE name = 'd'").await, 1);
}

async fn forward_lifecycle() {
    let mut conn = open(&[
        "CREATE TABLE nodes (id INTEGER PRIMARY KEY, name TEXT NOT NULL)",
        "CREATE TABLE networks_forwards (id INTEGER PRIMARY KEY AUTOINCREMENT, \
         network_id INTEGER NOT NULL, node_id INTEGER, listen_address TEXT NOT NULL, \
         description TEXT NOT NULL, ports TEXT NOT NULL)",
        "CREATE TABLE networks_forwards_config (network_forward_id INTEGER NOT NULL, \
         key TEXT NOT NULL, value TEXT NOT NULL)"
    ])
    .await;

    let id = create_network_forward(&mut conn, &forward(7, "10.0.0.1", &[("mode", "nat")]))
        .await
        .unwrap();
    let loaded = get_network_forward(&mut conn, 7, "10.0.0.1").await.unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.description, "edge");
    assert_eq!(loaded.location, None);
    assert_eq!(loaded.ports.len(), 1);
    assert_eq!(loaded.ports[0].target_address, "10.0.0.2");
    assert_eq!(loaded.config.get("mode").map(String::as_str), Some("nat"));

    let err = create_network_forward(&mut conn, &forward(7, "10.0.0.1", &[("mode", "route")]))
        .await
        .unwrap_err();
    assert!(matches!(err, dbmapper_core::Error::Conflict { entity: "network_forward" }), "{err}");
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM networks_forwards").await, 1);
    assert_eq!(count(&mut conn, "SELECT COUNT(*) FROM networks_forwards_config").await, 1);

    create_network_forward(&mut conn, &forward(8, "10.0.0.1", &[])).await.unwrap();
    let mut changed = forward(7, "10.0.0.1", &[("mtu", "1400")]);
    changed.description = "core".to_string();
    update_network_forward(&mut conn, 7, "10.0.0.1", &changed).await.unwrap();
    let updated = get_network_forward(&mut conn, 7, "10.0.0.1").await.unwrap();
    assert_eq!(updated.description, "core");
    assert_eq!(updated.config.len(), 1);
    assert_eq!(updated.config.get("mtu").map(String::as_str), Some("1400"));
    let other = get_network_forward(&mut conn, 8, "10.0.0.1").await.unwrap();
    assert_eq!(other.description, "edge");

    let in_network = get_network_forwards(&mut conn, &NetworkForwardFilter {
        network_id:     Some(7),
        listen_address: None
    })
    .await
    .unwrap();
    assert_eq!(in_network.len(), 1);
    assert_eq!(in_network[0].config.len(), 1);

    delete_network_forward(&mut conn, 7, "10.0.0.1").await.unwrap();
    assert!(!network_forward_exists(&mut conn, 7, "10.0.0.1").await.unwrap());
    assert!(matches!(
        get_network_forward(&mut conn, 7, "10.0.0.1").await,
        Err(dbmapper_core::Error::NotFound { .. })
    ));
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    widget_lifecycle().await;
    ambiguous_writes_roll_back().await;
    forward_lifecycle().await;
}
