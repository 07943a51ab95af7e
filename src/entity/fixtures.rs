// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entities shared by generator tests.

use crate::{
    entity::parse::EntityDef,
    source::{Catalog, MetadataProvider}
};

pub const SOURCE: &str = r#"
    use std::collections::BTreeMap;

    pub struct NetworkForward {
        pub id: i64,
        #[db = "primary=yes"]
        pub network_id: i64,
        #[db = "nullable=true"]
        pub node_id: Option<i64>,
        #[db = "leftjoin=nodes.name"]
        pub location: Option<String>,
        #[db = "primary=yes"]
        pub listen_address: String,
        pub description: String,
        #[db = "marshal=json"]
        pub ports: Vec<Port>,
        pub config: BTreeMap<String, String>
    }

    pub struct NetworkForwardFilter {
        pub network_id: Option<i64>,
        pub node_id: Option<i64>,
        pub listen_address: Option<String>
    }

    #[mapper(table = "widgets")]
    pub struct Widget {
        #[db = "primary=yes"]
        pub id: i64,
        pub name: String,
        #[db = "nullable=true"]
        pub tag: Option<String>
    }

    pub struct WidgetFilter {
        pub name: Option<String>
    }

    pub struct Profile {
        pub id: i64,
        #[db = "primary=yes"]
        pub name: String,
        pub devices: Vec<Device>
    }

    pub struct Device {
        #[db = "primary=yes"]
        pub name: String,
        pub kind: String
    }
"#;

pub fn catalog() -> Catalog {
    Catalog::from_source(SOURCE).unwrap()
}

pub fn entity(name: &str) -> EntityDef {
    let catalog = catalog();
    let desc = catalog.describe(name).unwrap();
    let filter = catalog.describe(&format!("{name}Filter"));
    let mut entity = EntityDef::build(&desc, filter.as_ref()).unwrap();
    entity.resolve_references(&catalog).unwrap();
    entity
}
