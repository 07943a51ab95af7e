// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub protocol:       String,
    pub listen_port:    String,
    pub target_address: String
}

#[mapper(table = "networks_forwards")]
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
    pub network_id:     Option<i64>,
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
    pub email: String,
    pub devices: Vec<Device>
}

pub struct Device {
    #[db = "primary=yes"]
    pub name: String,
    pub kind: String
}
