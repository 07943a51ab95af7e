// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Transaction method generation.
//!
//! # Generated Functions
//!
//! | Kind | Function | Returns |
//! |------|----------|---------|
//! | `GetMany` | `get_<entities>(conn, filter)` | `Vec<Entity>` |
//! | `GetOne` | `get_<entity>(conn, <natural key>)` | `Entity` |
//! | `ID` | `get_<entity>_id(conn, <natural key>)` | row id |
//! | `Exists` | `<entity>_exists(conn, <natural key>)` | `bool` |
//! | `Create` | `create_<entity>(conn, object)` | row id |
//! | `Update` | `update_<entity>(conn, <primary key>, object)` | `()` |
//! | `DeleteOne-by-..` | `delete_<entity>(conn, <filters>)` | `()` |
//! | `DeleteMany-by-..` | `delete_<entities>(conn, <filters>)` | `u64` |
//!
//! Every function takes the connection first and returns
//! `Result<_, dbmapper_core::Error>`. The statements a method runs are
//! returned with it, together with the reference helpers it calls.
//!
//! # Module Structure
//!
//! ```text
//! method/
//! ├── context.rs    → Shared identifiers and token fragments
//! ├── read.rs       → GetMany, GetOne, ID, Exists
//! ├── write.rs      → Create, Update, DeleteOne, DeleteMany
//! └── reference.rs  → get/create/update helpers of reference entities
//! ```

pub(crate) mod context;
mod read;
mod reference;
mod write;

use self::context::Context;
use super::{
    iface,
    kind::MethodKind,
    output::Generated,
    parse::{Dialect, EntityDef, Reference}
};
use crate::{Config, Result};

/// Generate the method `kind` of `entity`.
///
/// With `iface` set, [`Generated::signatures`] holds a body-less projection
/// of every generated function.
///
/// # Errors
///
/// Config errors, unresolved references and any statement error of the
/// statements the method runs.
pub fn generate(
    entity: &EntityDef,
    kind: &MethodKind,
    config: &Config,
    dialect: Dialect,
    iface: bool
) -> Result<Generated> {
    let entity_name = entity.name_str();
    let table = config
        .table(&entity_name)?
        .map_or_else(|| entity.table.clone(), str::to_string);
    let references = config
        .references(&entity_name)?
        .into_iter()
        .map(|name| entity.reference(name))
        .collect::<Result<Vec<&Reference>>>()?;

    let ctx = Context::new(entity, dialect, table);
    let mut out = Generated::new(entity.name().clone());
    match kind {
        MethodKind::GetMany => read::get_many(&ctx, &references, &mut out)?,
        MethodKind::GetOne => read::get_one(&ctx, &references, &mut out)?,
        MethodKind::Id => read::id(&ctx, &mut out)?,
        MethodKind::Exists => read::exists(&ctx, &mut out)?,
        MethodKind::Create => write::create(&ctx, &references, &mut out)?,
        MethodKind::Update => write::update(&ctx, &references, &mut out)?,
        MethodKind::DeleteOne(filters) => write::delete_one(&ctx, filters, &mut out)?,
        MethodKind::DeleteMany(filters) => write::delete_many(&ctx, filters, &mut out)?
    }

    if iface {
        out.signatures = out.items.iter().map(iface::project).collect();
    }

    tracing::debug!(
        entity = %entity_name,
        kind = %kind,
        table = %ctx.table,
        statements = out.statements.len(),
        functions = out.items.len(),
        "method generated"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, entity::fixtures::entity};

    fn method(name: &str, kind: &str, config: &Config) -> Result<Generated> {
        generate(&entity(name), &kind.parse()?, config, Dialect::Sqlite, false)
    }

    fn names(out: &Generated) -> Vec<String> {
        out.items.iter().map(|i| i.name().to_string()).collect()
    }

    fn statements(out: &Generated) -> Vec<String> {
        out.statements.iter().map(|s| s.name.to_string()).collect()
    }

    #[test]
    fn get_many_covers_every_filter_pattern() {
        let out = method("NetworkForward", "GetMany", &Config::new()).unwrap();
        assert_eq!(names(&out), ["get_network_forwards"]);
        assert_eq!(out.statements.len(), 8);
        assert_eq!(
            out.statements.last().unwrap().name.to_string(),
            "NETWORK_FORWARD_OBJECTS"
        );

        let body = out.items[0].body.to_string();
        assert_eq!(body.matches("=> sqlx :: query").count(), 8);
        assert!(body.contains("(None , None , None ,) => sqlx :: query (NETWORK_FORWARD_OBJECTS)"));
    }

    #[test]
    fn get_many_requires_filter_type() {
        let err = method("Profile", "GetMany", &Config::new()).unwrap_err();
        assert!(matches!(err, Error::MissingFilterType { ref filter, .. } if filter == "ProfileFilter"));
    }

    #[test]
    fn get_one_uses_natural_key() {
        let out = method("NetworkForward", "GetOne", &Config::new()).unwrap();
        assert_eq!(statements(&out), [
            "NETWORK_FORWARD_OBJECTS_BY_NETWORK_ID_AND_LISTEN_ADDRESS"
        ]);

        let sig = &out.items[0].sig;
        let sig = quote::quote! { #sig }.to_string();
        assert!(sig.contains("network_id : i64 , listen_address : & str"), "{sig}");
        assert!(out.items[0].body.to_string().contains("dbmapper_core :: exactly_one"));
    }

    #[test]
    fn get_one_loads_references() {
        let config = Config::new().with("references", "Config");
        let out = method("NetworkForward", "GetOne", &config).unwrap();
        assert_eq!(names(&out), ["get_network_forward_config", "get_network_forward"]);
        assert!(
            statements(&out)
                .contains(&"NETWORK_FORWARD_CONFIG_OBJECTS_BY_NETWORK_FORWARD_ID".to_string())
        );

        let body = out.items[1].body.to_string();
        assert!(body.contains("object . config = get_network_forward_config (& mut * conn , object . id) . await ?"));
    }

    #[test]
    fn exists_does_not_raise_not_found() {
        let out = method("Widget", "Exists", &Config::new()).unwrap();
        assert_eq!(names(&out), ["widget_exists"]);
        let body = out.items[0].body.to_string();
        assert!(body.contains("fetch_optional"));
        assert!(body.contains("Ok (id . is_some ())"));
    }

    #[test]
    fn id_needs_row_id() {
        let err = method("Device", "ID", &Config::new()).unwrap_err();
        assert!(matches!(err, Error::NoRowId { .. }));
    }

    #[test]
    fn create_is_one_transaction() {
        let config = Config::new().with("references", "Config");
        let out = method("NetworkForward", "Create", &config).unwrap();
        assert_eq!(names(&out), ["create_network_forward_config", "create_network_forward"]);

        let body = out.items[1].body.to_string();
        let begin = body.find("sqlx :: Connection :: begin").unwrap();
        let check = body.find("NETWORK_FORWARD_ID").unwrap();
        let insert = body.find("NETWORK_FORWARD_CREATE").unwrap();
        let refs = body.find("create_network_forward_config (& mut * tx , id").unwrap();
        let commit = body.find("tx . commit ()").unwrap();
        assert!(begin < check && check < insert && insert < refs && refs < commit);
        assert!(body.contains("dbmapper_core :: Error :: Conflict"));
        assert!(body.contains("last_insert_rowid"));
    }

    #[test]
    fn create_skips_check_when_key_has_row_id() {
        let out = method("Widget", "Create", &Config::new()).unwrap();
        assert_eq!(statements(&out), ["WIDGET_CREATE"]);
        assert!(!out.items[0].body.to_string().contains("Conflict"));
    }

    #[test]
    fn create_list_reference() {
        let config = Config::new().with("references", "Devices");
        let out = method("Profile", "Create", &config).unwrap();
        let helper = out.items[0].body.to_string();
        assert!(helper.contains("for item in devices"), "{helper}");
        assert!(helper.contains(". bind (profile_id) . bind (& item . name) . bind (& item . kind)"));
    }

    #[test]
    fn postgres_create_returns_id() {
        let out = generate(
            &entity("Widget"),
            &MethodKind::Create,
            &Config::new(),
            Dialect::Postgres,
            false
        )
        .unwrap();
        assert!(out.statements[0].sql.ends_with("RETURNING id"));
        assert!(out.items[0].body.to_string().contains("sqlx :: query_scalar (WIDGET_CREATE)"));
    }

    #[test]
    fn update_replaces_references() {
        let config = Config::new().with("references", "Config");
        let out = method("NetworkForward", "Update", &config).unwrap();
        assert_eq!(names(&out), ["update_network_forward_config", "update_network_forward"]);

        let helper = out.items[0].body.to_string();
        let delete = helper.find("NETWORK_FORWARD_CONFIG_DELETE_BY_NETWORK_FORWARD_ID").unwrap();
        let insert = helper.find("NETWORK_FORWARD_CONFIG_CREATE").unwrap();
        assert!(delete < insert);

        let body = out.items[1].body.to_string();
        assert!(body.contains("dbmapper_core :: affected_one"));
        assert!(body.contains("dbmapper_core :: found (id"));
    }

    #[test]
    fn update_checks_row_count_before_commit() {
        let out = method("Widget", "Update", &Config::new()).unwrap();
        let body = out.items[0].body.to_string();
        let begin = body.find("begin").unwrap();
        let check = body.find("affected_one").unwrap();
        let commit = body.find("commit").unwrap();
        assert!(begin < check && check < commit);
        assert!(body.contains("execute (& mut * tx)"));
        assert!(body.contains(". bind (& object . name) . bind (& object . tag) . bind (id)"));
    }

    #[test]
    fn delete_methods() {
        let out = method("NetworkForward", "DeleteOne-by-NetworkID-and-ListenAddress", &Config::new()).unwrap();
        assert_eq!(names(&out), ["delete_network_forward"]);
        let body = out.items[0].body.to_string();
        let check = body.find("affected_one").unwrap();
        assert!(body.find("begin").unwrap() < check);
        assert!(check < body.find("commit").unwrap());

        let out = method("NetworkForward", "DeleteMany-by-NetworkID", &Config::new()).unwrap();
        assert_eq!(names(&out), ["delete_network_forwards"]);
        assert!(out.items[0].body.to_string().contains("Ok (result . rows_affected ())"));
    }

    #[test]
    fn delete_rejects_join_filters() {
        let err = method("NetworkForward", "DeleteOne-by-Location", &Config::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFilterField { .. }));
    }

    #[test]
    fn unknown_reference() {
        let config = Config::new().with("references", "Peers");
        let err = method("NetworkForward", "Create", &config).unwrap_err();
        assert!(matches!(err, Error::UnknownReference { ref reference, .. } if reference == "Peers"));
    }

    #[test]
    fn table_override() {
        let config = Config::new().with("table", "legacy_widgets");
        let out = method("Widget", "ID", &config).unwrap();
        assert_eq!(out.statements[0].sql, "SELECT id FROM legacy_widgets WHERE id = ?");
    }

    #[test]
    fn iface_projects_every_function() {
        let config = Config::new().with("references", "Config");
        let out = generate(
            &entity("NetworkForward"),
            &MethodKind::Create,
            &config,
            Dialect::Sqlite,
            true
        )
        .unwrap();
        assert_eq!(out.signatures.len(), out.items.len());
        assert!(out.signatures.iter().all(|s| s.to_string().ends_with(';')));
    }
}
