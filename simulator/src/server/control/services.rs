use super::Error;
use crate::server::state::Simulation;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use ccloud_sdk::connector::{
    Connector, ConnectorConfig, ConnectorId, ConnectorInfo, ConnectorTask, ConnectorsPayload,
    CreateConnectorPayload,
};
use ccloud_sdk::schema_registry::{
    SchemaRegistriesPayload, SchemaRegistry, SchemaRegistryCreatePayload, SchemaRegistryPayload,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// The config property naming the connector implementation.
const CONNECTOR_CLASS: &str = "connector.class";

/// The config property bounding the number of tasks.
const TASKS_MAX: &str = "tasks.max";

/// The schema quota of a simulated registry.
const MAX_SCHEMAS: u64 = 1000;

/// Query parameters for connector listings.
#[derive(Deserialize)]
pub(super) struct ExpandParams {
    expand: Option<String>,
}

/// Query parameters scoping a registry request to an environment.
#[derive(Deserialize)]
pub(super) struct RegistryParams {
    account_id: Option<String>,
}

/// Derives the connector definition from its config.
fn connector_info(name: &str, config: ConnectorConfig) -> Result<ConnectorInfo, Error> {
    let class = config
        .get(CONNECTOR_CLASS)
        .ok_or_else(|| Error::BadRequest(format!("{CONNECTOR_CLASS} is required")))?;
    let connector_type = if class.to_ascii_lowercase().contains("sink") {
        "sink"
    } else {
        "source"
    };
    let tasks_max = match config.get(TASKS_MAX) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| Error::BadRequest(format!("{TASKS_MAX} must be a number")))?,
        None => 1,
    };

    Ok(ConnectorInfo {
        name: name.to_string(),
        connector_type: connector_type.to_string(),
        tasks: (0..tasks_max)
            .map(|task_no| ConnectorTask {
                connector_name: name.to_string(),
                task_no,
            })
            .collect(),
        config,
    })
}

fn check_cluster(state: &Simulation, account_id: &str, cluster_id: &str) -> Result<(), Error> {
    if state.cluster_in(cluster_id, account_id) {
        Ok(())
    } else {
        Err(Error::NotFound(format!("cluster {cluster_id}")))
    }
}

pub(super) async fn list_connectors(
    State(state): State<Simulation>,
    Path((account_id, cluster_id)): Path<(String, String)>,
    Query(params): Query<ExpandParams>,
) -> Result<Json<ConnectorsPayload>, Error> {
    debug!(
        operation = "list_connectors",
        cluster_id = %cluster_id,
        expand = ?params.expand,
        "processing list request"
    );
    check_cluster(&state, &account_id, &cluster_id)?;

    let connectors = state
        .connectors
        .get(&cluster_id)
        .map(|connectors| connectors.value().clone())
        .unwrap_or_default();
    Ok(Json(connectors))
}

pub(super) async fn create_connector(
    State(state): State<Simulation>,
    Path((account_id, cluster_id)): Path<(String, String)>,
    Json(payload): Json<CreateConnectorPayload>,
) -> Result<Json<ConnectorInfo>, Error> {
    check_cluster(&state, &account_id, &cluster_id)?;
    if payload.name.is_empty() {
        return Err(Error::BadRequest("name is required".to_string()));
    }
    let info = connector_info(&payload.name, payload.config)?;

    let mut connectors = state.connectors.entry(cluster_id).or_default();
    if connectors.contains_key(&payload.name) {
        return Err(Error::Conflict(format!(
            "connector {} already exists",
            payload.name
        )));
    }
    connectors.insert(
        payload.name,
        Connector {
            id: ConnectorId {
                id: state.next_resource_id("lcc"),
                id_type: "ID".to_string(),
            },
            info: info.clone(),
        },
    );

    debug!(operation = "create_connector", name = %info.name, "connector created");
    Ok(Json(info))
}

pub(super) async fn update_connector_config(
    State(state): State<Simulation>,
    Path((account_id, cluster_id, name)): Path<(String, String, String)>,
    Json(config): Json<ConnectorConfig>,
) -> Result<Json<ConnectorInfo>, Error> {
    check_cluster(&state, &account_id, &cluster_id)?;
    let info = connector_info(&name, config)?;

    let mut connectors = state
        .connectors
        .get_mut(&cluster_id)
        .ok_or_else(|| Error::NotFound(format!("connector {name}")))?;
    let connector = connectors
        .get_mut(&name)
        .ok_or_else(|| Error::NotFound(format!("connector {name}")))?;
    connector.info = info.clone();

    Ok(Json(info))
}

pub(super) async fn delete_connector(
    State(state): State<Simulation>,
    Path((account_id, cluster_id, name)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, Error> {
    check_cluster(&state, &account_id, &cluster_id)?;

    state
        .connectors
        .get_mut(&cluster_id)
        .and_then(|mut connectors| connectors.remove(&name))
        .ok_or_else(|| Error::NotFound(format!("connector {name}")))?;

    debug!(operation = "delete_connector", name = %name, "connector deleted");
    Ok(Json(json!({})))
}

pub(super) async fn get_schema_registries(
    State(state): State<Simulation>,
    Query(params): Query<RegistryParams>,
) -> Result<Json<SchemaRegistriesPayload>, Error> {
    let account_id = params
        .account_id
        .ok_or_else(|| Error::BadRequest("account_id is required".to_string()))?;
    let clusters = state
        .schema_registries
        .get(&account_id)
        .map(|registry| vec![registry.value().clone()])
        .unwrap_or_default();
    Ok(Json(SchemaRegistriesPayload { clusters }))
}

pub(super) async fn create_schema_registry(
    State(state): State<Simulation>,
    Query(params): Query<RegistryParams>,
    Json(payload): Json<SchemaRegistryCreatePayload>,
) -> Result<Json<SchemaRegistryPayload>, Error> {
    let config = payload.config;
    if params.account_id.as_deref() != Some(config.account_id.as_str()) {
        return Err(Error::BadRequest(
            "account_id does not match the request".to_string(),
        ));
    }
    let organization_id = state
        .environments
        .get(&config.account_id)
        .map(|env| env.organization_id)
        .ok_or_else(|| Error::NotFound(format!("environment {}", config.account_id)))?;
    if state.schema_registries.contains_key(&config.account_id) {
        return Err(Error::Conflict(format!(
            "environment {} already has a schema registry",
            config.account_id
        )));
    }

    let id = state.next_resource_id("lsrc");
    let now = Utc::now();
    let registry = SchemaRegistry {
        endpoint: format!(
            "https://p{id}.{}.{}.confluent.cloud",
            config.location, config.service_provider
        ),
        id,
        name: config.name,
        kafka_cluster_id: config.kafka_cluster_id,
        created: Some(now),
        modified: Some(now),
        status: "UP".to_string(),
        physical_cluster_id: String::new(),
        account_id: config.account_id.clone(),
        organization_id,
        max_schemas: MAX_SCHEMAS,
    };
    state
        .schema_registries
        .insert(config.account_id, registry.clone());

    debug!(operation = "create_schema_registry", id = %registry.id, "schema registry created");
    Ok(Json(SchemaRegistryPayload { cluster: registry }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(class: &str) -> ConnectorConfig {
        let mut config = ConnectorConfig::new();
        config.insert(CONNECTOR_CLASS.to_string(), class.to_string());
        config
    }

    #[test]
    fn test_connector_type_ignores_case() {
        for class in ["S3_SINK", "S3SinkConnector", "io.confluent.BigQuerySink"] {
            let info = connector_info("c", config(class)).unwrap();
            assert_eq!(info.connector_type, "sink", "{class}");
        }
        for class in ["PostgresCdcSource", "DatagenSource"] {
            let info = connector_info("c", config(class)).unwrap();
            assert_eq!(info.connector_type, "source", "{class}");
        }
    }

    #[test]
    fn test_tasks_follow_tasks_max() {
        let info = connector_info("c", config("DatagenSource")).unwrap();
        assert_eq!(info.tasks.len(), 1);

        let mut with_tasks = config("DatagenSource");
        with_tasks.insert(TASKS_MAX.to_string(), "3".to_string());
        let info = connector_info("c", with_tasks).unwrap();
        assert_eq!(info.tasks.len(), 3);
        assert_eq!(info.tasks[2].task_no, 2);

        let mut invalid = config("DatagenSource");
        invalid.insert(TASKS_MAX.to_string(), "many".to_string());
        assert!(matches!(connector_info("c", invalid), Err(Error::BadRequest(_))));
        assert!(matches!(
            connector_info("c", ConnectorConfig::new()),
            Err(Error::BadRequest(_))
        ));
    }
}
