use super::{Error, KafkaState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use ccloud_sdk::kafka::acl::{AclBinding, AclBindingFilter, AclEntry, AclPattern};
use tracing::debug;

const RESOURCE_TYPES: [&str; 4] = ["TOPIC", "GROUP", "CLUSTER", "TRANSACTIONAL_ID"];
const PATTERN_TYPES: [&str; 2] = ["LITERAL", "PREFIXED"];
const PERMISSION_TYPES: [&str; 2] = ["ALLOW", "DENY"];

/// Matches any value in a filter.
const ANY: &str = "ANY";

fn check_cluster(state: &KafkaState, cluster_id: &str) -> Result<(), Error> {
    if state.0.clusters.contains_key(cluster_id) {
        Ok(())
    } else {
        Err(Error::ClusterNotFound(cluster_id.to_string()))
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<(), Error> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidAcl(format!("invalid {field}: {value:?}")))
    }
}

fn validate(binding: &AclBinding) -> Result<(), Error> {
    check_one_of(
        "resourceType",
        &binding.pattern.resource_type,
        &RESOURCE_TYPES,
    )?;
    check_one_of("patternType", &binding.pattern.pattern_type, &PATTERN_TYPES)?;
    check_one_of(
        "permissionType",
        &binding.entry.permission_type,
        &PERMISSION_TYPES,
    )?;
    if binding.pattern.name.is_empty() {
        return Err(Error::InvalidAcl("resource name is required".to_string()));
    }
    if binding.entry.principal.is_empty() {
        return Err(Error::InvalidAcl("principal is required".to_string()));
    }
    Ok(())
}

fn field_matches(filter: &str, value: &str) -> bool {
    filter.is_empty() || filter == ANY || filter == value
}

fn pattern_matches(filter: &AclPattern, pattern: &AclPattern) -> bool {
    field_matches(&filter.resource_type, &pattern.resource_type)
        && field_matches(&filter.name, &pattern.name)
        && field_matches(&filter.pattern_type, &pattern.pattern_type)
}

fn entry_matches(filter: &AclEntry, entry: &AclEntry) -> bool {
    field_matches(&filter.principal, &entry.principal)
        && field_matches(&filter.operation, &entry.operation)
        && field_matches(&filter.host, &entry.host)
        && field_matches(&filter.permission_type, &entry.permission_type)
}

fn filter_matches(filter: &AclBindingFilter, binding: &AclBinding) -> bool {
    pattern_matches(&filter.pattern_filter, &binding.pattern)
        && entry_matches(&filter.entry_filter, &binding.entry)
}

pub(super) async fn create_acls(
    State(state): State<KafkaState>,
    Path(cluster_id): Path<String>,
    Json(bindings): Json<Vec<AclBinding>>,
) -> Result<(StatusCode, Json<Vec<AclBinding>>), Error> {
    check_cluster(&state, &cluster_id)?;
    for binding in &bindings {
        validate(binding)?;
    }

    let mut acls = state.0.acls.entry(cluster_id.clone()).or_default();
    for binding in &bindings {
        if !acls.contains(binding) {
            acls.push(binding.clone());
        }
    }

    debug!(
        operation = "create_acls",
        cluster_id = %cluster_id,
        count = bindings.len(),
        total = acls.len(),
        "acls created"
    );
    Ok((StatusCode::CREATED, Json(bindings)))
}

pub(super) async fn delete_acls(
    State(state): State<KafkaState>,
    Path(cluster_id): Path<String>,
    Json(filters): Json<Vec<AclBindingFilter>>,
) -> Result<Json<Vec<AclBindingFilter>>, Error> {
    check_cluster(&state, &cluster_id)?;

    let mut matched = Vec::new();
    if let Some(mut acls) = state.0.acls.get_mut(&cluster_id) {
        for filter in filters {
            let before = acls.len();
            acls.retain(|binding| !filter_matches(&filter, binding));
            if acls.len() != before {
                matched.push(filter);
            }
        }
    }

    debug!(
        operation = "delete_acls",
        cluster_id = %cluster_id,
        matched = matched.len(),
        "acls deleted"
    );
    Ok(Json(matched))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: &str, operation: &str) -> AclBinding {
        AclBinding {
            pattern: AclPattern {
                resource_type: "TOPIC".to_string(),
                name: name.to_string(),
                pattern_type: "LITERAL".to_string(),
            },
            entry: AclEntry {
                principal: "User:1".to_string(),
                operation: operation.to_string(),
                host: "*".to_string(),
                permission_type: "ALLOW".to_string(),
            },
        }
    }

    #[test]
    fn test_validate() {
        assert!(validate(&binding("orders", "READ")).is_ok());

        let mut bad = binding("orders", "READ");
        bad.pattern.pattern_type = "MATCH".to_string();
        assert!(matches!(validate(&bad), Err(Error::InvalidAcl(_))));

        let mut bad = binding("orders", "READ");
        bad.pattern.resource_type = "QUEUE".to_string();
        assert!(matches!(validate(&bad), Err(Error::InvalidAcl(_))));

        let mut bad = binding("orders", "READ");
        bad.entry.principal.clear();
        assert!(matches!(validate(&bad), Err(Error::InvalidAcl(_))));
    }

    #[test]
    fn test_filter_wildcards() {
        let acl = binding("orders", "READ");

        assert!(filter_matches(&AclBindingFilter::default(), &acl));

        let mut filter = AclBindingFilter::default();
        filter.pattern_filter.name = "orders".to_string();
        filter.entry_filter.operation = ANY.to_string();
        assert!(filter_matches(&filter, &acl));

        filter.entry_filter.operation = "WRITE".to_string();
        assert!(!filter_matches(&filter, &acl));
    }
}
