//! Access control lists of a cluster.

use super::Client;
use crate::{request, Client as SdkClient, Error};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

pub const PATH: &str = "acls";
pub const DELETE_PATH: &str = "delete";

/// The resources an ACL applies to.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AclPattern {
    /// e.g. `TOPIC`, `GROUP`, `CLUSTER`.
    pub resource_type: String,
    pub name: String,
    /// e.g. `LITERAL` or `PREFIXED`.
    pub pattern_type: String,
}

/// Who may do what, from where.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    /// e.g. `User:12345`.
    pub principal: String,
    pub operation: String,
    pub host: String,
    /// `ALLOW` or `DENY`.
    pub permission_type: String,
}

/// A pattern matching the resources of ACLs to delete.
pub type AclPatternFilter = AclPattern;

/// An entry matching the ACLs to delete.
pub type AclEntryFilter = AclEntry;

/// A single ACL.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AclBinding {
    pub pattern: AclPattern,
    pub entry: AclEntry,
}

/// A filter selecting ACLs to delete.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AclBindingFilter {
    pub pattern_filter: AclPatternFilter,
    pub entry_filter: AclEntryFilter,
}

impl Client {
    /// Creates ACLs, returning the bindings the cluster accepted.
    pub async fn create_acls(&self, bindings: &[AclBinding]) -> Result<Vec<AclBinding>, Error> {
        let url = self.endpoint(&[PATH])?;
        let req = self.request(Method::POST, url).json(bindings);
        request::send_json_or_default("create_acls", req).await
    }

    /// Deletes the ACLs matching any of `filters`.
    pub async fn delete_acls(
        &self,
        filters: &[AclBindingFilter],
    ) -> Result<Vec<AclBindingFilter>, Error> {
        let url = self.endpoint(&[PATH, DELETE_PATH])?;
        let req = self.request(Method::DELETE, url).json(filters);
        request::send_json_or_default("delete_acls", req).await
    }
}

impl SdkClient {
    /// Creates ACLs on a cluster, exchanging the session token for a cluster token first.
    pub async fn create_acls(
        &self,
        api_endpoint: &Url,
        cluster_id: &str,
        bindings: &[AclBinding],
    ) -> Result<Vec<AclBinding>, Error> {
        self.kafka_cluster(api_endpoint, cluster_id)
            .await?
            .create_acls(bindings)
            .await
    }

    /// Deletes ACLs on a cluster, exchanging the session token for a cluster token first.
    pub async fn delete_acls(
        &self,
        api_endpoint: &Url,
        cluster_id: &str,
        filters: &[AclBindingFilter],
    ) -> Result<Vec<AclBindingFilter>, Error> {
        self.kafka_cluster(api_endpoint, cluster_id)
            .await?
            .delete_acls(filters)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_wire_names() {
        let binding = AclBinding {
            pattern: AclPattern {
                resource_type: "TOPIC".to_string(),
                name: "orders".to_string(),
                pattern_type: "LITERAL".to_string(),
            },
            entry: AclEntry {
                principal: "User:42".to_string(),
                operation: "READ".to_string(),
                host: "*".to_string(),
                permission_type: "ALLOW".to_string(),
            },
        };
        let value = serde_json::to_value(vec![binding]).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "pattern": {"resourceType": "TOPIC", "name": "orders", "patternType": "LITERAL"},
                "entry": {"principal": "User:42", "operation": "READ", "host": "*", "permissionType": "ALLOW"}
            }])
        );
    }

    #[test]
    fn test_filter_wire_names() {
        let value = serde_json::to_value(AclBindingFilter::default()).unwrap();
        assert!(value.get("patternFilter").is_some());
        assert!(value.get("entryFilter").is_some());
    }
}
