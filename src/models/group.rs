//! Edge Connector group data model.

use super::{null_as_default, EcVm};
use serde::{Deserialize, Serialize};

/// Reference to another API object (e.g. a location).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GeneralPurpose {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A cloud connector group and its member VMs.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EcGroup {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "desc", deserialize_with = "null_as_default")]
    pub description: String,
    /// Cloud region code, reported in `awsRegion` for every platform.
    #[serde(deserialize_with = "null_as_default")]
    pub aws_region: String,
    /// Platform tag such as `AWS` or `GCP`.
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub deploy_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tunnel_mode: String,
    pub max_ec_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub aws_availability_zone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: Vec<String>,
    pub location: Option<GeneralPurpose>,
    #[serde(rename = "ecVMs", deserialize_with = "null_as_default")]
    pub ec_vms: Vec<EcVm>,
}
