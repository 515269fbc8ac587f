//! Edge Connector VM data model.

use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Operational status that makes a VM a deletion candidate.
pub const OPERATIONAL_INACTIVE: &str = "INACTIVE";
/// Status tag set while the vendor is already removing the VM.
pub const STATUS_DELETING: &str = "DELETING";

/// A single Edge Connector VM inside a group.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EcVm {
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub operational_status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub form_factor: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_version: String,
    /// Epoch seconds, 0 when never upgraded.
    pub last_upgrade_time: i64,
    pub upgrade_status: i64,
    pub upgrade_start_time: i64,
    pub upgrade_end_time: i64,
    #[serde(rename = "ecInstances", deserialize_with = "null_as_default")]
    pub ec_instances: Vec<EcInstance>,
}

impl EcVm {
    /// Name suffix after the last hyphen, the whole name when there is none.
    pub fn suffix(&self) -> &str {
        self.name.rsplit('-').next().unwrap_or(&self.name)
    }

    pub fn is_inactive(&self) -> bool {
        self.operational_status == OPERATIONAL_INACTIVE
    }

    pub fn is_deleting(&self) -> bool {
        self.status.iter().any(|s| s == STATUS_DELETING)
    }

    /// Start of the service network of the first instance.
    pub fn service_ip(&self) -> Option<&str> {
        self.ec_instances
            .first()
            .and_then(|i| i.service_nw.as_ref())
            .map(|nw| nw.ip_start.as_str())
            .filter(|ip| !ip.is_empty())
    }
}

/// Network instance of a VM.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EcInstance {
    #[serde(deserialize_with = "null_as_default")]
    pub ec_instance_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub out_gw_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nat_ip: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dns_ip: Vec<String>,
    pub service_nw: Option<NetworkRange>,
    pub virtual_nw: Option<NetworkRange>,
}

/// Address range of a service or virtual network.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkRange {
    #[serde(deserialize_with = "null_as_default")]
    pub ip_start: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_end: String,
    #[serde(deserialize_with = "null_as_default")]
    pub netmask: String,
    #[serde(deserialize_with = "null_as_default")]
    pub default_gateway: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nw_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dns: Vec<String>,
}
