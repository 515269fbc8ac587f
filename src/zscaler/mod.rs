//! Zscaler Cloud Connector (ZCON) API interaction.
//!
//! - [`auth`] - session login payload
//! - [`client`] - HTTP client and the [`ManagementApi`] seam
//! - [`pagination`] - fetching every page of a collection

mod auth;
mod client;
mod pagination;

pub use auth::{obfuscate_api_key, AuthRequest};
pub use client::{ManagementApi, ZconClient};
pub use pagination::fetch_all;

/// Collection resource for Edge Connector groups.
pub const EC_GROUP_ENDPOINT: &str = "/ecgroup";

/// Path of a single VM inside a group.
pub fn vm_path(group_id: i64, vm_id: i64) -> String {
    format!("{EC_GROUP_ENDPOINT}/{group_id}/vm/{vm_id}")
}
