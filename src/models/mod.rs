//! Domain models for Edge Connector groups.
//!
//! - [`EcGroup`] - a cloud connector group
//! - [`EcVm`] and [`EcInstance`] - member VMs and their network instances

mod group;
mod vm;

pub use group::{EcGroup, GeneralPurpose};
pub use vm::{EcInstance, EcVm, NetworkRange, OPERATIONAL_INACTIVE, STATUS_DELETING};

use serde::{Deserialize, Deserializer};

/// The API omits empty fields but sometimes sends explicit `null`, treat both as the zero value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
