//! Terminal report lines for groups and VMs.

use crate::models::{EcGroup, EcVm};
use chrono::{TimeZone, Utc};
use itertools::Itertools;
use std::fmt::Display;

pub const GROUP_SEPARATOR: &str = "########################################";

/// Cloud platform of a group, used to pick a Nerd Font glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Aws,
    Gcp,
    Other,
}

impl Platform {
    pub fn from_tag(tag: &str) -> Platform {
        match tag.to_uppercase().as_str() {
            "AWS" => Platform::Aws,
            "GCP" => Platform::Gcp,
            _ => Platform::Other,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Platform::Aws => "\u{f270}",
            Platform::Gcp => "\u{e7b2}",
            // generic cloud
            Platform::Other => "\u{f015f}",
        }
    }
}

/// Epoch seconds in `tz` as `DD-MM-YYYY HH:MM:SS`, `None` for the 0 sentinel.
pub fn format_last_upgrade<Tz>(epoch: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if epoch == 0 {
        return "None".to_string();
    }
    match Utc.timestamp_opt(epoch, 0).single() {
        Some(t) => t.with_timezone(tz).format("%d-%m-%Y %H:%M:%S").to_string(),
        None => {
            log::warn!("lastUpgradeTime out of range: {epoch}");
            epoch.to_string()
        }
    }
}

/// Header line of a group (without the separator).
pub fn format_group_header(group: &EcGroup) -> String {
    format!(
        "### ⊳ {icon} {platform} - Group ({id}) ==> {name} [{region}] with {count} ECVMs ###",
        icon = Platform::from_tag(&group.platform).icon(),
        platform = group.platform,
        id = group.id,
        name = group.name,
        region = group.aws_region,
        count = group.ec_vms.len(),
    )
}

/// One report line for a VM, times rendered in `tz`.
pub fn format_vm_line<Tz>(vm: &EcVm, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let ip = match vm.service_ip() {
        Some(ip) => ip,
        None => {
            log::warn!("ECVM {} ({}) has no service network instance", vm.name, vm.id);
            "unknown"
        }
    };
    format!(
        "\t - Id: {id}\tSuffix: {suffix}\tOpStatus: {op}\tLastUpgrade: {upgraded}\t\tStatus: [{status}]\tIP: {ip}",
        id = vm.id,
        suffix = vm.suffix(),
        op = vm.operational_status,
        upgraded = format_last_upgrade(vm.last_upgrade_time, tz),
        status = vm.status.iter().join(" "),
    )
}

/// Separator and header printed before the VMs of a group.
pub fn group_banner(group: &EcGroup) -> String {
    format!("{GROUP_SEPARATOR}\n\n{}\n", format_group_header(group))
}
