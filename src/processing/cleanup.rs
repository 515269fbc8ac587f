//! Walk groups and their VMs in fetch order, reporting each and handing
//! INACTIVE ones to the deletion guard.

use super::guard::{classify, Confirmer, DeletionGuard, Eligibility, Sleeper, Verdict};
use super::{emit, RawPayload};
use crate::error::Result;
use crate::models::EcGroup;
use crate::output::{format_vm_line, group_banner, DebugOutput};
use crate::zscaler::ManagementApi;
use chrono::{TimeZone, Utc};
use colored::Colorize;
use std::fmt::{self, Display};
use std::io::Write;

/// Tally of one walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupSummary {
    pub groups: usize,
    pub vms: usize,
    pub skipped: usize,
    pub already_deleting: usize,
    pub dry_run: usize,
    pub cancelled: usize,
    pub deleted: usize,
}

impl CleanupSummary {
    fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Skipped => self.skipped += 1,
            Verdict::AlreadyDeleting => self.already_deleting += 1,
            Verdict::DryRun => self.dry_run += 1,
            Verdict::Cancelled => self.cancelled += 1,
            Verdict::Deleted => self.deleted += 1,
        }
    }
}

impl Display for CleanupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} groups, {} ECVMs: {} deleted, {} dry-run, {} cancelled, {} already deleting, {} skipped",
            self.groups,
            self.vms,
            self.deleted,
            self.dry_run,
            self.cancelled,
            self.already_deleting,
            self.skipped
        )
    }
}

/// Report every group and VM, running the guard on INACTIVE VMs.
///
/// The first INACTIVE VM triggers the write of the raw payload. Any error,
/// including a rejected delete, stops the walk immediately.
pub async fn walk_groups<A, C, S, Tz, W>(
    groups: &[EcGroup],
    guard: &mut DeletionGuard<'_, A, C, S>,
    debug: &mut DebugOutput,
    payload: &RawPayload,
    tz: &Tz,
    out: &mut W,
) -> Result<CleanupSummary>
where
    A: ManagementApi + ?Sized,
    C: Confirmer,
    S: Sleeper,
    Tz: TimeZone,
    Tz::Offset: Display,
    W: Write,
{
    let mut summary = CleanupSummary::default();

    for group in groups {
        summary.groups += 1;
        emit(out, group_banner(group))?;
        if group.ec_vms.is_empty() {
            continue;
        }

        for vm in &group.ec_vms {
            summary.vms += 1;
            emit(out, format_vm_line(vm, tz))?;

            if classify(vm) != Eligibility::Skip {
                let now = Utc::now().with_timezone(tz).format("%d/%m/%y %H:%M:%S %Z");
                emit(
                    out,
                    format!(
                        "⚠️ ECVM {} is not ACTIVE... Queued for deletion ({now})",
                        vm.name.yellow()
                    ),
                )?;
                let raw_path = debug.ensure_written(payload)?;
                emit(out, format!("\t==Raw JSON Received ==> {}", raw_path.display()))?;
            }

            let verdict = guard.evaluate(group.id, vm, out).await?;
            log::debug!("ECVM {} ({}) in group {}: {verdict:?}", vm.name, vm.id, group.id);
            summary.record(verdict);
        }
        emit(out, "")?;
    }

    log::info!("Cleanup walk done: {summary}");
    Ok(summary)
}
