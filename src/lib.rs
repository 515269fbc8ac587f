//! Inventory Zscaler Edge Connector groups and clean up INACTIVE connector VMs.
//!
//! This crate is organized into the following modules:
//! - [`config`] - Run settings and credentials
//! - [`zscaler`] - ZCON API client and pagination
//! - [`models`] - Group and VM data structures
//! - [`processing`] - Decoding, deletion guard and the group walk
//! - [`output`] - Report formatting and the raw JSON side channel

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod zscaler;

pub use config::{Credentials, RunConfig};
pub use error::{Error, Result};

use output::DebugOutput;
use processing::{
    decode, walk_groups, CleanupSummary, DeletionGuard, RawPayload, TerminalConfirmer, TokioSleeper,
};
use zscaler::{fetch_all, ManagementApi, ZconClient, EC_GROUP_ENDPOINT};

/// Fetch all groups and decode them, saving the raw payload when decoding fails.
pub async fn fetch_groups<A>(
    api: &A,
    config: &RunConfig,
    debug: &mut DebugOutput,
) -> Result<(RawPayload, Vec<models::EcGroup>)>
where
    A: ManagementApi + ?Sized,
{
    let records = fetch_all(api, EC_GROUP_ENDPOINT, config.page_size).await?;
    let payload = RawPayload::from_records(&records, chrono::Utc::now().timestamp())?;
    let decoded = decode(payload);
    match decoded.groups {
        Ok(groups) => Ok((decoded.payload, groups)),
        Err(e) => {
            let saved = debug.ensure_written(&decoded.payload)?;
            log::error!("Raw JSON of the failed decode saved to {}", saved.display());
            Err(e.with_raw_saved(saved))
        }
    }
}

/// One full run: login, fetch, report and guarded cleanup, logout.
pub async fn run(config: &RunConfig, credentials: &Credentials) -> Result<CleanupSummary> {
    println!("Starting Zscaler Cloud Node Cleanup");
    println!("DRY_RUN_MODE: {}", config.dry_run);
    log::info!("#Start run() {config:?}");

    let client = ZconClient::login(credentials, config.http_timeout).await?;
    let result = cleanup(&client, config).await;
    client.logout().await;
    result
}

async fn cleanup(client: &ZconClient, config: &RunConfig) -> Result<CleanupSummary> {
    let mut debug = DebugOutput::new(&config.output_dir);
    let (payload, groups) = fetch_groups(client, config, &mut debug).await?;
    println!("EC Groups: {}", groups.len());

    let mut guard = DeletionGuard::new(
        client,
        TerminalConfirmer::new(config.prompt_timeout),
        TokioSleeper,
        config.into(),
    );
    let mut stdout = std::io::stdout();
    walk_groups(&groups, &mut guard, &mut debug, &payload, &chrono::Local, &mut stdout).await
}
