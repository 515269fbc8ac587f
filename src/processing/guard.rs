//! Deletion guard for INACTIVE Edge Connector VMs.
//!
//! A VM is classified once per run:
//! - `Skip` when its operational status is not `INACTIVE`
//! - `AlreadyDeleting` when it is `INACTIVE` and tagged `DELETING`
//! - `Eligible` otherwise, which enters the delete protocol:
//!   dry-run check, optional confirmation, delete call, cooldown.
//!
//! Prompting and sleeping go through [`Confirmer`] and [`Sleeper`] so the
//! protocol can run without a terminal or real delays.

use super::emit;
use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::models::EcVm;
use crate::zscaler::{vm_path, ManagementApi};
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Skip,
    AlreadyDeleting,
    Eligible,
}

pub fn classify(vm: &EcVm) -> Eligibility {
    if !vm.is_inactive() {
        Eligibility::Skip
    } else if vm.is_deleting() {
        Eligibility::AlreadyDeleting
    } else {
        Eligibility::Eligible
    }
}

/// Outcome of evaluating one VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Skipped,
    AlreadyDeleting,
    DryRun,
    Cancelled,
    Deleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GuardSettings {
    pub dry_run: bool,
    pub confirm: bool,
    pub cooldown: Duration,
}

impl From<&RunConfig> for GuardSettings {
    fn from(config: &RunConfig) -> Self {
        GuardSettings {
            dry_run: config.dry_run,
            confirm: config.confirm_deletes,
            cooldown: config.cooldown,
        }
    }
}

/// Source of operator answers.
#[async_trait]
pub trait Confirmer: Send {
    /// Show `prompt` and return the raw answer.
    async fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// `y` / `yes` in any case, surrounding whitespace ignored.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub type Lines = Box<dyn Iterator<Item = io::Result<String>>>;

/// Produces the lines an operator types, called once on the reader thread.
pub type LineSource = Box<dyn FnOnce() -> Lines + Send>;

fn stdin_lines() -> Lines {
    Box::new(io::stdin().lines())
}

/// Reads answers line by line from stdin, optionally giving up after a timeout.
///
/// A single reader thread owns the input for the whole run and forwards lines
/// over a channel, so a prompt that timed out leaves no read behind. Lines that
/// arrive after a timed out prompt are dropped before the next prompt.
pub struct TerminalConfirmer {
    timeout: Option<Duration>,
    source: Option<LineSource>,
    answers: Option<mpsc::Receiver<io::Result<String>>>,
    timed_out: bool,
}

impl TerminalConfirmer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self::with_source(timeout, Box::new(stdin_lines))
    }

    pub fn with_source(timeout: Option<Duration>, source: LineSource) -> Self {
        TerminalConfirmer {
            timeout,
            source: Some(source),
            answers: None,
            timed_out: false,
        }
    }

    /// Start the reader thread on first use, dry runs never touch stdin.
    fn answers(&mut self) -> Result<&mut mpsc::Receiver<io::Result<String>>> {
        if let Some(source) = self.source.take() {
            let (tx, rx) = mpsc::channel(16);
            std::thread::Builder::new()
                .name("confirm-reader".to_string())
                .spawn(move || {
                    for line in source() {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    log::debug!("Confirmation input closed");
                })
                .map_err(|e| Error::Prompt(e.to_string()))?;
            self.answers = Some(rx);
        }
        self.answers
            .as_mut()
            .ok_or_else(|| Error::Prompt("no confirmation input".to_string()))
    }
}

#[async_trait]
impl Confirmer for TerminalConfirmer {
    async fn ask(&mut self, prompt: &str) -> Result<String> {
        let timeout = self.timeout;
        let drain = std::mem::take(&mut self.timed_out);
        let answers = self.answers()?;
        if drain {
            while let Ok(late) = answers.try_recv() {
                log::debug!("Dropping answer to an expired prompt: {late:?}");
            }
        }

        print!("{prompt} ");
        io::stdout()
            .flush()
            .map_err(|e| Error::Prompt(e.to_string()))?;

        let next = match timeout {
            Some(t) => {
                let waited = tokio::time::timeout(t, answers.recv()).await;
                match waited {
                    Ok(next) => next,
                    Err(_) => {
                        println!();
                        log::warn!("No answer within {}s", t.as_secs());
                        self.timed_out = true;
                        return Ok(String::new());
                    }
                }
            }
            None => answers.recv().await,
        };
        match next {
            Some(line) => line.map_err(|e| Error::Prompt(e.to_string())),
            None => Err(Error::Prompt("confirmation input closed".to_string())),
        }
    }
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Gates delete calls behind dry-run and confirmation.
pub struct DeletionGuard<'a, A: ?Sized, C, S> {
    api: &'a A,
    confirmer: C,
    sleeper: S,
    settings: GuardSettings,
}

impl<'a, A, C, S> DeletionGuard<'a, A, C, S>
where
    A: ManagementApi + ?Sized,
    C: Confirmer,
    S: Sleeper,
{
    pub fn new(api: &'a A, confirmer: C, sleeper: S, settings: GuardSettings) -> Self {
        DeletionGuard {
            api,
            confirmer,
            sleeper,
            settings,
        }
    }

    /// Classify `vm` and run the delete protocol when it is eligible.
    ///
    /// A rejected delete call is returned as [`Error::Delete`] and ends the run.
    pub async fn evaluate<W: Write>(
        &mut self,
        group_id: i64,
        vm: &EcVm,
        out: &mut W,
    ) -> Result<Verdict> {
        match classify(vm) {
            Eligibility::Skip => Ok(Verdict::Skipped),
            Eligibility::AlreadyDeleting => {
                emit(out, format!("ECVM {} is already in DELETING state", vm.name))?;
                Ok(Verdict::AlreadyDeleting)
            }
            Eligibility::Eligible => self.delete(group_id, vm, out).await,
        }
    }

    async fn delete<W: Write>(
        &mut self,
        group_id: i64,
        vm: &EcVm,
        out: &mut W,
    ) -> Result<Verdict> {
        let path = vm_path(group_id, vm.id);

        if self.settings.dry_run {
            log::info!("[DRY_RUN] skip delete of {path}");
            emit(
                out,
                format!("\n\t❇️ {} Action: Delete | Path: {path}", "[DRY_RUN]".cyan()),
            )?;
            return Ok(Verdict::DryRun);
        }

        if self.settings.confirm {
            let prompt = format!(
                "⚠️⚠️⚠️ !! CONFIRM DELETION !!\n\tDo you want to delete ECVM {} (ID {}) from Group {group_id}? [y/N]",
                vm.name, vm.id
            );
            emit(out, "")?;
            let answer = match self.confirmer.ask(&prompt).await {
                Ok(answer) => answer,
                Err(e) => {
                    log::warn!("Confirmation for {path} failed, treating as no: {e}");
                    String::new()
                }
            };
            if !is_affirmative(&answer) {
                log::info!("Deletion of {path} cancelled by user");
                emit(out, "❌ Deletion cancelled by user")?;
                return Ok(Verdict::Cancelled);
            }
            emit(out, "✅🚮 Deletion confirmed by user, proceeding...")?;
        }

        self.api.delete(&path).await.map_err(|e| {
            log::error!("Error deleting ECVM {} via {path}: {e}", vm.name);
            Error::Delete {
                path: path.clone(),
                source: Box::new(e),
            }
        })?;
        log::warn!("Deleted ECVM {} ({path})", vm.name);

        let cooldown = self.settings.cooldown;
        emit(
            out,
            format!("\n\t... Sleeping for {} secs to offset deletions ...", cooldown.as_secs()),
        )?;
        self.sleeper.sleep(cooldown).await;
        Ok(Verdict::Deleted)
    }
}
