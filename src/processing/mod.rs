//! Cleanup processing logic.
//!
//! - [`decode`] - raw payload to typed groups
//! - [`guard`] - classification and the guarded delete protocol
//! - [`cleanup`] - the group / VM walk tying report and guard together

mod cleanup;
mod decode;
mod guard;

pub use cleanup::{walk_groups, CleanupSummary};
pub use decode::{decode, Decoded, RawPayload};
pub use guard::{
    classify, is_affirmative, Confirmer, DeletionGuard, Eligibility, GuardSettings, Sleeper,
    TerminalConfirmer, TokioSleeper, Verdict,
};

use crate::error::{Error, Result};
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

/// Write one console line, mapping failures to [`Error::Io`].
pub(crate) fn emit<W: Write>(out: &mut W, line: impl Display) -> Result<()> {
    writeln!(out, "{line}").map_err(|e| Error::Io {
        path: PathBuf::from("<stdout>"),
        source: e,
    })
}
