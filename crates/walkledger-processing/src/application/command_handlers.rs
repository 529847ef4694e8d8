//! Command handlers for activity processing.
//!
//! Each handler orchestrates one command: consult the ledger, talk to the
//! upstream API when needed, and append to the ledger.

use tracing::{debug, info, instrument};
use walkledger_core::clock::Clock;
use walkledger_core::command::Command;
use walkledger_core::error::LedgerError;
use walkledger_core::ledger::{NewProcessedActivity, ProcessedActivity};
use walkledger_core::repository::LedgerRepository;
use walkledger_core::upstream::ActivityClient;

use crate::domain::commands::{MarkProcessed, ProcessActivity};
use crate::domain::rules::{Eligibility, ProcessingRules, SkipReason};

/// What processing did with an activity.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessOutcome {
    /// The ledger already held the activity; nothing was fetched or changed.
    AlreadyProcessed,
    /// The activity failed a rule and was left untouched and unrecorded.
    Skipped {
        /// The failing rule.
        reason: SkipReason,
    },
    /// The activity was updated upstream and recorded.
    Updated {
        /// The new ledger row.
        record: ProcessedActivity,
    },
}

/// Handles the `ProcessActivity` command.
///
/// Skipped activities are not recorded, so a later delivery for the same
/// activity is evaluated again. An upstream update failure records nothing
/// either. Losing a race with a concurrent writer counts as already
/// processed.
///
/// # Errors
///
/// Returns `LedgerError` if the ledger or upstream API fails, or if the
/// activity's start date is malformed.
#[instrument(
    skip_all,
    fields(
        activity_id = %command.activity_id,
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_process_activity(
    command: &ProcessActivity,
    clock: &dyn Clock,
    ledger: &dyn LedgerRepository,
    client: &dyn ActivityClient,
    rules: &ProcessingRules,
) -> Result<ProcessOutcome, LedgerError> {
    debug!(command_type = command.command_type(), "handling command");

    if ledger.contains(command.activity_id).await? {
        info!("activity already processed");
        return Ok(ProcessOutcome::AlreadyProcessed);
    }

    let activity = client.fetch_activity(command.activity_id).await?;

    if let Eligibility::Ineligible(reason) = rules.evaluate(&activity)? {
        info!(%reason, "activity skipped");
        return Ok(ProcessOutcome::Skipped { reason });
    }

    client
        .update_activity(command.activity_id, &rules.update())
        .await?;

    let entry = NewProcessedActivity::new(command.activity_id).at(clock.now_seconds());
    match ledger.record(entry).await {
        Ok(record) => {
            info!(ledger_id = record.id, "activity updated and recorded");
            Ok(ProcessOutcome::Updated { record })
        }
        Err(LedgerError::DuplicateActivity(_)) => {
            info!("activity recorded concurrently by another delivery");
            Ok(ProcessOutcome::AlreadyProcessed)
        }
        Err(err) => Err(err),
    }
}

/// Handles the `MarkProcessed` command: records the activity without
/// contacting the upstream API.
///
/// # Errors
///
/// Returns `LedgerError::DuplicateActivity` if the activity is already in the
/// ledger, or `LedgerError::Infrastructure` on storage failure.
#[instrument(
    skip_all,
    fields(
        activity_id = %command.activity_id,
        correlation_id = %command.correlation_id,
    )
)]
pub async fn handle_mark_processed(
    command: &MarkProcessed,
    ledger: &dyn LedgerRepository,
) -> Result<ProcessedActivity, LedgerError> {
    let entry = NewProcessedActivity {
        activity_id: command.activity_id(),
        processed_at: command.processed_at,
    };
    let record = ledger.record(entry).await?;
    info!(ledger_id = record.id, "activity marked processed");
    Ok(record)
}
