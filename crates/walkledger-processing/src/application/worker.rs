//! Background worker that processes queued webhook activities.
//!
//! The webhook endpoint must answer quickly, so it only enqueues a
//! `ProcessActivity` command. A single worker drains the queue in order,
//! which keeps deliveries for the same activity from interleaving.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use walkledger_core::clock::Clock;
use walkledger_core::error::LedgerError;
use walkledger_core::repository::LedgerRepository;
use walkledger_core::upstream::ActivityClient;

use crate::application::command_handlers::{ProcessOutcome, handle_process_activity};
use crate::domain::commands::ProcessActivity;
use crate::domain::rules::ProcessingRules;

/// Sending half of the processing queue.
#[derive(Debug, Clone)]
pub struct ActivityQueue {
    sender: mpsc::Sender<ProcessActivity>,
}

impl ActivityQueue {
    /// Enqueues a command without waiting for queue space.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Infrastructure` when the queue is full or the
    /// worker has stopped.
    pub fn enqueue(&self, command: ProcessActivity) -> Result<(), LedgerError> {
        self.sender.try_send(command).map_err(|e| match e {
            TrySendError::Full(cmd) => LedgerError::Infrastructure(format!(
                "processing queue full, dropped activity {}",
                cmd.activity_id
            )),
            TrySendError::Closed(cmd) => LedgerError::Infrastructure(format!(
                "processing queue closed, dropped activity {}",
                cmd.activity_id
            )),
        })
    }
}

/// Creates a bounded processing queue.
#[must_use]
pub fn queue(capacity: usize) -> (ActivityQueue, mpsc::Receiver<ProcessActivity>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (ActivityQueue { sender }, receiver)
}

/// Dependencies the worker hands to `handle_process_activity`.
#[derive(Clone)]
pub struct ActivityWorker {
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn LedgerRepository>,
    client: Arc<dyn ActivityClient>,
    rules: Arc<ProcessingRules>,
}

impl ActivityWorker {
    /// Creates a worker.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn LedgerRepository>,
        client: Arc<dyn ActivityClient>,
        rules: Arc<ProcessingRules>,
    ) -> Self {
        Self {
            clock,
            ledger,
            client,
            rules,
        }
    }

    /// Processes one command, logging the outcome. Errors are logged and
    /// swallowed; the upstream re-delivers on later changes.
    pub async fn process(&self, command: &ProcessActivity) -> Option<ProcessOutcome> {
        match handle_process_activity(
            command,
            self.clock.as_ref(),
            self.ledger.as_ref(),
            self.client.as_ref(),
            &self.rules,
        )
        .await
        {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(
                    activity_id = %command.activity_id,
                    correlation_id = %command.correlation_id,
                    error = %err,
                    "activity processing failed"
                );
                None
            }
        }
    }

    /// Drains `receiver` until it closes or `shutdown` fires.
    pub async fn run(
        self,
        mut receiver: mpsc::Receiver<ProcessActivity>,
        shutdown: CancellationToken,
    ) {
        info!("activity worker started");
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    let pending = receiver.len();
                    if pending > 0 {
                        warn!(pending, "activity worker stopping with queued commands");
                    }
                    break;
                }
                next = receiver.recv() => match next {
                    Some(command) => {
                        self.process(&command).await;
                    }
                    None => break,
                },
            }
        }
        info!("activity worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use walkledger_core::activity::ActivityId;
    use walkledger_test_support::{
        FixedClock, InMemoryLedgerRepository, StubActivityClient, walk_activity,
    };

    fn command(id: i64) -> ProcessActivity {
        ProcessActivity {
            correlation_id: Uuid::new_v4(),
            activity_id: ActivityId(id),
        }
    }

    #[tokio::test]
    async fn test_worker_drains_queue_until_closed() {
        // Arrange
        let ledger = Arc::new(InMemoryLedgerRepository::new());
        let client = Arc::new(StubActivityClient::returning(walk_activity(0)));
        let worker = ActivityWorker::new(
            Arc::new(FixedClock::reference()),
            ledger.clone(),
            client.clone(),
            Arc::new(ProcessingRules::default()),
        );
        let (queue, receiver) = queue(8);

        // Act
        queue.enqueue(command(12345)).unwrap();
        queue.enqueue(command(12345)).unwrap();
        queue.enqueue(command(67890)).unwrap();
        drop(queue);
        worker.run(receiver, CancellationToken::new()).await;

        // Assert
        let ids: Vec<ActivityId> = ledger.rows().iter().map(|r| r.activity_id).collect();
        assert_eq!(ids, vec![ActivityId(12345), ActivityId(67890)]);
        assert_eq!(client.updates().len(), 2);
    }

    #[tokio::test]
    async fn test_worker_stops_on_cancellation() {
        let worker = ActivityWorker::new(
            Arc::new(FixedClock::reference()),
            Arc::new(InMemoryLedgerRepository::new()),
            Arc::new(StubActivityClient::unreachable()),
            Arc::new(ProcessingRules::default()),
        );
        let (_queue, receiver) = queue(1);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        worker.run(receiver, shutdown).await;
    }

    #[tokio::test]
    async fn test_process_swallows_errors() {
        let worker = ActivityWorker::new(
            Arc::new(FixedClock::reference()),
            Arc::new(InMemoryLedgerRepository::new()),
            Arc::new(StubActivityClient::unreachable()),
            Arc::new(ProcessingRules::default()),
        );

        assert_eq!(worker.process(&command(1)).await, None);
    }

    #[test]
    fn test_enqueue_reports_full_queue() {
        let (queue, _receiver) = queue(1);
        queue.enqueue(command(1)).unwrap();

        let result = queue.enqueue(command(2));

        assert!(matches!(result, Err(LedgerError::Infrastructure(_))));
    }

    #[test]
    fn test_enqueue_reports_closed_queue() {
        let (queue, receiver) = queue(1);
        drop(receiver);

        assert!(queue.enqueue(command(1)).is_err());
    }
}
