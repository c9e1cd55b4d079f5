//! CheckerActor - runs alert check jobs on behalf of the scheduler

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument, warn};

use super::messages::CheckCommand;
use crate::QueryId;
use crate::engine::{CheckSummary, Engine};

/// Actor that turns scheduler commands into engine check jobs.
///
/// Each `CheckQuery` is spawned as its own task; jobs for distinct
/// queries run concurrently while the engine serializes per alert id.
pub struct CheckerActor {
    engine: Engine,
    command_rx: mpsc::Receiver<CheckCommand>,
}

impl CheckerActor {
    pub fn new(engine: Engine, command_rx: mpsc::Receiver<CheckCommand>) -> Self {
        Self { engine, command_rx }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting checker actor");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                CheckCommand::CheckQuery {
                    query_id,
                    metadata,
                    respond_to,
                } => {
                    let engine = self.engine.clone();
                    tokio::spawn(async move {
                        let result = engine.check_query(query_id, metadata).await;
                        if let Err(e) = &result {
                            warn!("check job for query {query_id} failed: {e}");
                        }
                        // receiver may have given up waiting
                        let _ = respond_to.send(result);
                    });
                }

                CheckCommand::Shutdown => {
                    debug!("received shutdown command");
                    break;
                }
            }
        }

        debug!("checker actor stopped");
    }
}

/// Handle for submitting check jobs to the CheckerActor
#[derive(Clone)]
pub struct CheckerHandle {
    sender: mpsc::Sender<CheckCommand>,
}

impl CheckerHandle {
    /// Spawn a new checker actor around an engine
    pub fn spawn(engine: Engine) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = CheckerActor::new(engine, cmd_rx);
        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Check all alerts of a query and wait for the summary
    pub async fn check_query(
        &self,
        query_id: QueryId,
        metadata: HashMap<String, String>,
    ) -> anyhow::Result<CheckSummary> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CheckCommand::CheckQuery {
                query_id,
                metadata,
                respond_to: tx,
            })
            .await
            .map_err(|_| anyhow::anyhow!("checker actor is gone"))?;

        rx.await
            .map_err(|_| anyhow::anyhow!("checker actor dropped the job"))?
    }

    /// Shutdown the checker actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(CheckCommand::Shutdown).await;
    }
}
