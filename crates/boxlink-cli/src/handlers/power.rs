//! One-shot command handlers (`powerdown`, `stop-wifi`).

use std::time::Duration;

use anyhow::{Context, Result};
use boxlink_core::BoxCommand;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::bootstrap::CliContext;

/// How long to wait for the box to answer a command before exiting anyway.
const COMMAND_WAIT: Duration = Duration::from_secs(5);

/// Send `command` and wait a bounded time for the request to finish.
///
/// Delivery failures are logged by the connection manager and do not fail
/// the command: a box that is switching off often never answers.
pub async fn execute(ctx: &CliContext, command: BoxCommand) -> Result<()> {
    let answered = await_dispatch(ctx.manager().dispatch(command), COMMAND_WAIT).await?;

    if answered {
        println!("Requested {command} from {}", ctx.settings().base_url());
    } else {
        println!(
            "Requested {command} from {}, no answer yet",
            ctx.settings().base_url()
        );
    }
    ctx.manager().shutdown();
    Ok(())
}

/// Wait up to `limit` for a dispatched command.
///
/// Returns `false` when the limit passed first. The request is left running
/// and ends with the runtime.
async fn await_dispatch(handle: JoinHandle<()>, limit: Duration) -> Result<bool> {
    match tokio::time::timeout(limit, handle).await {
        Ok(joined) => {
            joined.context("command task failed")?;
            Ok(true)
        }
        Err(_) => {
            warn!(
                wait_ms = limit.as_millis(),
                "Box did not answer the command in time, exiting"
            );
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_unanswered_command_stops_waiting() {
        let handle = tokio::spawn(std::future::pending::<()>());
        assert!(!await_dispatch(handle, LIMIT).await.unwrap());
    }

    #[tokio::test]
    async fn test_answered_command() {
        let handle = tokio::spawn(async {});
        assert!(await_dispatch(handle, LIMIT).await.unwrap());
    }

    #[tokio::test]
    async fn test_panicked_command_task_is_an_error() {
        let handle = tokio::spawn(async { panic!("send failed") });
        assert!(await_dispatch(handle, LIMIT).await.is_err());
    }
}
