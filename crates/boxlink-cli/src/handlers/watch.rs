//! Watch command handler.
//!
//! Prints every snapshot and liveness transition as it happens and accepts
//! single-letter commands on stdin, like the power dialog of the box's web UI.
//! Observers only render; printing happens on the handler's task so a slow
//! terminal never stalls the session.

use anyhow::Result;
use boxlink_core::{BoxCommand, StatusSnapshot};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{OutputFormat, render_liveness, render_snapshot};

const HELP: &str = "p = power down, w = stop wifi, q = quit";

/// A line typed while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchInput {
    Send(BoxCommand),
    Quit,
}

impl WatchInput {
    /// Parse one input line. Blank and unknown lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "p" | "powerdown" => Some(Self::Send(BoxCommand::PowerDown)),
            "w" | "stop-wifi" => Some(Self::Send(BoxCommand::StopWifi)),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Execute the watch command.
///
/// Runs until `q` is entered or Ctrl+C is pressed. Commands typed while
/// watching are fire-and-forget.
pub async fn execute(ctx: &CliContext, json: bool) -> Result<()> {
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    if format == OutputFormat::Text {
        eprintln!("Watching {} ({HELP})", ctx.settings().base_url());
    }

    let (tx, mut rendered) = mpsc::unbounded_channel();
    let render = move |snapshot: &Option<StatusSnapshot>| {
        snapshot
            .as_ref()
            .map(|snapshot| render_snapshot(snapshot, &Local::now(), format))
    };
    let _snapshots = ctx.manager().subscribe(line_sender(tx.clone(), render));
    let _liveness = ctx
        .manager()
        .subscribe_connection(line_sender(tx, move |connected: &bool| {
            Some(render_liveness(*connected, &Local::now(), format))
        }));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.map_err(CliError::from)?;
                break;
            }
            Some(line) = rendered.recv() => println!("{line}"),
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.map_err(CliError::from)? else {
                    debug!("stdin closed, watching until interrupted");
                    stdin_open = false;
                    continue;
                };
                match WatchInput::parse(&line) {
                    Some(WatchInput::Quit) => break,
                    Some(WatchInput::Send(command)) => {
                        drop(ctx.manager().dispatch(command));
                    }
                    None if line.trim().is_empty() => {}
                    None => eprintln!("Unknown input '{}' ({HELP})", line.trim()),
                }
            }
        }
    }

    ctx.manager().shutdown();
    Ok(())
}

/// Observer that renders on the publishing task and queues the line for printing.
fn line_sender<T, R>(
    tx: mpsc::UnboundedSender<String>,
    render: R,
) -> impl Fn(&T) + Send + Sync + 'static
where
    T: 'static,
    R: Fn(&T) -> Option<String> + Send + Sync + 'static,
{
    move |value: &T| {
        if let Some(line) = render(value) {
            // The receiver is gone only once the handler has returned.
            let _ = tx.send(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use boxlink_core::BroadcastCell;

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            WatchInput::parse("p"),
            Some(WatchInput::Send(BoxCommand::PowerDown))
        );
        assert_eq!(
            WatchInput::parse(" W \n"),
            Some(WatchInput::Send(BoxCommand::StopWifi))
        );
        assert_eq!(
            WatchInput::parse("stop-wifi"),
            Some(WatchInput::Send(BoxCommand::StopWifi))
        );
        assert_eq!(WatchInput::parse("q"), Some(WatchInput::Quit));
        assert_eq!(WatchInput::parse("exit"), Some(WatchInput::Quit));
    }

    #[test]
    fn test_parse_unknown_input() {
        assert_eq!(WatchInput::parse(""), None);
        assert_eq!(WatchInput::parse("reboot"), None);
    }

    #[test]
    fn test_observer_output_is_queued_in_order() {
        let cell = BroadcastCell::new(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _sub = cell.subscribe(line_sender(tx, |connected: &bool| {
            connected.then(|| "up".to_string())
        }));

        // Nothing drains the channel while publishing.
        cell.publish(true);
        cell.publish(false);
        cell.publish(true);

        assert_eq!(rx.try_recv().unwrap(), "up");
        assert_eq!(rx.try_recv().unwrap(), "up");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_output_does_not_break_publishing() {
        let cell = BroadcastCell::new(0u8);
        let (tx, rx) = mpsc::unbounded_channel();
        let _sub = cell.subscribe(line_sender(tx, |n: &u8| Some(n.to_string())));
        drop(rx);

        cell.publish(1);
        assert_eq!(cell.get(), 1);
    }
}
