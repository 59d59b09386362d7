//! Reconnecting event stream over reqwest.

use std::time::Duration;

use async_stream::stream;
use boxlink_core::{ClientSettings, EventStream, ServerSentEvent, StatusEventSource};
use futures_util::{Stream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::HttpConfig;
use crate::error::TransportError;
use crate::sse::SseDecoder;

const LAST_EVENT_ID: &str = "Last-Event-ID";

/// [`StatusEventSource`] backed by a long-lived `GET` on the box's event endpoint.
///
/// The stream returned by [`open`](StatusEventSource::open) never ends and
/// never errors: connection failures, non-success responses and dropped
/// connections, and connections silent for longer than the idle timeout, are
/// logged and followed by a reconnect after the current
/// reconnection delay.
#[derive(Debug, Clone)]
pub struct SseEventSource {
    client: reqwest::Client,
    url: Url,
    reconnect_delay: Duration,
    idle_timeout: Duration,
}

impl SseEventSource {
    pub fn new(settings: &ClientSettings, config: &HttpConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: config.build_client()?,
            url: settings.events_url()?,
            reconnect_delay: config.reconnect_delay,
            idle_timeout: config.idle_timeout,
        })
    }

    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl StatusEventSource for SseEventSource {
    fn open(&self) -> EventStream {
        Box::pin(event_stream(
            self.client.clone(),
            self.url.clone(),
            self.reconnect_delay,
            self.idle_timeout,
        ))
    }
}

fn event_stream(
    client: reqwest::Client,
    url: Url,
    default_delay: Duration,
    idle_timeout: Duration,
) -> impl Stream<Item = ServerSentEvent> + Send + 'static {
    stream! {
        let mut decoder = SseDecoder::new();

        loop {
            debug!(%url, last_event_id = ?decoder.last_event_id(), "Connecting to event stream");
            match connect(&client, &url, decoder.last_event_id()).await {
                Ok(response) => {
                    info!(%url, "Event stream connected");
                    let mut body = response.bytes_stream();
                    loop {
                        match tokio::time::timeout(idle_timeout, body.next()).await {
                            Err(_) => {
                                warn!(
                                    %url,
                                    idle_ms = idle_timeout.as_millis(),
                                    "Event stream went silent, reconnecting"
                                );
                                break;
                            }
                            Ok(Some(Ok(chunk))) => {
                                for event in decoder.feed(&chunk) {
                                    yield event;
                                }
                            }
                            Ok(Some(Err(e))) => {
                                warn!(%url, error = %e, "Event stream interrupted");
                                break;
                            }
                            Ok(None) => {
                                warn!(%url, "Event stream closed by the box");
                                break;
                            }
                        }
                    }
                }
                Err(e) => warn!(%url, error = %e, "Event stream connection failed"),
            }

            decoder.reset();
            let delay = decoder.retry().unwrap_or(default_delay);
            debug!(delay_ms = delay.as_millis(), "Reconnecting to event stream");
            tokio::time::sleep(delay).await;
        }
    }
}

async fn connect(
    client: &reqwest::Client,
    url: &Url,
    last_event_id: Option<&str>,
) -> Result<reqwest::Response, TransportError> {
    let mut request = client
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache");
    if let Some(id) = last_event_id {
        request = request.header(LAST_EVENT_ID, id);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_from_settings() {
        let settings = ClientSettings::new("http://10.0.0.7:8080").unwrap();
        let source = SseEventSource::new(&settings, &HttpConfig::new()).unwrap();
        assert_eq!(source.url().as_str(), "http://10.0.0.7:8080/events");
    }

    #[test]
    fn test_custom_events_path() {
        let settings = ClientSettings::default().with_events_path("/api/events");
        let source = SseEventSource::new(&settings, &HttpConfig::new()).unwrap();
        assert_eq!(source.url().as_str(), "http://adabox.local/api/events");
    }
}
