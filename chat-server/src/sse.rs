//! Bridges `chatcore`'s `mpsc::Receiver<OutboundEvent>` into axum SSE
//! frames, ending with a literal `data: [DONE]` line.

use std::convert::Infallible;

use axum::response::sse::Event;
use chat_event::{OutboundEvent, DONE_LINE};
use tokio::sync::mpsc::Receiver;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};

/// Strips the `"data: "` prefix and trailing blank line axum re-adds itself,
/// since `Event::data` already frames the payload.
fn done_data() -> &'static str {
    DONE_LINE
        .trim_start_matches("data: ")
        .trim_end_matches("\n\n")
}

pub fn outbound_event_stream(
    rx: Receiver<OutboundEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    let events = ReceiverStream::new(rx).map(|event| match event.to_value() {
        Ok(value) => Ok(Event::default().data(value.to_string())),
        Err(e) => Ok(Event::default().data(
            serde_json::json!({ "type": "error", "content": e.to_string() }).to_string(),
        )),
    });
    events.chain(tokio_stream::once(Ok(Event::default().data(done_data()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stream_ends_with_done_sentinel() {
        let (tx, rx) = tokio::sync::mpsc::channel(4);
        tx.send(OutboundEvent::Text("hi".into())).await.unwrap();
        drop(tx);

        let mut stream = Box::pin(outbound_event_stream(rx));
        let first = stream.next().await.unwrap().unwrap();
        assert!(format!("{first:?}").contains("hi"));
        let last = stream.next().await.unwrap().unwrap();
        assert!(format!("{last:?}").contains("[DONE]"));
        assert!(stream.next().await.is_none());
    }
}
