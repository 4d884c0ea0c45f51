use std::pin::Pin;
use std::task::{Context, Poll, ready};

use healthchat_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};
use pin_project_lite::pin_project;

use crate::Error;
use crate::io::Sse;
use crate::proto::{ChatCompletionChunk, ErrorBody, parse_finish_reason};

struct PartialState {
    sse: Sse,
    id: Option<String>,
    // Cleared after the response returns the completed event.
    pending_finish_reason: Option<ModelFinishReason>,
}

type PinnedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type NextEvent = Result<(Option<ModelResponseEvent>, PartialState), Error>;

pin_project! {
    pub struct OpenAIResponse {
        next_event_fut: Option<PinnedFuture<NextEvent>>,
    }
}

impl OpenAIResponse {
    #[inline]
    pub fn from_sse(sse: Sse) -> Self {
        let partial_state = PartialState {
            sse,
            id: None,
            pending_finish_reason: None,
        };
        let next_event_fut = async move { next_event(partial_state).await };
        Self {
            next_event_fut: Some(Box::pin(next_event_fut)),
        }
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.project();
        let Some(next_event_fut) = this.next_event_fut else {
            return Poll::Ready(Ok(None));
        };
        let (event, partial_state) =
            match ready!(next_event_fut.as_mut().poll(cx)) {
                Ok((Some(event), partial_state)) => (event, partial_state),
                Ok((None, _)) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Ok(None));
                }
                Err(err) => {
                    *this.next_event_fut = None;
                    return Poll::Ready(Err(err));
                }
            };

        // The stream may still have more data to pull, create a new future for
        // the next event.
        let next_event_fut = async move { next_event(partial_state).await };
        *this.next_event_fut = Some(Box::pin(next_event_fut));

        Poll::Ready(Ok(Some(event)))
    }
}

async fn next_event(
    mut partial_state: PartialState,
) -> Result<(Option<ModelResponseEvent>, PartialState), Error> {
    let sse = &mut partial_state.sse;
    let mut message_delta = None;

    loop {
        let sse_event = match sse.next_event().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                return Err(Error::new(format!("{err:?}"), ErrorKind::Other));
            }
        };
        trace!("got sse event: {sse_event}");
        if sse_event == "[DONE]" {
            break;
        }

        let mut chunk = match serde_json::from_str::<ChatCompletionChunk>(
            &sse_event,
        ) {
            Ok(chunk) => chunk,
            Err(err) => {
                // Some servers report failures inside the stream.
                if let Ok(body) = serde_json::from_str::<ErrorBody>(&sse_event)
                {
                    return Err(Error::new(body.error.message, ErrorKind::Other));
                }
                return Err(Error::new(format!("{err}"), ErrorKind::Other));
            }
        };
        if partial_state.id.get_or_insert_with(|| chunk.id.clone()) != &chunk.id
        {
            return Err(Error::new("chunk id mismatch", ErrorKind::Other));
        };

        // Usage reports arrive as chunks without choices.
        let Some(choice) = chunk.choices.pop() else {
            continue;
        };

        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                message_delta = Some(content);
            }
        }
        if let Some(finish_reason) = choice.finish_reason {
            partial_state.pending_finish_reason =
                Some(parse_finish_reason(&finish_reason));
            break;
        }
        if message_delta.is_some() {
            break;
        }
    }

    // Always emit the message delta first, then the pending finish reason.
    if let Some(message_delta) = message_delta {
        return Ok((
            Some(ModelResponseEvent::MessageDelta(message_delta)),
            partial_state,
        ));
    }

    if let Some(finish_reason) = partial_state.pending_finish_reason.take() {
        return Ok((
            Some(ModelResponseEvent::Completed(finish_reason)),
            partial_state,
        ));
    }

    Ok((None, partial_state))
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use bytes::Bytes;

    use super::*;
    use crate::io::Chunks;

    async fn collect(
        parts: Vec<Bytes>,
    ) -> Result<(String, Option<ModelFinishReason>), Error> {
        let sse = Sse::new(Chunks::from_vec_deque(parts.into()));
        let mut resp = pin!(OpenAIResponse::from_sse(sse));
        let mut text = String::new();
        let mut reason = None;
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await?
        {
            match event {
                ModelResponseEvent::MessageDelta(delta) => text.push_str(&delta),
                ModelResponseEvent::Completed(r) => reason = Some(r),
            }
        }
        Ok((text, reason))
    }

    #[tokio::test]
    async fn test_simple_events() {
        let (text, reason) = collect(vec![Bytes::from_static(include_bytes!(
            "../fixtures/test_response.txt"
        ))])
        .await
        .unwrap();
        assert_eq!(
            text,
            "Tension headaches often ease with rest and water. \
             See a doctor if the pain is sudden or severe."
        );
        assert_eq!(reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_error_in_stream() {
        let err = collect(vec![
            Bytes::from_static(
                b"data: {\"id\":\"c1\",\"choices\":[{\"delta\":{\"content\":\"Hi\"},\"finish_reason\":null}]}\n\n",
            ),
            Bytes::from_static(
                b"data: {\"error\":{\"message\":\"overloaded\"}}\n\n",
            ),
        ])
        .await
        .unwrap_err();
        assert_eq!(err.message(), "overloaded");
    }

    #[tokio::test]
    async fn test_id_mismatch() {
        let err = collect(vec![Bytes::from_static(
            b"data: {\"id\":\"a\",\"choices\":[{\"delta\":{\"content\":\"x\"},\"finish_reason\":null}]}\n\n\
              data: {\"id\":\"b\",\"choices\":[{\"delta\":{\"content\":\"y\"},\"finish_reason\":null}]}\n\n",
        )])
        .await
        .unwrap_err();
        assert_eq!(err.message(), "chunk id mismatch");
    }
}
