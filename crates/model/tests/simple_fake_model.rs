use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::task::{self, Poll, ready};
use std::time::Duration;

use healthchat_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

#[derive(Debug)]
struct FakeNurseError(ErrorKind);

impl Display for FakeNurseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeNurseError {}

impl ModelProviderError for FakeNurseError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Replies word by word, then reports completion.
#[derive(Debug)]
struct FakeNurseResponse {
    words: VecDeque<String>,
    finished: bool,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl FakeNurseResponse {
    fn new(symptoms: &str) -> Self {
        let words = format!("Please rest and watch your {symptoms}")
            .split(' ')
            .map(ToString::to_string)
            .collect();
        Self {
            words,
            finished: false,
            sleep: None,
        }
    }
}

impl ModelResponse for FakeNurseResponse {
    type Error = FakeNurseError;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        // SAFETY: This type does not require to be pinned.
        let this = unsafe { self.get_unchecked_mut() };
        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            if let Some(mut word) = this.words.pop_front() {
                if !this.words.is_empty() {
                    word.push(' ');
                }
                return Poll::Ready(Ok(Some(
                    ModelResponseEvent::MessageDelta(word),
                )));
            }
            if !this.finished {
                this.finished = true;
                return Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                    ModelFinishReason::Stop,
                ))));
            }
            return Poll::Ready(Ok(None));
        }
        this.sleep = Some(Box::pin(sleep(Duration::from_millis(1))));
        Pin::new(this).poll_next_event(cx)
    }
}

struct FakeNurse;

impl ModelProvider for FakeNurse {
    type Error = FakeNurseError;
    type Response = FakeNurseResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let result = match req.last_user_text() {
            Some(text) => Ok(FakeNurseResponse::new(text)),
            None => Err(FakeNurseError(ErrorKind::Other)),
        };
        ready(result)
    }
}

mod tests {
    use std::future::poll_fn;

    use super::*;

    async fn collect(mut resp: FakeNurseResponse) -> (String, ModelFinishReason) {
        let mut text = String::new();
        let mut reason = None;
        loop {
            let event = poll_fn(|cx| Pin::new(&mut resp).poll_next_event(cx))
                .await
                .unwrap();
            match event {
                Some(ModelResponseEvent::MessageDelta(delta)) => {
                    text.push_str(&delta)
                }
                Some(ModelResponseEvent::Completed(r)) => reason = Some(r),
                None => break,
            }
        }
        (text, reason.unwrap())
    }

    #[tokio::test]
    async fn test_completion() {
        let req = ModelRequest::with_messages([
            ModelMessage::System("You are a careful nurse.".to_owned()),
            ModelMessage::User("cough".to_owned()),
        ]);
        let resp = FakeNurse.send_request(&req).await.unwrap();
        let (text, reason) = collect(resp).await;
        assert_eq!(text, "Please rest and watch your cough");
        assert_eq!(reason, ModelFinishReason::Stop);
    }

    #[tokio::test]
    async fn test_error() {
        let req = ModelRequest::with_messages([ModelMessage::System(
            "nobody asked anything".to_owned(),
        )]);
        let err = FakeNurse.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(!err.kind().is_transient());
    }

    #[test]
    fn test_last_user_text() {
        let req = ModelRequest::with_messages([
            ModelMessage::User("fever".to_owned()),
            ModelMessage::Assistant("Drink water.".to_owned()),
            ModelMessage::User("still hot".to_owned()),
        ]);
        assert_eq!(req.last_user_text(), Some("still hot"));
        assert_eq!(req.messages[1].text(), "Drink water.");
    }
}
