//! A local scripted model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use healthchat_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: VecDeque<PresetEvent>,
    completed: bool,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        // SAFETY: This type does not require to be pinned.
        let this = unsafe { self.get_unchecked_mut() };

        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            return match this.events.pop_front() {
                Some(PresetEvent::MessageDelta(msg)) => {
                    Poll::Ready(Ok(Some(ModelResponseEvent::MessageDelta(msg))))
                }
                Some(PresetEvent::StreamError(failure)) => {
                    this.events.clear();
                    this.completed = true;
                    Poll::Ready(Err(Error {
                        message: "stream broken by script",
                        kind: failure.into(),
                    }))
                }
                Some(PresetEvent::Completed(reason)) => {
                    this.events.clear();
                    this.completed = true;
                    Poll::Ready(Ok(Some(ModelResponseEvent::Completed(reason))))
                }
                None if !this.completed => {
                    this.completed = true;
                    Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                        ModelFinishReason::Stop,
                    ))))
                }
                // In case this method is called after completion.
                None => Poll::Ready(Ok(None)),
            };
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_event(cx)
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Each request consumes the front of the script. A preset with pending
/// failures fails the request instead and stays in place until its
/// failures are used up. Requests sent after the script runs out fail
/// with [`ErrorKind::Other`].
///
/// Clones share the same script, so a test can keep one handle for
/// inspecting [`TestModelProvider::requests`] after handing the other to
/// the code under test.
///
/// # Note
///
/// This type is not optimized for production use. You should only use it
/// for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.lock().responses.push_back(preset);
    }

    /// Sets the delay between two streamed events.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_response(&self, req: &ModelRequest) -> Result<VecDeque<PresetEvent>, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        let Some(front) = script.responses.front_mut() else {
            return Err(Error {
                message: "script exhausted",
                kind: ErrorKind::Other,
            });
        };
        match front.failures {
            Some(0) => {
                return Err(Error {
                    message: "preset always fails",
                    kind: front.failure_kind.into(),
                });
            }
            Some(ref mut left) => {
                *left -= 1;
                let kind = front.failure_kind.into();
                if *left == 0 {
                    front.failures = None;
                }
                return Err(Error {
                    message: "preset failure",
                    kind,
                });
            }
            None => {}
        }

        Ok(script
            .responses
            .pop_front()
            .map(|preset| preset.events.into())
            .unwrap_or_default())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        let resp = self.next_response(req).map(|events| TestModelResponse {
            events,
            completed: false,
            delay,
            sleep: None,
        });
        ready(resp)
    }
}
