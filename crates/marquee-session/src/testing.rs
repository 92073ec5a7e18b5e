//! Scripted transport for exercising the core without a network.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

type Reply = Result<ApiResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Answers requests in FIFO order and records what was sent.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(&self, status: u16, body: &Value) {
        self.replies
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(ApiResponse::new(status, body.to_string()))));
    }

    pub(crate) fn fail(&self, detail: &str) {
        self.replies
            .borrow_mut()
            .push_back(Scripted::Ready(Err(TransportError::new(detail))));
    }

    /// Queue a reply the test releases later through the returned gate.
    pub(crate) fn gate(&self) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Scripted::Gated(rx));
        Gate(tx)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let next = self.replies.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::new("gate dropped"))),
            None => Err(TransportError::new("no scripted reply")),
        }
    }
}

/// Releases a gated reply.
pub(crate) struct Gate(oneshot::Sender<Reply>);

impl Gate {
    pub(crate) fn release(self, status: u16, body: &Value) {
        let _ = self.0.send(Ok(ApiResponse::new(status, body.to_string())));
    }

    pub(crate) fn fail(self, detail: &str) {
        let _ = self.0.send(Err(TransportError::new(detail)));
    }
}

/// Yield to the local executor until `ready` holds.
pub(crate) async fn settle(ready: impl Fn() -> bool) {
    for _ in 0..64 {
        if ready() {
            return;
        }
        tokio::task::yield_now().await;
    }
    assert!(ready(), "condition not reached after yielding");
}
