//! Request channel between the HTTP layer and the poll loop

use tokio::sync::{mpsc, oneshot};

use crate::{
    error::CoreError,
    state::{Reply, Request},
};

/// Requests queued for the poll loop before handlers have to wait
pub const REQUEST_QUEUE_DEPTH: usize = 32;

/// A request plus the slot its result is delivered to
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Result<Reply, CoreError>>,
}

/// Error returned when the poll loop is no longer accepting requests
#[derive(Debug, thiserror::Error)]
#[error("control loop is not running")]
pub struct LoopGone;

/// Cloneable sender used by request handlers
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::Sender<Envelope>,
}

impl ControlHandle {
    /// Submit a request and wait for the poll loop to handle it
    pub async fn call(&self, request: Request) -> Result<Result<Reply, CoreError>, LoopGone> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope { request, reply })
            .await
            .map_err(|_| LoopGone)?;
        rx.await.map_err(|_| LoopGone)
    }
}

/// Create the handle/receiver pair for the poll loop
pub fn control_channel(depth: usize) -> (ControlHandle, mpsc::Receiver<Envelope>) {
    let (tx, rx) = mpsc::channel(depth);
    (ControlHandle { tx }, rx)
}
