//! In-process transport to a [`SimDevice`].
//!
//! Frames cross two unbounded channels as raw bytes, so every exchange goes
//! through the real encoder and decoder. The device runs in its own task.

use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use bytes::Bytes;
use doorlog_core::{
    CommandOptions, MaybeKnown, PendingRequest, Priority, Transport, TransportError,
    transport::await_reply,
};
use doorlog_proto::Frame;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::sim_device::SimDevice;

/// A frame the controller sent, with the priority it was sent at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCommand {
    /// Frame as put on the wire
    pub frame: Frame,
    /// Scheduling priority requested by the caller
    pub priority: Priority,
}

/// [`Transport`] backed by a simulated lock
pub struct SimTransport {
    outbound: mpsc::UnboundedSender<Bytes>,
    inbound: Mutex<mpsc::UnboundedReceiver<Bytes>>,
    sent: Arc<StdMutex<Vec<SentCommand>>>,
}

impl SimTransport {
    /// Spawn `device` on the current runtime and connect to it
    pub fn connect(device: SimDevice) -> Self {
        let (outbound, device_rx) = mpsc::unbounded_channel();
        let (device_tx, inbound) = mpsc::unbounded_channel();

        tokio::spawn(run_device(device, device_rx, device_tx));

        Self { outbound, inbound: Mutex::new(inbound), sent: Arc::new(StdMutex::new(Vec::new())) }
    }

    /// Every command sent so far, oldest first
    pub fn sent(&self) -> Vec<SentCommand> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    async fn next_reply(&self, request: &PendingRequest) -> Result<Frame, TransportError> {
        let mut inbound = self.inbound.lock().await;
        loop {
            let bytes = inbound.recv().await.ok_or(TransportError::Closed)?;
            match Frame::decode(&bytes) {
                Ok(frame) if request.accepts(&frame) => return Ok(frame),
                Ok(frame) => {
                    debug!(command = frame.command().name(), "dropping uncorrelated frame");
                },
                Err(e) => warn!(error = %e, "dropping undecodable frame"),
            }
        }
    }
}

#[async_trait]
impl Transport for SimTransport {
    async fn send_command(
        &self,
        request: &PendingRequest,
        options: &CommandOptions,
    ) -> Result<MaybeKnown<Frame>, TransportError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentCommand { frame: request.frame().clone(), priority: options.priority });
        }

        self.outbound.send(request.frame().to_bytes()).map_err(|_| TransportError::Closed)?;

        if request.expected_response().is_none() {
            return Ok(MaybeKnown::Unknown);
        }

        await_reply(self.next_reply(request), options).await
    }
}

async fn run_device(
    device: SimDevice,
    mut requests: mpsc::UnboundedReceiver<Bytes>,
    replies: mpsc::UnboundedSender<Bytes>,
) {
    while let Some(bytes) = requests.recv().await {
        let frame = match Frame::decode(&bytes) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "sim device got undecodable frame");
                continue;
            },
        };

        let answers = device.handle(&frame);
        if !answers.is_empty() && !device.reply_delay().is_zero() {
            tokio::time::sleep(device.reply_delay()).await;
        }

        for answer in answers {
            if replies.send(answer.to_bytes()).is_err() {
                return;
            }
        }
    }
}
