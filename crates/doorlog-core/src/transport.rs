//! Transport abstraction for request/response exchanges.
//!
//! Production plugs in the real session layer; tests use the simulated
//! transport from `doorlog-harness`. Either way the transport owns retries,
//! scheduling and cancellation. This crate only defines what a reply is and
//! how long to wait for one.

use std::future::Future;

use async_trait::async_trait;
use doorlog_proto::Frame;

use crate::{
    correlator::PendingRequest, error::TransportError, maybe::MaybeKnown, options::CommandOptions,
};

/// Sends a request and waits for the frame that answers it.
///
/// Implementations must only resolve with a frame for which
/// [`PendingRequest::accepts`] returns true, and must resolve with
/// [`MaybeKnown::Unknown`] once [`CommandOptions::timeout`] elapses without
/// one. A request that expects no reply resolves as soon as it is sent.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and wait for its reply.
    async fn send_command(
        &self,
        request: &PendingRequest,
        options: &CommandOptions,
    ) -> Result<MaybeKnown<Frame>, TransportError>;
}

/// Bound `reply` by the command timeout.
///
/// Helper for transport implementations: elapsed time becomes
/// [`MaybeKnown::Unknown`], a closed session stays an error.
pub async fn await_reply<F>(
    reply: F,
    options: &CommandOptions,
) -> Result<MaybeKnown<Frame>, TransportError>
where
    F: Future<Output = Result<Frame, TransportError>>,
{
    match tokio::time::timeout(options.timeout, reply).await {
        Ok(Ok(frame)) => Ok(MaybeKnown::Known(frame)),
        Ok(Err(e)) => Err(e),
        Err(_elapsed) => Ok(MaybeKnown::Unknown),
    }
}
