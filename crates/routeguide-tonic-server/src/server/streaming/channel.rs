//! Receive and send primitives shared by the streaming coordinators.
//!
//! Every inbound read distinguishes normal end-of-stream (`Ok(None)`) from
//! failure (`Err`), and every outbound write distinguishes a departed client
//! ([`Error::RequestCancelled`]) from service shutdown
//! ([`Error::ServiceShutdown`]).

use routeguide_tonic_core::{Error, Result};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tonic::Status;

/// Sender half of a streaming response.
pub type ResponseTx<T> = mpsc::Sender<core::result::Result<T, Status>>;

/// Waits for the next inbound message.
///
/// Returns `Ok(None)` once the client has closed its side of the stream. A
/// failed receive is classified through `From<Status> for Error`, so a
/// cancelled call surfaces as [`Error::RequestCancelled`].
pub async fn next_message<S, T>(stream: &mut S, shutdown: &CancellationToken) -> Result<Option<T>>
where
    S: Stream<Item = core::result::Result<T, Status>> + Unpin,
{
    tokio::select! {
        biased;
        () = shutdown.cancelled() => Err(Error::ServiceShutdown),
        item = stream.next() => match item {
            None => Ok(None),
            Some(Ok(message)) => Ok(Some(message)),
            Some(Err(status)) => Err(Error::from(status)),
        },
    }
}

/// Queues one response for the client, waiting for buffer space if needed.
pub async fn send_message<T>(
    resp_tx: &ResponseTx<T>,
    message: T,
    shutdown: &CancellationToken,
) -> Result<()> {
    tokio::select! {
        biased;
        () = shutdown.cancelled() => Err(Error::ServiceShutdown),
        sent = resp_tx.send(Ok(message)) => sent.map_err(|_| Error::RequestCancelled),
    }
}

/// Makes a best effort to hand `err` to the client as the final item of the
/// stream. Nothing is sent for a cancelled call, since nobody is listening.
pub async fn surface_error<T>(resp_tx: &ResponseTx<T>, err: &Error) {
    if err.is_cancellation() {
        return;
    }

    // The client may also have disconnected; the original error is still
    // returned upstream either way.
    if let Err(_e) = resp_tx.send(Err(err.clone().into())).await {
        #[cfg(feature = "tracing")]
        tracing::debug!("Failed to forward err: {}", _e);
    }
}
