//! Raw bidirectional byte relay.
//!
//! # Responsibilities
//! - Accept one raw connection and pipe it against the local stdio
//!   streams, one copy task per direction
//! - End the session as soon as either direction finishes; the other
//!   direction is abandoned, not drained
//!
//! Read errors end their task. Write errors abort the whole process: the
//! relay is a single-purpose foreground mode and an unwritable
//! destination mid-stream has no recovery path.

use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Fixed copy buffer size per direction.
const RELAY_BUF_SIZE: usize = 1024;

/// Foreground pipe mode: bind, relay the first accepted connection
/// against stdio, then return.
pub async fn run_pipe_mode(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Pipe mode: waiting for a connection");

    let (stream, peer) = listener.accept().await?;
    tracing::info!(peer = %peer, "Relaying connection to local stdio");
    relay(stream, tokio::io::stdin(), tokio::io::stdout()).await;
    Ok(())
}

/// Relay one duplex connection against a local input/output pair.
///
/// Two copy tasks run independently: connection to local output, and
/// local input to connection. Each resolves its own completion signal;
/// the session ends when the first signal fires.
pub async fn relay<C, I, O>(conn: C, local_in: I, local_out: O)
where
    C: AsyncRead + AsyncWrite + Send + Unpin + 'static,
    I: AsyncRead + Send + Unpin + 'static,
    O: AsyncWrite + Send + Unpin + 'static,
{
    let (remote_rx, remote_tx) = tokio::io::split(conn);
    let to_local = copy_stream(remote_rx, local_out, false);
    let to_remote = copy_stream(local_in, remote_tx, true);

    tokio::select! {
        _ = to_local => tracing::info!("Remote connection is closed"),
        _ = to_remote => tracing::info!("Local program is terminated"),
    }
}

/// Spawn one unidirectional copy task and return its completion signal.
///
/// The task reads a fixed-size buffer at a time and writes each read
/// immediately, stopping on end-of-stream or a read error. When
/// `closes_remote` is set, the destination is the connection and gets
/// shut down (signaling the peer) before the task reports completion.
fn copy_stream<R, W>(mut src: R, mut dst: W, closes_remote: bool) -> oneshot::Receiver<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let (done_tx, done_rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut buf = [0u8; RELAY_BUF_SIZE];
        loop {
            let n = match src.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) => {
                    tracing::error!(error = %err, "Read error");
                    break;
                }
            };
            if let Err(err) = dst.write_all(&buf[..n]).await {
                tracing::error!(error = %err, "Write error");
                std::process::exit(1);
            }
            if let Err(err) = dst.flush().await {
                tracing::error!(error = %err, "Write error");
                std::process::exit(1);
            }
        }

        if closes_remote {
            let _ = dst.shutdown().await;
            tracing::info!("Connection closed");
        }
        let _ = done_tx.send(());
    });

    done_rx
}
