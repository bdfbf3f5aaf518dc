//! Connection Handler Module
//!
//! This module handles individual client connections to LineKV.
//! Each client gets its own handler task that runs in a loop,
//! reading request lines and sending responses.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read bytes from socket  │ │  AwaitingData
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Split complete lines    │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Execute + send response │ │  ProcessingLine (per line)
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. EOF / read error / write error
//!        │
//!        ▼
//! 5. Socket dropped, handler task ends  (Closed)
//! ```
//!
//! ## Buffer Management
//!
//! We use a BytesMut buffer to accumulate incoming data. TCP is a stream
//! protocol: a read may deliver half a line, or several lines at once.
//! Complete lines are split off the front of the buffer; a trailing partial
//! line stays put until the rest of it arrives.

use crate::commands::CommandHandler;
use crate::protocol::{next_line, Response};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// This struct owns the socket and the accumulation buffer for one
/// connected client. Neither is ever shared with another connection.
/// It is generic over the stream so it can run on anything that reads
/// and writes bytes, not only a `TcpStream`.
pub struct ConnectionHandler<S = TcpStream> {
    /// The stream for this connection
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Bytes received but not yet resolved into a complete line
    buffer: BytesMut,

    /// The command handler (shares the storage engine)
    command_handler: CommandHandler,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The stream for this connection
    /// * `addr` - The client's socket address
    /// * `command_handler` - The command handler for executing commands
    /// * `stats` - Shared connection statistics
    pub fn new(
        stream: S,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            command_handler,
            stats,
        }
    }

    /// Runs the main connection loop.
    ///
    /// Reads lines from the client, executes them, and sends back one
    /// response per command until the client disconnects or an I/O error
    /// occurs. A clean EOF returns `Ok(())`.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected"),
            Err(ConnectionError::UnexpectedEof { pending }) => {
                debug!(client = %self.addr, pending = pending, "Client disconnected mid-line")
            }
            Err(ConnectionError::Io(io_err))
                if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        self.stats.connection_closed();
        result
    }

    /// The main read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            // Answer every complete line already buffered, in arrival order
            while let Some(line) = next_line(&mut self.buffer) {
                trace!(
                    client = %self.addr,
                    line_len = line.len(),
                    remaining = self.buffer.len(),
                    "Extracted line"
                );

                if let Some(response) = self.command_handler.handle_line(&line) {
                    self.stats.command_processed();
                    self.send_response(&response).await?;
                }
            }

            if !self.read_more_data().await? {
                return Ok(());
            }
        }
    }

    /// Reads more data from the socket into the buffer.
    ///
    /// Returns `Ok(false)` on a clean EOF.
    async fn read_more_data(&mut self) -> Result<bool, ConnectionError> {
        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(INITIAL_BUFFER_SIZE);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            // Connection closed by client
            if self.buffer.is_empty() {
                return Ok(false);
            } else {
                // Partial line in buffer, dropped unanswered
                return Err(ConnectionError::UnexpectedEof {
                    pending: self.buffer.len(),
                });
            }
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(true)
    }

    /// Sends a response to the client.
    async fn send_response(&mut self, response: &Response) -> Result<(), ConnectionError> {
        let bytes = response.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent response"
        );
        Ok(())
    }
}

/// Errors that end a connection.
///
/// None of these affect the storage engine or any other connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error on read or write
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client closed the connection with a partial line buffered
    #[error("Unexpected end of stream ({pending} bytes of an incomplete line)")]
    UnexpectedEof { pending: usize },
}

/// Handles a client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion. Errors end only this connection and have
/// already been logged by the handler.
///
/// # Arguments
///
/// * `stream` - The TCP stream for this connection
/// * `addr` - The client's socket address
/// * `command_handler` - The command handler for executing commands
/// * `stats` - Shared connection statistics
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats);
    let _ = handler.run().await;
}
