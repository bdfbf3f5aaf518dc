//! TCP Listener
//!
//! Binds the listening socket and runs the accept loop. Every accepted
//! connection gets its own Tokio task running a [`ConnectionHandler`]; the
//! loop goes straight back to `accept()` without waiting for it.
//!
//! There is no cap on concurrent connections. All handler tasks are started
//! from [`Server::spawn_connection`], which is the one place a bound would go.
//!
//! [`ConnectionHandler`]: crate::connection::ConnectionHandler

use crate::commands::CommandHandler;
use crate::config::Config;
use crate::connection::{handle_connection, ConnectionStats};
use crate::storage::StorageEngine;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

/// Errors that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Address resolution, socket creation or bind/listen failed
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The bound socket could not report its local address
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] std::io::Error),
}

/// A bound listener plus the state shared by all of its connections.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    storage: Arc<StorageEngine>,
    stats: Arc<ConnectionStats>,
}

impl Server {
    /// Binds the listening socket described by `config`.
    ///
    /// Any failure here is fatal: the caller gets a `ServerError` and no
    /// server exists.
    pub async fn bind(config: &Config, storage: Arc<StorageEngine>) -> Result<Self, ServerError> {
        let addr = config.bind_address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        Ok(Self {
            listener,
            local_addr,
            storage,
            stats: Arc::new(ConnectionStats::new()),
        })
    }

    /// Returns the address the server is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Returns the storage engine shared by all connections.
    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    /// Returns the shared connection statistics.
    pub fn stats(&self) -> &Arc<ConnectionStats> {
        &self.stats
    }

    /// Runs the accept loop forever.
    pub async fn run(self) {
        self.accept_loop().await
    }

    /// Runs the accept loop until `shutdown` completes.
    ///
    /// Connections already being served keep their tasks; only accepting
    /// stops.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            _ = self.accept_loop() => {}
            _ = shutdown => {}
        }
    }

    /// Main loop that accepts incoming connections
    async fn accept_loop(&self) {
        info!(addr = %self.local_addr, "Accepting connections");

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.spawn_connection(stream, addr),
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    /// Starts an independent handler task for one accepted connection.
    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let handler = CommandHandler::new(Arc::clone(&self.storage));
        let stats = Arc::clone(&self.stats);

        tokio::spawn(handle_connection(stream, addr, handler, stats));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::atomic::Ordering;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::sync::oneshot;

    fn test_config() -> Config {
        Config {
            port: 0,
            ..Config::default()
        }
    }

    async fn start_server() -> (SocketAddr, Arc<StorageEngine>, Arc<ConnectionStats>) {
        let storage = Arc::new(StorageEngine::new());
        let server = Server::bind(&test_config(), Arc::clone(&storage))
            .await
            .unwrap();
        let addr = server.local_addr();
        let stats = Arc::clone(server.stats());

        tokio::spawn(server.run());

        (addr, storage, stats)
    }

    async fn request(
        reader: &mut BufReader<TcpStream>,
        line: &str,
    ) -> String {
        reader.get_mut().write_all(line.as_bytes()).await.unwrap();
        let mut response = String::new();
        reader.read_line(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let server = Server::bind(&test_config(), Arc::new(StorageEngine::new()))
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_address_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let config = Config {
            port,
            ..Config::default()
        };
        let result = Server::bind(&config, Arc::new(StorageEngine::new())).await;

        match result {
            Err(ServerError::Bind { addr, .. }) => assert_eq!(addr, format!("127.0.0.1:{}", port)),
            other => panic!("expected bind error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let (addr, _, _) = start_server().await;
        let mut client = BufReader::new(TcpStream::connect(addr).await.unwrap());

        assert_eq!(request(&mut client, "SET a 1\n").await, "OK\n");
        assert_eq!(request(&mut client, "GET a\n").await, "1\n");
        assert_eq!(request(&mut client, "DELETE a\n").await, "DELETED\n");
        assert_eq!(request(&mut client, "GET a\n").await, "NOT_FOUND\n");
        assert_eq!(request(&mut client, "DELETE a\n").await, "NOT_FOUND\n");
    }

    #[tokio::test]
    async fn test_concurrent_setters_on_distinct_keys() {
        const CLIENTS: usize = 50;
        const KEYS_PER_CLIENT: usize = 20;

        let (addr, storage, stats) = start_server().await;

        let tasks: Vec<_> = (0..CLIENTS)
            .map(|c| {
                tokio::spawn(async move {
                    let mut client = BufReader::new(TcpStream::connect(addr).await.unwrap());
                    for k in 0..KEYS_PER_CLIENT {
                        let line = format!("SET key-{}-{} value-{}\n", c, k, k);
                        assert_eq!(request(&mut client, &line).await, "OK\n");
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(storage.len(), CLIENTS * KEYS_PER_CLIENT);
        for c in 0..CLIENTS {
            for k in 0..KEYS_PER_CLIENT {
                let key = format!("key-{}-{}", c, k);
                assert_eq!(
                    storage.get(key.as_bytes()),
                    Some(Bytes::from(format!("value-{}", k)))
                );
            }
        }
        assert_eq!(
            stats.connections_accepted.load(Ordering::Relaxed),
            CLIENTS as u64
        );
    }

    #[tokio::test]
    async fn test_disconnect_does_not_affect_other_clients() {
        let (addr, _, _) = start_server().await;

        let mut stayer = BufReader::new(TcpStream::connect(addr).await.unwrap());
        let mut leaver = TcpStream::connect(addr).await.unwrap();

        leaver.write_all(b"SET half").await.unwrap();
        drop(leaver);

        assert_eq!(request(&mut stayer, "SET x y\n").await, "OK\n");
        assert_eq!(request(&mut stayer, "GET half\n").await, "NOT_FOUND\n");
    }

    #[tokio::test]
    async fn test_run_until_stops_accepting() {
        let server = Server::bind(&test_config(), Arc::new(StorageEngine::new()))
            .await
            .unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let task = tokio::spawn(server.run_until(async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
    }
}
