//! Command socket server
//!
//! Listens on a per-session Unix socket and serves each accepted
//! connection on its own task: read one request line, dispatch it against
//! the shared window-manager context, write one outcome line. Command
//! execution across all connections is serialized through a single async
//! mutex over the context, so handlers always see exclusive access to
//! host state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use gable_core::{handle_call, CommandRegistry};
use gable_protocol::{encode_line, CallOutcome, CallRequest};

/// Server half of the command socket
///
/// Owns the listening socket, the command registry, and the host context.
pub struct CommandServer<C> {
    path: PathBuf,
    registry: Arc<CommandRegistry<C>>,
    context: Arc<Mutex<C>>,
    shutdown_token: Option<CancellationToken>,
}

impl<C: Send + 'static> CommandServer<C> {
    /// Create a server for the given socket path
    ///
    /// Binding happens in [`CommandServer::run`].
    pub fn new(
        path: impl Into<PathBuf>,
        registry: Arc<CommandRegistry<C>>,
        context: Arc<Mutex<C>>,
    ) -> Self {
        Self {
            path: path.into(),
            registry,
            context,
            shutdown_token: None,
        }
    }

    /// Set the shutdown token (call before run)
    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown_token = Some(token);
        self
    }

    /// Socket path this server binds
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bind the socket and serve connections until shut down
    ///
    /// A stale socket file left behind by a previous run is removed before
    /// binding, so a restart re-binds cleanly.
    pub async fn run(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove stale socket at {}", self.path.display())
            })?;
            tracing::debug!(path = %self.path.display(), "removed stale socket");
        }

        let listener = UnixListener::bind(&self.path)
            .with_context(|| format!("Failed to bind command socket at {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), "command socket listening");

        let shutdown = self
            .shutdown_token
            .clone()
            .unwrap_or_else(CancellationToken::new);

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let registry = Arc::clone(&self.registry);
                            let context = Arc::clone(&self.context);

                            tokio::spawn(async move {
                                if let Err(e) = handle_client(stream, registry, context).await {
                                    tracing::warn!("command client error: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::error!("failed to accept command connection: {}", e);
                        }
                    }
                }
                _ = shutdown.cancelled() => {
                    tracing::info!("command socket shutting down");
                    return Ok(());
                }
            }
        }
    }
}

/// Serve one connection: strictly alternate receive, execute, send
async fn handle_client<C>(
    stream: UnixStream,
    registry: Arc<CommandRegistry<C>>,
    context: Arc<Mutex<C>>,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => return Ok(()), // EOF
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let outcome = match serde_json::from_str::<CallRequest>(trimmed) {
                    Ok(request) => {
                        // One invocation at a time against the host context,
                        // regardless of how many clients are connected.
                        let mut ctx = context.lock().await;
                        handle_call(&registry, &mut ctx, &request)
                    }
                    Err(e) => {
                        tracing::warn!("malformed request: {}", e);
                        CallOutcome::error(format!("Invalid request: {e}"))
                    }
                };

                let response = encode_line(&outcome)?;
                writer.write_all(response.as_bytes()).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
