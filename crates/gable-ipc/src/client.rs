//! Command socket client
//!
//! Presents remote commands as local calls: encode a request, block for
//! the outcome, and translate the status code back into ordinary Rust
//! control flow. Names are checked against a local mirror of the command
//! table before any I/O, so a typo fails fast without a round trip.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use gable_core::{default_socket_path, CommandError, CommandIndex};
use gable_protocol::{encode_line, CallOutcome, CallRequest, Status};

use serde_json::{Map, Value};

/// Client half of the command socket
pub struct CommandClient {
    path: PathBuf,
    commands: CommandIndex,
    stream: Option<UnixStream>,
}

impl CommandClient {
    /// Create a client for the current session's default socket path
    pub fn new(commands: CommandIndex) -> Self {
        Self::with_path(default_socket_path(), commands)
    }

    /// Create a client for an explicit socket path
    pub fn with_path(path: impl Into<PathBuf>, commands: CommandIndex) -> Self {
        Self {
            path: path.into(),
            commands,
            stream: None,
        }
    }

    /// Socket path this client connects to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Local mirror of the server's command table
    pub fn commands(&self) -> &CommandIndex {
        &self.commands
    }

    /// Invoke a remote command and return its result
    ///
    /// Fails with [`CommandError::NotFound`] before any I/O when the name
    /// is absent from the local mirror. Server-side outcomes map back to
    /// [`CommandError::Failure`] (expected failures) and
    /// [`CommandError::Fault`] (internal faults, payload is a diagnostic
    /// trace). Connection problems surface as
    /// [`CommandError::TransportLost`].
    pub async fn invoke(
        &mut self,
        name: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value, CommandError> {
        if !self.commands.contains(name) {
            return Err(CommandError::NotFound(name.to_string()));
        }

        let request = CallRequest::new(name, args, kwargs);
        let outcome = match self.roundtrip(&request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Drop the cached connection; the next call reconnects.
                self.stream = None;
                return Err(e);
            }
        };

        match outcome.status {
            Status::Success => Ok(outcome.payload),
            Status::Error => Err(CommandError::Failure(payload_text(&outcome))),
            Status::Exception => Err(CommandError::Fault(payload_text(&outcome))),
        }
    }

    /// Connect to the server, reusing an existing connection if present
    async fn connect(&mut self) -> Result<(), CommandError> {
        if self.stream.is_some() {
            return Ok(());
        }

        tracing::debug!(path = %self.path.display(), "connecting to command socket");

        let stream = UnixStream::connect(&self.path).await.map_err(|e| {
            lost(format!(
                "failed to connect to {}: {e}. Is the window manager running?",
                self.path.display()
            ))
        })?;

        self.stream = Some(stream);
        Ok(())
    }

    /// Send one request line and block for one outcome line
    async fn roundtrip(&mut self, request: &CallRequest) -> Result<CallOutcome, CommandError> {
        self.connect().await?;
        let stream = self.stream.as_mut().ok_or_else(|| lost("not connected"))?;

        let line = encode_line(request).map_err(|e| lost(e.to_string()))?;
        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|e| lost(e.to_string()))?;

        let (reader, _writer) = stream.split();
        let mut reader = BufReader::new(reader);
        let mut response_line = String::new();
        let n = reader
            .read_line(&mut response_line)
            .await
            .map_err(|e| lost(e.to_string()))?;
        if n == 0 {
            return Err(lost("connection closed before outcome arrived"));
        }

        serde_json::from_str(&response_line).map_err(|e| lost(format!("invalid response: {e}")))
    }
}

fn payload_text(outcome: &CallOutcome) -> String {
    match &outcome.payload {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn lost(message: impl Into<String>) -> CommandError {
    CommandError::TransportLost(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_name_fails_without_io() {
        // Path points nowhere; a NotFound here proves no connection was attempted.
        let mut client =
            CommandClient::with_path("/nonexistent/socket", CommandIndex::default());
        let result = client.invoke("missing", vec![], Map::new()).await;
        assert!(matches!(result, Err(CommandError::NotFound(name)) if name == "missing"));
    }
}
