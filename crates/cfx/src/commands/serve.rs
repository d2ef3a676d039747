//! `cfx serve` command implementation.
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout:
//!
//! ```text
//! -> {"id": 1, "tool": "get_page", "arguments": {"page_id": "123"}}
//! <- {"id": 1, "result": {"status": "success", "page": {...}}}
//! <- {"id": 2, "error": "unknown tool: nope"}
//! ```
//!
//! Requests run concurrently, so responses arrive in completion order and
//! are matched by `id`.

use std::sync::Arc;

use cfx_config::Config;
use cfx_confluence::ConfluenceGateway;
use cfx_tools::ToolRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::gateway_from_config;
use crate::error::CliError;
use crate::output::Output;

/// Responses buffered before request tasks wait on the writer.
const RESPONSE_BUFFER: usize = 64;

/// Execute the serve command until stdin closes.
///
/// # Errors
///
/// Returns an error if Confluence is not configured or stdio fails.
pub(crate) async fn execute(config: &Config) -> Result<(), CliError> {
    let gateway = gateway_from_config(config)?;
    let registry = Arc::new(ToolRegistry::confluence());

    Output::new().info(&format!(
        "Serving {} tools on stdin (one JSON request per line)",
        registry.tool_count()
    ));

    serve(registry, gateway, tokio::io::stdin(), tokio::io::stdout()).await
}

#[derive(Debug, Deserialize)]
struct ServeRequest {
    #[serde(default)]
    id: Value,
    tool: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct ServeResponse {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServeResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, error: String) -> Self {
        Self {
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Answer requests from `input` on `output` until `input` reaches EOF.
///
/// Waits for in-flight requests before returning.
async fn serve<R, W>(
    registry: Arc<ToolRegistry>,
    gateway: ConfluenceGateway,
    input: R,
    output: W,
) -> Result<(), CliError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(RESPONSE_BUFFER);
    let writer = tokio::spawn(write_responses(rx, output));

    let mut lines = BufReader::new(input).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        while let Some(finished) = tasks.try_join_next() {
            log_task_failure(finished);
        }
        if tx.is_closed() {
            warn!("Response writer stopped, no longer reading requests");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let request: ServeRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Invalid request line");
                let response = ServeResponse::failure(Value::Null, format!("Invalid request: {e}"));
                if !deliver(&tx, response).await {
                    break;
                }
                continue;
            }
        };

        let registry = Arc::clone(&registry);
        let gateway = gateway.clone();
        let tx = tx.clone();
        tasks.spawn(async move {
            let response = dispatch(&registry, &gateway, request).await;
            deliver(&tx, response).await;
        });
    }

    while let Some(finished) = tasks.join_next().await {
        log_task_failure(finished);
    }
    drop(tx);
    writer.await?
}

async fn dispatch(
    registry: &ToolRegistry,
    gateway: &ConfluenceGateway,
    request: ServeRequest,
) -> ServeResponse {
    debug!(tool = %request.tool, "Dispatching request");
    match registry.call(gateway, &request.tool, request.arguments).await {
        Ok(result) => ServeResponse::success(request.id, result),
        Err(e) => ServeResponse::failure(request.id, e.to_string()),
    }
}

/// Queue `response` for the writer. Returns `false` once the writer is gone.
async fn deliver(tx: &mpsc::Sender<ServeResponse>, response: ServeResponse) -> bool {
    match tx.send(response).await {
        Ok(()) => true,
        Err(mpsc::error::SendError(dropped)) => {
            warn!(id = %dropped.id, "Response writer stopped, dropping response");
            false
        }
    }
}

async fn write_responses<W>(mut rx: mpsc::Receiver<ServeResponse>, mut output: W) -> Result<(), CliError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    Ok(())
}

fn log_task_failure(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        warn!(error = %e, "Request task failed");
    }
}
