//! Line-oriented request loop.
//!
//! Each input line is one JSON [`ToolRequest`]; each produces exactly one
//! JSON [`ToolReply`] line. Requests run in order on one registry, so
//! interactive operations started by an earlier line stay visible to later
//! ones.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::error::AppError;
use crate::tools::ToolRegistry;
use crate::types::{ToolReply, ToolRequest};

/// Serve requests from `reader` until EOF. Returns the number of replies written.
pub async fn run_batch<R, W>(
    registry: &ToolRegistry,
    reader: R,
    mut writer: W,
) -> Result<usize, std::io::Error>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut served = 0usize;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(registry, &line).await;
        let mut encoded = serde_json::to_string(&reply)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        served += 1;
    }
    Ok(served)
}

/// Decode one request line and run it.
pub async fn handle_line(registry: &ToolRegistry, line: &str) -> ToolReply {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            let err = AppError::Request(e.to_string());
            return ToolReply::failure("", err.to_string());
        }
    };
    debug!(tool = %request.tool, "batch request");
    let arguments = request.arguments.to_string();
    match registry.execute(&request.tool, &arguments).await {
        Ok(output) => ToolReply::success(request.tool, output),
        Err(e) => ToolReply::failure(request.tool, AppError::from(e).to_string()),
    }
}
