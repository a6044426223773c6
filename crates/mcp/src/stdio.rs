// Newline-delimited JSON-RPC over stdin/stdout

use crate::context::RequestContext;
use crate::protocol::{JsonRpcError, JsonRpcResponse};
use crate::server::{McpServer, McpSession};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Serve one implicit session on the process's stdin/stdout until EOF.
pub async fn serve_stdio(server: &McpServer, ctx: RequestContext) -> std::io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(server, stdin, stdout, ctx).await
}

/// Serve one session over any line-oriented reader/writer pair.
///
/// Every response is written as a single line. Notifications and client
/// responses produce no output.
pub async fn serve<R, W>(
    server: &McpServer,
    reader: R,
    mut writer: W,
    ctx: RequestContext,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = McpSession::new();
    let mut reader = reader;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        // Raw bytes: invalid UTF-8 is a parse error, not the end of the session
        let response = match serde_json::from_slice::<Value>(line) {
            Ok(message) => server.handle_message(&session, message, &ctx).await,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable message on stdin");
                Some(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
            }
        };

        if let Some(response) = response {
            let mut out = serde_json::to_vec(&response)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }
    }

    tracing::info!("stdin closed, stopping");
    Ok(())
}
