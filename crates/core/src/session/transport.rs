use anyhow::{Context, Result};
use reqbook_common::protocol::session::{encode_core_message, message_type, parse_surface_message};
use tokio::io::{self, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::EditSession;

/// Serve one edit session over a byte stream.
///
/// Framing is newline-delimited JSON in both directions. Malformed lines are
/// logged and skipped. Returns on `closePanel` or end of input.
pub async fn serve_stream<R, W>(reader: R, mut writer: W, mut session: EditSession) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::new(reader);

    loop {
        let mut line = Vec::new();
        let bytes_read =
            reader.read_until(b'\n', &mut line).await.context("failed to read session message")?;

        if bytes_read == 0 {
            debug!(session = %session.id(), "surface closed its stream");
            return Ok(());
        }

        trim_line_endings(&mut line);
        if line.iter().all(|byte| byte.is_ascii_whitespace()) {
            continue;
        }

        let message = match parse_surface_message(&line) {
            Ok(message) => message,
            Err(error) => {
                warn!(session = %session.id(), %error, "ignoring malformed session message");
                if let Some(kind) = message_type(&line) {
                    session.reject_unreadable(&kind);
                }
                continue;
            }
        };

        let step = session.handle(message).await;
        for reply in &step.replies {
            let mut encoded = encode_core_message(reply)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await.context("failed to write session message")?;
        }
        writer.flush().await.context("failed to flush session messages")?;

        if step.close {
            return Ok(());
        }
    }
}

/// Serve a session over a single duplex stream (socket, pipe, ...).
pub async fn serve_duplex<IO>(stream: IO, session: EditSession) -> Result<()>
where
    IO: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, write_half) = io::split(stream);
    serve_stream(read_half, write_half, session).await
}

fn trim_line_endings(line: &mut Vec<u8>) {
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
}
