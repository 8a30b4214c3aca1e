use anyhow::Result;
use std::io::{self, BufRead, Read, Write};
use tracing::debug;

use crate::error::{BasketError, ErrorCode, error_value};
use crate::models::request::MineRequest;

/// Maximum line size for session input: 100 MB.
const MAX_LINE_SIZE: usize = 100 * 1024 * 1024;

/// Run an NDJSON session on stdin/stdout.
pub fn run_session(handler: impl Fn(MineRequest) -> Result<serde_json::Value>) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(stdin.lock(), stdout.lock(), handler)
}

/// Read one request per line from `input` and write one response line each.
///
/// Request errors become `{"error": ...}` lines; only I/O failures on the
/// streams themselves end the session.
pub fn serve(
    input: impl BufRead,
    output: impl Write,
    handler: impl Fn(MineRequest) -> Result<serde_json::Value>,
) -> Result<()> {
    serve_with_limit(input, output, handler, MAX_LINE_SIZE)
}

/// `serve` with an explicit line cap. At most `max_line + 1` bytes of a line
/// are buffered; the rest of an oversized line is skipped unread.
fn serve_with_limit(
    mut input: impl BufRead,
    output: impl Write,
    handler: impl Fn(MineRequest) -> Result<serde_json::Value>,
    max_line: usize,
) -> Result<()> {
    let mut out = io::BufWriter::new(output);
    let mut buf: Vec<u8> = Vec::new();
    let mut handled = 0usize;

    loop {
        buf.clear();
        let read = (&mut input)
            .take(max_line as u64 + 1)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }

        let value = if !buf.ends_with(b"\n") && buf.len() > max_line {
            input.skip_until(b'\n')?;
            invalid_request(format!(
                "Input line exceeds maximum size ({max_line} bytes)"
            ))
        } else {
            let Ok(line) = std::str::from_utf8(&buf) else {
                write_line(&mut out, &invalid_request("Input line is not valid UTF-8"))?;
                handled += 1;
                continue;
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<MineRequest>(trimmed) {
                Ok(req) => handler(req).unwrap_or_else(|e| error_value(&e)),
                Err(e) => invalid_request(format!("Invalid JSON request: {e}")),
            }
        };

        write_line(&mut out, &value)?;
        handled += 1;
    }

    debug!(requests = handled, "session ended");
    Ok(())
}

fn invalid_request(message: impl Into<String>) -> serde_json::Value {
    error_value(&anyhow::Error::new(BasketError::new(
        ErrorCode::InvalidRequest,
        message,
    )))
}

fn write_line(out: &mut impl Write, value: &serde_json::Value) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
