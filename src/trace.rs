//! Trace formatter: renders a request/response pair as a replayable curl
//! command for trace-level logging. The response body must already be
//! buffered (the transport buffers it as part of `execute`) before it
//! reaches here — rendering never consumes a streaming body destined for
//! the wire.

use crate::host::Host;
use crate::request::Request;
use crate::transport::Response;
use std::fmt::Write as _;

/// Renders the curl request line for `request` issued against `host`.
///
/// Returns `Err` only on a write failure into the internal buffer; callers
/// should log and continue rather than abort the real request on failure.
pub fn render_request(host: &Host, request: &Request) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write!(out, "curl -iX {} '{}{}'", request.method, host.base_url(), request.uri())?;
    if let Some(body) = &request.body {
        write!(out, " -d '{}'", String::from_utf8_lossy(body))?;
    }
    Ok(out)
}

/// Renders `response` as `# `-prefixed status line, headers, blank marker,
/// and body — one line per original header, in original order.
pub fn render_response(response: &Response) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "# {}", response.status_line())?;
    for (name, value) in &response.headers {
        writeln!(out, "# {name}: {value}")?;
    }
    writeln!(out, "#")?;
    for line in String::from_utf8_lossy(&response.entity).lines() {
        writeln!(out, "# {line}")?;
    }
    Ok(out)
}
