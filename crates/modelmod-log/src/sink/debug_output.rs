//! Live debug-output channel
//!
//! On Windows this is `OutputDebugStringA`, which a debugger or a capture tool
//! such as DebugView picks up even when the host has no console. Elsewhere the
//! closest equivalent is stderr.

use std::io::{self, Write};

use super::traits::Sink;
use crate::error::LogResult;

/// Sink writing to the OS debug channel
///
/// Fire-and-forget: the channel reports nothing back, so `write_line` always
/// succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOutputSink;

impl DebugOutputSink {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
fn output_debug_string(line: &str) {
    use std::ffi::CString;

    use windows::core::{s, PCSTR};
    use windows::Win32::System::Diagnostics::Debug::OutputDebugStringA;

    let text = match CString::new(line) {
        Ok(text) => text,
        Err(_) => match CString::new(line.replace('\0', "")) {
            Ok(text) => text,
            Err(_) => return,
        },
    };

    // SAFETY: both strings are NUL-terminated and outlive the calls
    unsafe {
        OutputDebugStringA(PCSTR::from_raw(text.as_ptr().cast()));
        OutputDebugStringA(s!("\r\n"));
    }
}

#[cfg(not(windows))]
fn output_debug_string(line: &str) {
    let _ = write_debug_line(&mut std::io::stderr().lock(), line);
}

/// Write `line` with the debug channel's CR-LF terminator
#[cfg_attr(windows, allow(dead_code))]
fn write_debug_line(out: &mut impl Write, line: &str) -> io::Result<()> {
    let mut buf = String::with_capacity(line.len() + 2);
    buf.push_str(line);
    buf.push_str("\r\n");
    out.write_all(buf.as_bytes())
}

impl Sink for DebugOutputSink {
    fn name(&self) -> &str {
        "debug-output"
    }

    fn write_line(&mut self, line: &str) -> LogResult<()> {
        output_debug_string(line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_never_fails() {
        let mut sink = DebugOutputSink::new();
        assert_eq!(sink.name(), "debug-output");
        assert!(sink.write_line("[test]: debug channel").is_ok());
        assert!(sink.write_line("[test]: embedded \0 nul").is_ok());
        assert!(sink.write_line("").is_ok());
    }

    #[test]
    fn test_debug_line_ends_with_crlf() {
        let mut out = Vec::new();
        write_debug_line(&mut out, "[t]: x").unwrap();
        assert_eq!(out, b"[t]: x\r\n");

        write_debug_line(&mut out, "").unwrap();
        assert_eq!(out, b"[t]: x\r\n\r\n");
    }
}
