use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

static BUFFER: Mutex<Option<Vec<u8>>> = Mutex::new(None);

fn buffer() -> MutexGuard<'static, Option<Vec<u8>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log output is held in memory
/// instead of being written to stderr.
pub fn activate() {
    *buffer() = Some(Vec::new());
}

/// Deactivate buffering and return everything collected, one entry per line.
pub fn drain() -> Vec<String> {
    let bytes = buffer().take().unwrap_or_default();
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// `MakeWriter` for the tracing subscriber: stderr normally, the buffer
/// while the dashboard owns the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

pub struct BufferedStderrWriter;

impl Write for BufferedStderrWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = buffer();
        if let Some(held) = guard.as_mut() {
            held.extend_from_slice(buf);
            Ok(buf.len())
        } else {
            drop(guard);
            io::stderr().write(buf)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = BufferedStderrWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferedStderrWriter
    }
}
