#![forbid(unsafe_code)]

//! `tracing` output routed to the browser console.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

/// Buffers one formatted event and logs it on drop.
pub(crate) struct ConsoleLine {
    buf: Vec<u8>,
}

impl io::Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        web_sys::console::log_1(&JsValue::from_str(text.trim_end()));
    }
}

pub(crate) struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine {
            buf: Vec::with_capacity(128),
        }
    }
}

/// Install the console subscriber. Later calls (a second mount on the same
/// page) keep the first subscriber.
pub(crate) fn init(level: LevelFilter) {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_max_level(level)
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(%level, "console logging installed");
    }
}
