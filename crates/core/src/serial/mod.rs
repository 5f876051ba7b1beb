use std::{
    io::{self, BufRead, BufReader},
    time::Duration,
};

use serialport::{SerialPort, SerialPortInfo};

use crate::{config::SerialConfig, BridgeError, Result};

/// Driver-level read timeout. Expiry is retried, so the bridge still waits
/// indefinitely for the next line.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything the dispatch loop can pull newline-terminated lines from.
pub trait LineSource {
    /// Returns the next line with surrounding whitespace stripped, or `None`
    /// once the source is exhausted.
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Line reader over any buffered byte stream. Partial lines survive read
/// timeouts and are completed by the following reads.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for LineReader<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) if self.buf.is_empty() => return Ok(None),
                Ok(_) => break,
                Err(err) if is_retryable(&err) => continue,
                Err(err) => return Err(err.into()),
            }
        }

        let line = String::from_utf8(std::mem::take(&mut self.buf))?;
        Ok(Some(line.trim().to_string()))
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// The long-lived serial connection to the controller. Running out of data
/// means the device went away, which is fatal.
pub struct SerialSource<R = BufReader<Box<dyn SerialPort>>> {
    port_name: String,
    lines: LineReader<R>,
}

impl SerialSource {
    /// Opens the configured port. Failure here is fatal for the bridge.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(config.port.as_str(), config.baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;
        tracing::info!(
            port = %config.port,
            baud_rate = config.baud_rate,
            "opened serial port"
        );

        Ok(Self::from_reader(config.port.clone(), BufReader::new(port)))
    }
}

impl<R: BufRead> SerialSource<R> {
    pub(crate) fn from_reader(port_name: impl Into<String>, reader: R) -> Self {
        Self {
            port_name: port_name.into(),
            lines: LineReader::new(reader),
        }
    }
}

impl<R: BufRead> LineSource for SerialSource<R> {
    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next_line()? {
            Some(line) => Ok(Some(line)),
            None => Err(BridgeError::SerialClosed(self.port_name.clone())),
        }
    }
}

impl<R> std::fmt::Debug for SerialSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSource")
            .field("port_name", &self.port_name)
            .finish()
    }
}

/// Lists the serial ports visible to the host.
pub fn available_ports() -> Result<Vec<SerialPortInfo>> {
    Ok(serialport::available_ports()?)
}
