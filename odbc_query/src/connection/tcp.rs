use super::Connection;
use crate::config::Configuration;
use crate::diagnostic::SqlState;
use crate::error::TransportError;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Frames larger than this are treated as a corrupted stream.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Writes `payload` prefixed by its length as a little-endian `u32`.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), TransportError> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(TransportError::General(format!(
            "Request of {} bytes exceeds maximum frame size",
            payload.len()
        )));
    }
    let len = payload.len() as u32;
    writer.write_all(&len.to_le_bytes()).map_err(map_io)?;
    writer.write_all(payload).map_err(map_io)?;
    writer.flush().map_err(map_io)
}

pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>, TransportError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).map_err(map_io)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(TransportError::Disconnected(format!(
            "Response frame of {} bytes exceeds maximum frame size",
            len
        )));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).map_err(map_io)?;
    Ok(payload)
}

fn map_io(err: std::io::Error) -> TransportError {
    match err.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => TransportError::Timeout,
        ErrorKind::UnexpectedEof
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::BrokenPipe => TransportError::Disconnected(err.to_string()),
        _ => TransportError::Io(err),
    }
}

fn to_duration(timeout_secs: u32) -> Option<Duration> {
    if timeout_secs == 0 {
        None
    } else {
        Some(Duration::from_secs(u64::from(timeout_secs)))
    }
}

/// Length-framed request/response connection over a single TCP stream.
///
/// Any transport failure during an exchange leaves the stream at an unknown
/// frame boundary, so the socket is shut down and every later exchange fails
/// with `Disconnected` without touching the wire.
pub struct TcpConnection {
    config: Configuration,
    schema: Mutex<String>,
    stream: Mutex<TcpStream>,
    broken: AtomicBool,
}

impl TcpConnection {
    pub fn connect(config: Configuration) -> Result<Self, TransportError> {
        config.validate()?;

        let address = config.address();
        let stream = TcpStream::connect(&address).map_err(|e| TransportError::Odbc {
            state: SqlState::UnableToEstablishConnection,
            message: format!("Failed to connect to {}: {}", address, e),
        })?;
        stream.set_nodelay(true)?;
        log::info!("Connected to {}", address);

        Ok(Self::from_stream(config, stream))
    }

    pub fn from_stream(config: Configuration, stream: TcpStream) -> Self {
        let schema = config.schema().to_string();
        Self {
            config,
            schema: Mutex::new(schema),
            stream: Mutex::new(stream),
            broken: AtomicBool::new(false),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::Acquire)
    }

    pub fn set_schema(&self, schema: impl Into<String>) -> Result<(), TransportError> {
        let mut current = self
            .schema
            .lock()
            .map_err(|_| TransportError::General("Failed to lock schema".to_string()))?;
        *current = schema.into();
        Ok(())
    }
}

impl Connection for TcpConnection {
    fn configuration(&self) -> &Configuration {
        &self.config
    }

    fn schema(&self) -> String {
        self.schema
            .lock()
            .map(|s| s.clone())
            .unwrap_or_else(|_| self.config.schema().to_string())
    }

    fn sync_message(&self, request: &[u8], timeout_secs: u32) -> Result<Vec<u8>, TransportError> {
        let mut stream = self
            .stream
            .lock()
            .map_err(|_| TransportError::General("Failed to lock connection".to_string()))?;
        if self.is_broken() {
            return Err(TransportError::Disconnected(
                "Connection is closed after a previous transport failure".to_string(),
            ));
        }

        match exchange(&mut stream, request, timeout_secs) {
            Ok(response) => {
                log::trace!(
                    "Exchanged {} request bytes for {} response bytes",
                    request.len(),
                    response.len()
                );
                Ok(response)
            }
            Err(err) => {
                self.broken.store(true, Ordering::Release);
                if let Err(e) = stream.shutdown(Shutdown::Both) {
                    log::debug!("Shutdown after transport failure: {}", e);
                }
                log::warn!("Connection closed after transport failure: {}", err);
                Err(err)
            }
        }
    }
}

fn exchange(
    stream: &mut TcpStream,
    request: &[u8],
    timeout_secs: u32,
) -> Result<Vec<u8>, TransportError> {
    let timeout = to_duration(timeout_secs);
    stream.set_write_timeout(timeout)?;
    stream.set_read_timeout(timeout)?;

    write_frame(stream, request)?;
    read_frame(stream)
}
