//! # Transporte con deadlines
//! src/server/transport.rs
//!
//! El dispatch loop no depende de `TcpStream` directamente: cualquier stream
//! que sepa leer, escribir y ponerse timeouts sirve (en los tests se usan
//! streams en memoria).
//!
//! Los sockets de std solo tienen timeout *por operación*. Para acotar un
//! mensaje completo, `DeadlineStream` recalcula el tiempo restante antes de
//! cada `read`/`write` y lo instala como timeout del socket.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

/// Stream de bytes con timeouts configurables
pub trait Transport: Read + Write {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;
    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()>;
}

impl Transport for TcpStream {
    fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_read_timeout(self, timeout)
    }

    fn set_write_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        TcpStream::set_write_timeout(self, timeout)
    }
}

/// Envuelve un transporte y aplica deadlines absolutos de lectura/escritura
#[derive(Debug)]
pub struct DeadlineStream<S> {
    inner: S,
    read_deadline: Option<Instant>,
    write_deadline: Option<Instant>,
}

impl<S: Transport> DeadlineStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            read_deadline: None,
            write_deadline: None,
        }
    }

    /// Arma el deadline de lectura a `timeout` desde ahora
    pub fn arm_read(&mut self, timeout: Duration) {
        self.read_deadline = Some(Instant::now() + timeout);
    }

    pub fn arm_write(&mut self, timeout: Duration) {
        self.write_deadline = Some(Instant::now() + timeout);
    }

    /// Quita ambos deadlines (entre mensajes de la misma conexión)
    pub fn clear(&mut self) -> io::Result<()> {
        self.read_deadline = None;
        self.write_deadline = None;
        self.inner.set_read_timeout(None)?;
        self.inner.set_write_timeout(None)
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Tiempo que queda hasta `deadline`, o `TimedOut` si ya pasó
fn remaining(deadline: Instant) -> io::Result<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        return Err(io::ErrorKind::TimedOut.into());
    }
    Ok(left)
}

impl<S: Transport> Read for DeadlineStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(deadline) = self.read_deadline {
            self.inner.set_read_timeout(Some(remaining(deadline)?))?;
        }
        self.inner.read(buf)
    }
}

impl<S: Transport> Write for DeadlineStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(deadline) = self.write_deadline {
            self.inner.set_write_timeout(Some(remaining(deadline)?))?;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(deadline) = self.write_deadline {
            self.inner.set_write_timeout(Some(remaining(deadline)?))?;
        }
        self.inner.flush()
    }
}
