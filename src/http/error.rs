//! # Errores del protocolo
//! src/http/error.rs
//!
//! Todos los fallos que pueden ocurrir mientras se lee o se escribe un
//! mensaje HTTP/1.1 sobre una conexión. Se dividen en dos familias:
//!
//! - **Conexión**: el transporte falló (EOF, timeout, error de I/O).
//! - **Protocolo**: los bytes llegaron pero no forman un mensaje válido.
//!
//! En ambos casos la conexión se cierra sin enviar respuesta.

use std::io;
use thiserror::Error;

/// Error al leer o escribir un mensaje HTTP
#[derive(Debug, Error)]
pub enum HttpError {
    /// El cliente cerró la conexión antes de enviar un nuevo mensaje
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// La lectura del mensaje completo excedió el deadline
    #[error("read deadline exceeded")]
    ReadTimeout,

    /// La escritura de la respuesta excedió el deadline
    #[error("write deadline exceeded")]
    WriteTimeout,

    /// Error de I/O durante la lectura
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    /// Error de I/O durante la escritura
    #[error("write error: {0}")]
    WriteError(#[source] io::Error),

    /// La request line no tiene exactamente 3 tokens
    #[error("malformed start line: {0:?}")]
    MalformedStartLine(String),

    /// Método fuera de GET, POST, PUT, DELETE
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// Versión distinta de HTTP/1.1
    #[error("invalid HTTP version: {0}")]
    InvalidVersion(String),

    /// El valor de un header no coincide con su tipo declarado
    #[error("invalid value {value:?} for header {name}")]
    InvalidHeaderValue { name: String, value: String },

    /// Línea que no es UTF-8 válido
    #[error("request line or header is not valid UTF-8")]
    InvalidEncoding,
}

impl HttpError {
    /// Clasifica un error de I/O de lectura.
    ///
    /// Según la plataforma, un socket con timeout reporta `WouldBlock` o
    /// `TimedOut`; ambos cuentan como deadline vencido.
    pub fn from_read(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => HttpError::ReadTimeout,
            _ => HttpError::Read(err),
        }
    }

    /// Clasifica un error de I/O de escritura
    pub fn from_write(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => HttpError::WriteTimeout,
            _ => HttpError::WriteError(err),
        }
    }

    /// `true` si el mensaje llegó pero era inválido
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            HttpError::MalformedStartLine(_)
                | HttpError::InvalidMethod(_)
                | HttpError::InvalidVersion(_)
                | HttpError::InvalidHeaderValue { .. }
                | HttpError::InvalidEncoding
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_are_classified() {
        let err = HttpError::from_read(io::Error::from(io::ErrorKind::WouldBlock));
        assert!(matches!(err, HttpError::ReadTimeout));

        let err = HttpError::from_write(io::Error::from(io::ErrorKind::TimedOut));
        assert!(matches!(err, HttpError::WriteTimeout));
    }

    #[test]
    fn test_other_io_errors_are_kept() {
        let err = HttpError::from_read(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(matches!(err, HttpError::Read(_)));
        assert!(!err.is_protocol());

        let err = HttpError::from_write(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(matches!(err, HttpError::WriteError(_)));
    }

    #[test]
    fn test_protocol_family() {
        assert!(HttpError::InvalidMethod("PATCH".into()).is_protocol());
        assert!(HttpError::InvalidEncoding.is_protocol());
        assert!(!HttpError::ConnectionClosed.is_protocol());
        assert!(!HttpError::ReadTimeout.is_protocol());
    }

    #[test]
    fn test_display() {
        let err = HttpError::InvalidHeaderValue {
            name: "content-length".into(),
            value: "x".into(),
        };
        assert_eq!(err.to_string(), r#"invalid value "x" for header content-length"#);
    }
}
