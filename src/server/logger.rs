//! # Logger de intercambios
//! src/server/logger.rs
//!
//! Después de cada request/response el dispatch loop le pasa el par al
//! logger. El valor de retorno es informativo: el loop nunca cambia su
//! comportamiento por lo que el logger responda.

use crate::http::{Request, Response};

/// Observa cada intercambio completo de una conexión
pub trait ExchangeLogger: Send + Sync {
    fn log(&self, request: &Request, response: &Response) -> bool;
}

/// Logger por defecto: un evento de `tracing` por intercambio.
///
/// El nivel depende del código: info para <400, warn para 4xx, error para 5xx.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ExchangeLogger for TracingLogger {
    fn log(&self, request: &Request, response: &Response) -> bool {
        let method = request.method().as_str();
        let path = request.path();
        let status = response.status_code();
        let bytes = response.body().len();

        match status {
            500.. => tracing::error!(method, path, status, bytes, "exchange"),
            400..=499 => tracing::warn!(method, path, status, bytes, "exchange"),
            _ => tracing::info!(method, path, status, bytes, "exchange"),
        }
        true
    }
}

/// No registra nada (tests, benchmarks)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogger;

impl ExchangeLogger for NoopLogger {
    fn log(&self, _request: &Request, _response: &Response) -> bool {
        false
    }
}
