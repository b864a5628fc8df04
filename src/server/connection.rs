//! # Dispatch loop por conexión
//! src/server/connection.rs
//!
//! Cada conexión aceptada corre este ciclo en su propio thread:
//!
//! ```text
//!  ┌──────────┐   ┌─────────┐   ┌──────────┐   ┌─────────┐
//!  │ Reading  │──▶│ Routing │──▶│ Handling │──▶│ Writing │──┐
//!  └──────────┘   └─────────┘   └──────────┘   └─────────┘  │
//!       ▲   │          │ 404 / 400                 ▲   │     │
//!       │   │          └──────────────────────────┘    │     │
//!       │   ▼ error                               error ▼    │
//!       │ Closed                                    Closed   │
//!       └────────────────────────────────────────────────────┘
//! ```
//!
//! Un request a la vez: el siguiente no se lee hasta haber escrito por
//! completo la respuesta actual. Los errores de lectura o escritura cierran
//! la conexión sin enviar nada; los de routing generan una respuesta de
//! error y la conexión sigue abierta.

use super::logger::ExchangeLogger;
use super::transport::{DeadlineStream, Transport};
use crate::http::{read_request, HttpError, Request, Response, StatusCode};
use crate::router::{Handler, RouteError, Router};
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

/// Deadlines de lectura y escritura de un mensaje completo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(10),
        }
    }
}

/// Estado de solo lectura que comparten todas las conexiones
#[derive(Clone)]
pub struct Shared {
    pub router: Arc<Router>,
    pub logger: Arc<dyn ExchangeLogger>,

    /// Handler alternativo para rutas inexistentes
    pub not_found: Option<Handler>,

    pub timeouts: Timeouts,
}

/// Una conexión HTTP/1.1 persistente
pub struct Connection<S: Transport> {
    stream: BufReader<DeadlineStream<S>>,
    shared: Shared,
    exchanges: u64,
}

impl<S: Transport> Connection<S> {
    pub fn new(stream: S, shared: Shared) -> Self {
        Self {
            stream: BufReader::new(DeadlineStream::new(stream)),
            shared,
            exchanges: 0,
        }
    }

    /// Atiende requests hasta que la lectura o la escritura fallen.
    ///
    /// Retorna el error que cerró la conexión (`ConnectionClosed` si el
    /// cliente simplemente se fue).
    pub fn serve(mut self) -> HttpError {
        loop {
            let mut request = match self.read() {
                Ok(request) => request,
                Err(e) => return self.closed(e),
            };
            tracing::debug!(method = %request.method(), path = request.path(), "request read");

            let mut response = self.route(&mut request);

            apply_request_defaults(&request, &mut response);
            self.shared.logger.log(&request, &response);

            if let Err(e) = self.write(&response) {
                return self.closed(e);
            }
            self.exchanges += 1;
        }
    }

    fn read(&mut self) -> Result<Request, HttpError> {
        self.stream.get_mut().arm_read(self.shared.timeouts.read);
        let result = read_request(&mut self.stream);
        let cleared = self.stream.get_mut().clear();

        let request = result?;
        cleared.map_err(HttpError::Read)?;
        Ok(request)
    }

    /// Routing + Handling
    fn route(&self, request: &mut Request) -> Response {
        let mut response = Response::new();

        match self.shared.router.dispatch(request.path()) {
            Ok(matched) => {
                tracing::debug!(pattern = %matched.pattern, "route matched");
                request.set_route_params(matched.path_params, matched.query_params);
                (matched.handler)(request, &mut response);
            }
            Err(e) => match (&e, self.shared.not_found) {
                (RouteError::NotFound(_), Some(handler)) => {
                    tracing::debug!(error = %e, "no route, using not-found handler");
                    response.set_status(StatusCode::NotFound);
                    handler(request, &mut response);
                }
                _ => {
                    tracing::debug!(error = %e, "routing failed");
                    response = Response::error(e.status(), &e.to_string());
                }
            },
        }

        response
    }

    fn write(&mut self, response: &Response) -> Result<(), HttpError> {
        let stream = self.stream.get_mut();
        stream.arm_write(self.shared.timeouts.write);
        let result = response.write_to(stream);
        let cleared = stream.clear();

        result?;
        cleared.map_err(HttpError::WriteError)
    }

    fn closed(&self, reason: HttpError) -> HttpError {
        match &reason {
            HttpError::ConnectionClosed => {
                tracing::debug!(exchanges = self.exchanges, "connection closed by peer")
            }
            e if e.is_protocol() => {
                tracing::warn!(error = %e, exchanges = self.exchanges, "dropping connection: bad request")
            }
            e => tracing::info!(error = %e, exchanges = self.exchanges, "dropping connection"),
        }
        reason
    }
}

/// Completa la respuesta antes de escribirla.
///
/// - La versión se toma del request.
/// - Cada header del request que la respuesta no tenga se copia como
///   default, salvo `content-length` (describe el body del request).
/// - Si la respuesta sigue sin `content-length`, se usa el largo del body
///   para que el cliente sepa dónde termina en una conexión persistente.
pub fn apply_request_defaults(request: &Request, response: &mut Response) {
    response.set_version(request.version());

    for (name, value) in request.headers().iter() {
        if name == "content-length" || response.headers().contains(name) {
            continue;
        }
        response.headers_mut().insert(name, value.clone());
    }

    if !response.headers().contains("content-length") {
        let length = response.body().len();
        response.headers_mut().insert("content-length", length);
    }
}
