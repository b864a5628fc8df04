//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona la `Response` que llenan los handlers y su
//! serialización a bytes.
//!
//! ## Formato de una respuesta HTTP/1.1
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! content-length: 13\r\n
//! content-type: application/json\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! Los headers hop-by-hop (`connection`, `transfer-encoding`, ...) nunca se
//! serializan, aunque estén en la respuesta.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use segment_http::http::{Response, StatusCode};
//!
//! let mut response = Response::new();
//! response.set_status(StatusCode::Created);
//! response.set_header("content-type", "text/plain");
//! response.set_body("hola");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 201 Created\r\n"));
//! ```

use super::error::HttpError;
use super::headers::{is_hop_by_hop, HeaderValue, Headers};
use super::request::HTTP_VERSION;
use super::StatusCode;
use std::io::Write;

/// Representa una respuesta HTTP/1.1 completa
#[derive(Debug, Clone)]
pub struct Response {
    version: String,

    /// Código numérico (200, 404, ...)
    status_code: u16,

    /// Texto de razón ("OK", "Not Found", ...)
    status_text: String,

    headers: Headers,

    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta `200 OK` sin headers ni body
    pub fn new() -> Self {
        Self {
            version: HTTP_VERSION.to_string(),
            status_code: StatusCode::Ok.as_u16(),
            status_text: StatusCode::Ok.reason_phrase().to_string(),
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Crea una respuesta de error con mensaje JSON
    ///
    /// Formato del JSON: `{"error": "mensaje"}`
    pub fn error(status: StatusCode, message: &str) -> Self {
        let mut response = Self::new();
        response.set_status(status);
        response.set_header("content-type", "application/json");
        response.set_body(serde_json::json!({ "error": message }).to_string());
        response
    }

    /// Cambia el código y el texto de estado
    pub fn set_status(&mut self, status: StatusCode) {
        self.status_code = status.as_u16();
        self.status_text = status.reason_phrase().to_string();
    }

    /// Para códigos que no están en `StatusCode`
    pub fn set_raw_status(&mut self, code: u16, text: &str) {
        self.status_code = code;
        self.status_text = text.to_string();
    }

    pub fn set_version(&mut self, version: &str) {
        self.version = version.to_string();
    }

    /// Agrega o reemplaza un header
    pub fn set_header(&mut self, name: &str, value: impl Into<HeaderValue>) {
        self.headers.insert(name, value);
    }

    /// Establece el body y su `content-length`.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
        self.headers.insert("content-length", self.body.len());
    }

    /// Serializa el body como JSON con su `content-type`
    pub fn set_json<T: serde::Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.set_header("content-type", "application/json");
        self.set_body(body);
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub(crate) fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers: `nombre: valor\r\n`, saltando los hop-by-hop
    /// - Línea vacía: `\r\n`
    /// - Body tal cual, sin agregar `content-length`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        let status_line = format!("{} {} {}\r\n", self.version, self.status_code, self.status_text);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers
        for (name, value) in self.headers.iter() {
            if is_hop_by_hop(name) {
                continue;
            }
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body
        result.extend_from_slice(&self.body);

        result
    }

    /// Escribe la respuesta completa en `writer` y hace flush
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), HttpError> {
        writer.write_all(&self.to_bytes()).map_err(HttpError::from_write)?;
        writer.flush().map_err(HttpError::from_write)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}
