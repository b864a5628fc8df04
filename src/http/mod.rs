//! # Módulo HTTP
//!
//! Este módulo implementa HTTP/1.1 desde cero, sin librerías de alto nivel:
//!
//! - Lectura de requests directamente desde un stream (`request`)
//! - Tabla de tipos de headers y valores tipados (`headers`)
//! - Construcción y serialización de responses (`response`)
//! - Códigos de estado (`status`)
//! - Errores de conexión y de protocolo (`error`)
//!
//! ### Formato de Request
//!
//! ```text
//! GET /user/42?verbose=1 HTTP/1.1\r\n
//! Host: localhost:4000\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! content-length: 13\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! No hay chunked transfer-encoding: el body siempre se delimita con
//! `content-length`.

pub mod error;
pub mod headers;
pub mod request;
pub mod response;
pub mod status;

pub use error::HttpError;
pub use headers::{HeaderKind, HeaderValue, Headers};
pub use request::{read_request, Method, Request};
pub use response::Response;
pub use status::StatusCode;
