//! # Segment HTTP
//! src/lib.rs
//!
//! Servidor HTTP/1.1 implementado desde cero sobre `std::net`: lee mensajes
//! directamente del socket, los enruta por segmentos de path y serializa la
//! respuesta a mano.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests, headers tipados, responses y errores
//! - `router`: Enrutamiento por prefijo + patrón con parámetros `:nombre`
//! - `server`: Accept loop, dispatch loop por conexión y deadlines
//! - `handlers`: Handlers de ejemplo (`/user/...`)
//! - `config`: CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use segment_http::config::Config;
//! use segment_http::handlers;
//! use segment_http::router::Router;
//! use segment_http::server::Server;
//!
//! let mut router = Router::new();
//! handlers::register_routes(&mut router);
//!
//! let server = Server::new(Config::default(), router);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
