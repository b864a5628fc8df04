//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes (un thread por conexión)
//! 3. Lee requests, los enruta y escribe responses en un ciclo persistente
//!
//! - `tcp`: accept loop
//! - `connection`: dispatch loop de una conexión
//! - `transport`: abstracción del stream y deadlines
//! - `logger`: observador de cada intercambio

pub mod connection;
pub mod logger;
pub mod tcp;
pub mod transport;

// Re-exportar para facilitar el uso
pub use connection::{Connection, Shared, Timeouts};
pub use logger::{ExchangeLogger, NoopLogger, TracingLogger};
pub use tcp::Server;
pub use transport::{DeadlineStream, Transport};
