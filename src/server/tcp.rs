//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio thread
//! y vive hasta que el cliente se va o falla una lectura/escritura.
//!
//! No hay límite de conexiones ni cola de admisión: cada `accept` exitoso
//! crea un thread nuevo.

use super::connection::{Connection, Shared, Timeouts};
use super::logger::{ExchangeLogger, TracingLogger};
use crate::config::Config;
use crate::router::{Handler, Router};
use std::io;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    config: Config,
    shared: Shared,
}

impl Server {
    /// Crea el servidor con un router ya armado.
    ///
    /// El router queda congelado aquí: a partir de este punto solo se lee.
    pub fn new(config: Config, router: Router) -> Self {
        let shared = Shared {
            router: Arc::new(router),
            logger: Arc::new(TracingLogger),
            not_found: None,
            timeouts: Timeouts {
                read: config.read_timeout(),
                write: config.write_timeout(),
            },
        };

        Self { config, shared }
    }

    /// Reemplaza el logger de intercambios
    pub fn with_logger(mut self, logger: Arc<dyn ExchangeLogger>) -> Self {
        self.shared.logger = logger;
        self
    }

    /// Handler para paths sin ruta (por defecto se responde un 404 JSON)
    pub fn with_not_found(mut self, handler: Handler) -> Self {
        self.shared.not_found = Some(handler);
        self
    }

    /// Abre el listener en la dirección configurada
    pub fn bind(&self) -> io::Result<TcpListener> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        tracing::info!(address = %listener.local_addr()?, "listening");
        Ok(listener)
    }

    /// Bind + accept loop. Solo retorna si el bind falla.
    pub fn run(&self) -> io::Result<()> {
        let listener = self.bind()?;
        self.serve(listener);
        Ok(())
    }

    /// Accept loop sobre un listener ya abierto
    pub fn serve(&self, listener: TcpListener) {
        tracing::info!(
            read_timeout_ms = self.shared.timeouts.read.as_millis() as u64,
            write_timeout_ms = self.shared.timeouts.write.as_millis() as u64,
            "one thread per connection"
        );

        let mut next_id: u64 = 0;
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    next_id += 1;
                    self.spawn(next_id, stream);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                }
            }
        }
    }

    fn spawn(&self, id: u64, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let shared = self.shared.clone();

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", id))
            .spawn(move || {
                let span = tracing::info_span!("conn", id, %peer);
                let _guard = span.enter();
                tracing::debug!("connection accepted");
                Connection::new(stream, shared).serve();
            });

        if let Err(e) = spawned {
            tracing::error!(id, error = %e, "could not spawn connection thread");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Request, Response};
    use std::io::{Read, Write};
    use std::net::Shutdown;

    fn hello_handler(_req: &Request, res: &mut Response) {
        res.set_body("hello");
    }

    fn ephemeral_server() -> std::net::SocketAddr {
        let mut router = Router::new();
        router.register("/hello", "/", hello_handler);

        let mut config = Config::default();
        config.port = 0;
        let server = Server::new(config, router);
        let listener = server.bind().expect("bind");
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || server.serve(listener));
        addr
    }

    #[test]
    fn test_server_answers_over_tcp() {
        let addr = ephemeral_server();

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /hello HTTP/1.1\r\n\r\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();

        let mut buf = Vec::new();
        client.read_to_end(&mut buf).unwrap();
        let text = String::from_utf8_lossy(&buf);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        let addr = ephemeral_server();

        // Conecta y cierra sin mandar datos; el servidor debe seguir vivo
        drop(TcpStream::connect(addr).unwrap());

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(b"GET /hello HTTP/1.1\r\n\r\n").unwrap();
        client.shutdown(Shutdown::Write).unwrap();
        let mut buf = String::new();
        client.read_to_string(&mut buf).unwrap();
        assert!(buf.contains("200 OK"));
    }
}
