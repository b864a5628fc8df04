//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo lee un request HTTP/1.1 directamente desde un stream de bytes.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! POST /user/add HTTP/1.1\r\n
//! Host: localhost:4000\r\n
//! Content-Length: 15\r\n
//! \r\n
//! {"name":"ada"}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD SP PATH SP VERSION`
//! 2. **Headers**: Pares `Name: Value`, tipados según la tabla de `headers`
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: exactamente `content-length` bytes
//!
//! A diferencia de un parser sobre un buffer fijo, aquí el body se acumula
//! hasta tener todos los bytes: un solo `read` del socket puede devolver
//! menos de lo pedido.

use super::error::HttpError;
use super::headers::{kind_of, HeaderValue, Headers};
use std::collections::HashMap;
use std::io::{BufRead, Read};

/// Única versión aceptada
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna `InvalidMethod` si el método no es soportado
    pub fn parse(s: &str) -> Result<Self, HttpError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            _ => Err(HttpError::InvalidMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP/1.1 parseado
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,

    /// Path tal como llegó, incluyendo el `?query` si lo hay
    path: String,

    version: String,

    /// Headers con claves en minúsculas y valores tipados
    headers: Headers,

    body: Vec<u8>,

    /// Parámetros `:nombre` enlazados por el router
    path_params: HashMap<String, String>,

    /// Parámetros del `?query` decodificados por el router
    query_params: HashMap<String, String>,
}

impl Request {
    /// Crea un request vacío (sin headers ni body)
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            version: HTTP_VERSION.to_string(),
            headers: Headers::new(),
            body: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    /// Agrega un header (builder, útil en tests y handlers)
    pub fn with_header(mut self, name: &str, value: impl Into<HeaderValue>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Establece el body (builder)
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Parsea un request completo desde un slice de bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use segment_http::http::Request;
    ///
    /// let raw = b"GET /user/42 HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/user/42");
    /// assert_eq!(request.header_str("host"), Some("localhost"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, HttpError> {
        let mut reader = buffer;
        read_request(&mut reader)
    }

    // === Acceso a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    /// Atajo para headers de tipo string
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(HeaderValue::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Longitud del body declarada por `content-length`.
    ///
    /// Si el header no existe, no es entero o es negativo, la longitud es 0.
    pub fn content_length(&self) -> usize {
        self.headers
            .get("content-length")
            .and_then(HeaderValue::as_int)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(|s| s.as_str())
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    /// Guarda los parámetros que el router enlazó para este request
    pub(crate) fn set_route_params(
        &mut self,
        path_params: HashMap<String, String>,
        query_params: HashMap<String, String>,
    ) {
        self.path_params = path_params;
        self.query_params = query_params;
    }
}

/// Lee un request completo (request line, headers y body) desde `reader`.
///
/// El deadline no se maneja aquí: lo impone el stream que está debajo.
///
/// # Errores
///
/// - `ConnectionClosed` si el stream termina antes del primer byte
/// - errores de protocolo si la request line o algún header es inválido
/// - `Read`/`ReadTimeout` si el transporte falla a mitad del mensaje
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request, HttpError> {
    // 1. Request line
    let line = match read_line(reader)? {
        Some(line) => line,
        None => return Err(HttpError::ConnectionClosed),
    };
    let (method, path) = parse_request_line(&line)?;
    let mut request = Request::new(method, &path);

    // 2. Headers
    request.headers = parse_headers(reader)?;

    // 3. Body
    let length = request.content_length();
    if length > 0 {
        let mut body = Vec::with_capacity(length.min(64 * 1024));
        // `take` + `read_to_end` sigue leyendo hasta juntar `length` bytes
        let read = reader
            .take(length as u64)
            .read_to_end(&mut body)
            .map_err(HttpError::from_read)?;
        if read < length {
            return Err(HttpError::Read(std::io::ErrorKind::UnexpectedEof.into()));
        }
        request.body = body;
    }

    Ok(request)
}

/// Lee una línea terminada en `\n` y le quita el `\r\n` (o `\n`) final.
///
/// Retorna `None` si el stream terminó sin datos.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, HttpError> {
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf).map_err(HttpError::from_read)?;
    if n == 0 {
        return Ok(None);
    }
    if buf.last() != Some(&b'\n') {
        // EOF a mitad de línea
        return Err(HttpError::Read(std::io::ErrorKind::UnexpectedEof.into()));
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    String::from_utf8(buf).map(Some).map_err(|_| HttpError::InvalidEncoding)
}

/// Parsea la request line
///
/// Formato: `GET /path?query HTTP/1.1`, separado por espacios simples
fn parse_request_line(line: &str) -> Result<(Method, String), HttpError> {
    let parts: Vec<&str> = line.split(' ').collect();

    // Debe tener exactamente 3 partes: METHOD PATH VERSION
    if parts.len() != 3 {
        return Err(HttpError::MalformedStartLine(line.to_string()));
    }

    let method = Method::parse(parts[0])?;

    if parts[2] != HTTP_VERSION {
        return Err(HttpError::InvalidVersion(parts[2].to_string()));
    }

    Ok((method, parts[1].to_string()))
}

/// Parsea headers hasta la línea vacía.
///
/// Una línea sin `:` también termina los headers en vez de fallar.
fn parse_headers<R: BufRead>(reader: &mut R) -> Result<Headers, HttpError> {
    let mut headers = Headers::new();

    loop {
        let line = match read_line(reader)? {
            Some(line) => line,
            None => return Err(HttpError::Read(std::io::ErrorKind::UnexpectedEof.into())),
        };

        let Some((name, value)) = line.split_once(':') else {
            break;
        };

        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        let typed = match HeaderValue::coerce(&name, value, kind_of(&name)) {
            Ok(typed) => typed,
            // content-length ilegible: se conserva como texto y el body mide 0
            Err(_) if name == "content-length" => HeaderValue::Str(value.to_string()),
            Err(e) => return Err(e),
        };
        headers.insert(&name, typed);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufReader;

    /// Reader que entrega como mucho `chunk` bytes por llamada
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_parse_simple_get() {
        let request = Request::parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.version(), "HTTP/1.1");
        assert!(request.headers().is_empty());
        assert!(request.body().is_empty());
    }

    #[test]
    fn test_all_methods() {
        for (raw, method) in [
            ("GET", Method::GET),
            ("POST", Method::POST),
            ("PUT", Method::PUT),
            ("DELETE", Method::DELETE),
        ] {
            let msg = format!("{} /x HTTP/1.1\r\n\r\n", raw);
            assert_eq!(Request::parse(msg.as_bytes()).unwrap().method(), method);
        }
    }

    #[test]
    fn test_invalid_method() {
        let result = Request::parse(b"PATCH / HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(HttpError::InvalidMethod(m)) if m == "PATCH"));
    }

    #[test]
    fn test_invalid_version() {
        let result = Request::parse(b"GET / HTTP/1.0\r\n\r\n");
        assert!(matches!(result, Err(HttpError::InvalidVersion(_))));
    }

    #[test]
    fn test_malformed_start_line() {
        assert!(matches!(
            Request::parse(b"GET /\r\n\r\n"),
            Err(HttpError::MalformedStartLine(_))
        ));
        // doble espacio produce un token vacío
        assert!(matches!(
            Request::parse(b"GET  / HTTP/1.1\r\n\r\n"),
            Err(HttpError::MalformedStartLine(_))
        ));
    }

    #[test]
    fn test_empty_stream_is_connection_closed() {
        assert!(matches!(Request::parse(b""), Err(HttpError::ConnectionClosed)));
    }

    #[test]
    fn test_truncated_headers() {
        let result = Request::parse(b"GET / HTTP/1.1\r\nHost: x\r\n");
        assert!(matches!(result, Err(HttpError::Read(_))));
    }

    #[test]
    fn test_headers_are_lowercased_and_typed() {
        let raw = b"GET / HTTP/1.1\r\nHost:  localhost:4000 \r\nContent-Length: 0\r\nX-Thing: a:b\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header_str("host"), Some("localhost:4000"));
        assert_eq!(request.header("content-length"), Some(&HeaderValue::Int(0)));
        // solo se separa en el primer ':'
        assert_eq!(request.header_str("x-thing"), Some("a:b"));
    }

    #[test]
    fn test_invalid_int_header_fails() {
        let raw = b"GET / HTTP/1.1\r\nAccess-Control-Max-Age: soon\r\n\r\n";
        let result = Request::parse(raw);
        assert!(matches!(result, Err(HttpError::InvalidHeaderValue { name, .. }) if name == "access-control-max-age"));
    }

    #[test]
    fn test_non_numeric_content_length_means_empty_body() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: abc\r\n\r\nhello";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.content_length(), 0);
        assert!(request.body().is_empty());
        assert_eq!(request.header_str("content-length"), Some("abc"));
    }

    #[test]
    fn test_negative_content_length_means_empty_body() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: -3\r\n\r\n";
        let request = Request::parse(raw).unwrap();
        assert_eq!(request.content_length(), 0);
    }

    #[test]
    fn test_body_read_by_content_length() {
        let raw = b"POST /user/add HTTP/1.1\r\nContent-Length: 5\r\n\r\nhelloEXTRA";
        let mut reader: &[u8] = raw;
        let request = read_request(&mut reader).unwrap();

        assert_eq!(request.body(), b"hello");
        // lo que sobra queda en el stream para el siguiente mensaje
        assert_eq!(reader, b"EXTRA");
    }

    #[test]
    fn test_fragmented_body_is_fully_read() {
        let raw = b"PUT /x HTTP/1.1\r\nContent-Length: 11\r\n\r\nhello world";
        let mut reader = BufReader::with_capacity(4, Trickle { data: raw, chunk: 3 });
        let request = read_request(&mut reader).unwrap();

        assert_eq!(request.body(), b"hello world");
    }

    #[test]
    fn test_short_body_is_an_error() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 10\r\n\r\nabc";
        assert!(matches!(Request::parse(raw), Err(HttpError::Read(_))));
    }

    #[test]
    fn test_header_without_colon_ends_headers() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 4\r\nbroken line\r\nbody";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.body(), b"body");
    }

    #[test]
    fn test_non_utf8_start_line() {
        let raw = b"GET /\xff\xfe HTTP/1.1\r\n\r\n";
        assert!(matches!(Request::parse(raw), Err(HttpError::InvalidEncoding)));
    }

    #[test]
    fn test_two_messages_on_one_stream() {
        let raw = b"GET /a HTTP/1.1\r\n\r\nDELETE /b HTTP/1.1\r\n\r\n";
        let mut reader: &[u8] = raw;

        assert_eq!(read_request(&mut reader).unwrap().path(), "/a");
        let second = read_request(&mut reader).unwrap();
        assert_eq!(second.method(), Method::DELETE);
        assert_eq!(second.path(), "/b");
        assert!(matches!(read_request(&mut reader), Err(HttpError::ConnectionClosed)));
    }
}
