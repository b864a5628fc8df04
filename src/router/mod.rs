//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea paths HTTP a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! "/user/42/name?x=1"
//!   │
//!   ├─ prefijo "/user"   → lista de rutas registradas bajo "/user"
//!   └─ resto ["42", "name"] → se compara segmento a segmento
//!          ":id"   → enlaza id = "42"
//!          "name"  → literal, debe ser igual
//! ```
//!
//! El orden de registro es el único criterio de desempate: entre rutas que
//! se solapan gana la primera que se registró.
//!
//! El router se construye una sola vez antes de aceptar conexiones y luego
//! se comparte en solo lectura (`Arc<Router>`) entre todos los threads.

pub mod query;

use crate::http::{Request, Response, StatusCode};
use query::{parse_query_string, split_query};
use std::collections::HashMap;
use thiserror::Error;

/// Tipo de función handler
///
/// Un handler recibe el Request (con parámetros ya enlazados) y llena la
/// Response que se le pasa.
pub type Handler = fn(&Request, &mut Response);

/// Fallo al resolver un path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Route not found: {0}")]
    NotFound(String),

    /// El último segmento tiene más de un `?`
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),
}

impl RouteError {
    /// Código de estado con el que se responde este error
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::NotFound(_) => StatusCode::NotFound,
            RouteError::MalformedUrl(_) => StatusCode::BadRequest,
        }
    }
}

/// Resultado de un dispatch exitoso
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub handler: Handler,

    /// Patrón completo que hizo match, ej: "/user/:id"
    pub pattern: String,

    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(raw.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    segments: Vec<Segment>,
    handler: Handler,
}

impl Route {
    /// Compara los segmentos del request (ya sin query) con el patrón.
    ///
    /// Retorna los parámetros enlazados si todos los segmentos coinciden.
    fn bind(&self, request_segments: &[&str]) -> Option<HashMap<String, String>> {
        if self.segments.len() != request_segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, value) in self.segments.iter().zip(request_segments) {
            match segment {
                Segment::Literal(literal) if literal == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), value.to_string());
                }
            }
        }
        Some(params)
    }
}

/// Router que mapea prefijo → rutas registradas en orden
#[derive(Debug, Default)]
pub struct Router {
    scopes: HashMap<String, Vec<Route>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una ruta bajo un prefijo
    ///
    /// El patrón es relativo al prefijo. Los segmentos que empiezan con `:`
    /// son dinámicos.
    ///
    /// # Ejemplo
    /// ```
    /// use segment_http::router::Router;
    /// use segment_http::http::{Request, Response};
    ///
    /// fn get_user(req: &Request, res: &mut Response) {
    ///     res.set_body(format!("user {}", req.path_param("id").unwrap_or("?")));
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register("/user", "/:id", get_user);
    ///
    /// let m = router.dispatch("/user/42").unwrap();
    /// assert_eq!(m.path_params["id"], "42");
    /// ```
    pub fn register(&mut self, prefix: &str, pattern: &str, handler: Handler) {
        let prefix = normalize_prefix(prefix);
        if prefix[1..].contains('/') {
            tracing::warn!(%prefix, "prefix has more than one segment and will never match");
        }

        let segments: Vec<Segment> = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();

        let full_pattern = format!("{}/{}", prefix.trim_end_matches('/'), pattern.trim_matches('/'));
        tracing::debug!(pattern = %full_pattern, "route registered");

        self.scopes.entry(prefix).or_default().push(Route {
            pattern: full_pattern,
            segments,
            handler,
        });
    }

    /// Atajo para registrar varias rutas bajo el mismo prefijo
    pub fn scope<'a>(&'a mut self, prefix: &str) -> Scope<'a> {
        Scope {
            router: self,
            prefix: prefix.to_string(),
        }
    }

    /// Resuelve un path a su handler y parámetros
    ///
    /// # Errores
    ///
    /// - `MalformedUrl` si el último segmento tiene más de un `?`
    /// - `NotFound` si el prefijo no existe o ninguna ruta coincide
    pub fn dispatch(&self, path: &str) -> Result<RouteMatch, RouteError> {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        // El path raíz cuenta como un único segmento vacío
        if segments.is_empty() {
            segments.push("");
        }

        // El query vive en el último segmento y se valida antes de todo
        let last = segments.len() - 1;
        if segments[last].matches('?').count() > 1 {
            return Err(RouteError::MalformedUrl(path.to_string()));
        }
        let (last_value, query) = split_query(segments[last]);
        segments[last] = last_value;
        let query_params = query.map(parse_query_string).unwrap_or_default();

        let prefix = format!("/{}", segments[0]);
        let routes = self
            .scopes
            .get(&prefix)
            .ok_or_else(|| RouteError::NotFound(path.to_string()))?;

        let rest = &segments[1..];
        for route in routes {
            if let Some(path_params) = route.bind(rest) {
                return Ok(RouteMatch {
                    handler: route.handler,
                    pattern: route.pattern.clone(),
                    path_params,
                    query_params,
                });
            }
        }

        Err(RouteError::NotFound(path.to_string()))
    }

    /// Cantidad total de rutas registradas
    pub fn len(&self) -> usize {
        self.scopes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registro encadenado bajo un prefijo fijo
pub struct Scope<'a> {
    router: &'a mut Router,
    prefix: String,
}

impl Scope<'_> {
    pub fn route(&mut self, pattern: &str, handler: Handler) -> &mut Self {
        self.router.register(&self.prefix, pattern, handler);
        self
    }
}

/// `"user"`, `"/user"` y `"/user/"` → `"/user"`; `""` y `"/"` → `"/"`
fn normalize_prefix(prefix: &str) -> String {
    format!("/{}", prefix.trim_matches('/'))
}
