//! # Headers tipados
//! src/http/headers.rs
//!
//! Los valores de los headers no son strings sueltos: cada nombre conocido
//! tiene un tipo declarado en una tabla estática y el valor se convierte al
//! parsear el mensaje.
//!
//! ```text
//! content-length: 42        → HeaderValue::Int(42)
//! content-type: text/plain  → HeaderValue::Str("text/plain")
//! x-desconocido: algo       → HeaderValue::Str("algo")   (default)
//! ```

use super::error::HttpError;
use std::collections::BTreeMap;
use std::fmt;

/// Tipo declarado del valor de un header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    Str,
    Int,
    Bool,
}

/// Tabla nombre (en minúsculas) → tipo.
///
/// Cualquier nombre que no aparezca aquí se trata como string.
const HEADER_KINDS: &[(&str, HeaderKind)] = &[
    ("content-length", HeaderKind::Int),
    ("connection", HeaderKind::Str),
    ("content-type", HeaderKind::Str),
    ("accept", HeaderKind::Str),
    ("host", HeaderKind::Str),
    ("user-agent", HeaderKind::Str),
    ("authorization", HeaderKind::Str),
    ("accept-encoding", HeaderKind::Str),
    ("cache-control", HeaderKind::Str),
    ("upgrade", HeaderKind::Str),
    ("origin", HeaderKind::Str),
    ("access-control-request-method", HeaderKind::Str),
    ("access-control-request-headers", HeaderKind::Str),
    ("access-control-allow-origin", HeaderKind::Str),
    ("access-control-allow-methods", HeaderKind::Str),
    ("access-control-allow-headers", HeaderKind::Str),
    ("access-control-allow-credentials", HeaderKind::Str),
    ("access-control-max-age", HeaderKind::Int),
];

/// Headers que solo tienen sentido en un salto de transporte y nunca se
/// reenvían en un mensaje saliente.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Busca el tipo declarado de un header (el nombre ya debe venir en minúsculas)
pub fn kind_of(name: &str) -> HeaderKind {
    HEADER_KINDS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, kind)| *kind)
        .unwrap_or(HeaderKind::Str)
}

/// `true` si el header es hop-by-hop (comparación sin distinguir mayúsculas)
pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| h.eq_ignore_ascii_case(name))
}

/// Valor de un header ya convertido a su tipo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl HeaderValue {
    /// Convierte el texto crudo de un header al tipo indicado.
    ///
    /// # Errores
    ///
    /// `InvalidHeaderValue` si el texto no es un entero (para `Int`) o no
    /// pertenece al vocabulario booleano (para `Bool`).
    pub fn coerce(name: &str, raw: &str, kind: HeaderKind) -> Result<Self, HttpError> {
        let invalid = || HttpError::InvalidHeaderValue {
            name: name.to_string(),
            value: raw.to_string(),
        };

        match kind {
            HeaderKind::Str => Ok(HeaderValue::Str(raw.to_string())),
            HeaderKind::Int => raw.trim().parse::<i64>().map(HeaderValue::Int).map_err(|_| invalid()),
            HeaderKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(HeaderValue::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(HeaderValue::Bool(false)),
                _ => Err(invalid()),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HeaderValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            HeaderValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HeaderValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Str(s) => f.write_str(s),
            HeaderValue::Int(n) => write!(f, "{}", n),
            HeaderValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for HeaderValue {
    fn from(s: &str) -> Self {
        HeaderValue::Str(s.to_string())
    }
}

impl From<String> for HeaderValue {
    fn from(s: String) -> Self {
        HeaderValue::Str(s)
    }
}

impl From<i64> for HeaderValue {
    fn from(n: i64) -> Self {
        HeaderValue::Int(n)
    }
}

impl From<usize> for HeaderValue {
    fn from(n: usize) -> Self {
        HeaderValue::Int(n as i64)
    }
}

impl From<bool> for HeaderValue {
    fn from(b: bool) -> Self {
        HeaderValue::Bool(b)
    }
}

/// Mapa de headers con claves siempre en minúsculas.
///
/// Usamos `BTreeMap` para que la serialización sea determinista.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    map: BTreeMap<String, HeaderValue>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta (o reemplaza) un header; el nombre se pasa a minúsculas
    pub fn insert(&mut self, name: &str, value: impl Into<HeaderValue>) {
        self.map.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.map.get(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        self.map.remove(&name.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(kind_of("content-length"), HeaderKind::Int);
        assert_eq!(kind_of("access-control-max-age"), HeaderKind::Int);
        assert_eq!(kind_of("content-type"), HeaderKind::Str);
        assert_eq!(kind_of("x-custom"), HeaderKind::Str);
    }

    #[test]
    fn test_coerce_int() {
        let v = HeaderValue::coerce("content-length", "42", HeaderKind::Int).unwrap();
        assert_eq!(v, HeaderValue::Int(42));

        let err = HeaderValue::coerce("content-length", "abc", HeaderKind::Int);
        assert!(matches!(err, Err(HttpError::InvalidHeaderValue { .. })));
    }

    #[test]
    fn test_coerce_bool_vocabulary() {
        for raw in ["true", "1", "yes", "on", "TRUE", "On"] {
            assert_eq!(
                HeaderValue::coerce("x", raw, HeaderKind::Bool).unwrap(),
                HeaderValue::Bool(true),
                "{}",
                raw
            );
        }
        for raw in ["false", "0", "no", "off"] {
            assert_eq!(
                HeaderValue::coerce("x", raw, HeaderKind::Bool).unwrap(),
                HeaderValue::Bool(false)
            );
        }
        assert!(HeaderValue::coerce("x", "maybe", HeaderKind::Bool).is_err());
    }

    #[test]
    fn test_coerce_string_passthrough() {
        let v = HeaderValue::coerce("host", "localhost:4000", HeaderKind::Str).unwrap();
        assert_eq!(v.as_str(), Some("localhost:4000"));
    }

    #[test]
    fn test_hop_by_hop() {
        assert!(is_hop_by_hop("Connection"));
        assert!(is_hop_by_hop("transfer-encoding"));
        assert!(is_hop_by_hop("TE"));
        assert!(!is_hop_by_hop("content-type"));
    }

    #[test]
    fn test_headers_lowercase_keys() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("CONTENT-LENGTH", 5i64);

        assert!(headers.contains("content-type"));
        assert_eq!(headers.get("Content-Length").and_then(|v| v.as_int()), Some(5));
        let keys: Vec<&str> = headers.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["content-length", "content-type"]);
    }

    #[test]
    fn test_display_values() {
        assert_eq!(HeaderValue::Int(7).to_string(), "7");
        assert_eq!(HeaderValue::Bool(false).to_string(), "false");
        assert_eq!(HeaderValue::from("abc").to_string(), "abc");
    }
}
