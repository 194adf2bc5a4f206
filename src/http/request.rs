//! # Requests HTTP
//! src/http/request.rs
//!
//! Representación de un request ya leído del socket. La lectura en sí
//! (línea por línea, con límites) vive en `http::reader`.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /css/site.css?v=2 HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! El request es transitorio: se crea al inicio de la conexión y se descarta
//! cuando la conexión se cierra.

use super::reader::{self, Limits, ReadError};
use std::collections::HashMap;
use std::io::Cursor;

/// Métodos HTTP
///
/// Solo GET y POST tienen rutas; cualquier otro se conserva tal cual para
/// que el router responda 405.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un archivo o el listado
    GET,

    /// POST - Subir un archivo
    POST,

    /// Cualquier otro método (PUT, DELETE, HEAD, ...)
    Other(String),
}

impl Method {
    /// Convierte el token de la request line en un método
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::Other(m) => m,
        }
    }
}

/// Headers del request
///
/// Las claves se guardan tal como llegaron. La búsqueda no distingue
/// mayúsculas, y si una clave se repite (aunque cambie el casing) gana la
/// última ocurrencia.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta un header, reemplazando cualquier clave equivalente
    pub fn insert(&mut self, name: &str, value: &str) {
        self.entries.retain(|k, _| !k.eq_ignore_ascii_case(name));
        self.entries.insert(name.to_string(), value.to_string());
    }

    /// Obtiene un header por nombre (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera sobre (clave, valor) con el casing original
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Target tal como llegó (ej: "/css/site.css?v=2")
    target: String,

    /// Path sin query string, todavía sin decodificar (ej: "/css/site.css")
    path: String,

    /// Query string, si existe (ej: "v=2")
    query: Option<String>,

    /// Versión HTTP tal como llegó; no se valida
    version: String,

    /// Headers HTTP
    headers: Headers,
}

impl Request {
    /// Construye un request a partir de las partes ya leídas
    pub fn new(method: Method, target: &str, version: &str, headers: Headers) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (target.to_string(), None),
        };

        Self {
            method,
            target: target.to_string(),
            path,
            query,
            version: version.to_string(),
            headers,
        }
    }

    /// Parsea la cabecera de un request desde bytes en memoria
    ///
    /// Usa los mismos límites por defecto que el servidor. Cualquier byte
    /// después de la línea vacía se ignora.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use portfolio_server::http::{Method, Request};
    ///
    /// let raw = b"GET /css/site.css?v=2 HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), "/css/site.css");
    /// assert_eq!(request.query(), Some("v=2"));
    /// assert_eq!(request.header("host"), Some("x"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ReadError> {
        let mut cursor = Cursor::new(buffer);
        reader::read_request(&mut cursor, &Limits::default())
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Path sin query string
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
