//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Este módulo construye respuestas HTTP/1.1 y las serializa al socket.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 11\r\n
//! Connection: close\r\n
//! \r\n
//! <h1>hi</h1>
//! ```
//!
//! `Content-Length` siempre es el largo en bytes del body (no en caracteres),
//! así que sirve igual para imágenes y video. No hay keep-alive ni chunked:
//! toda respuesta lleva `Connection: close`.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use portfolio_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_content_type("text/html")
//!     .with_body("<h1>hi</h1>");
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Content-Type por defecto cuando nadie lo define
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Valor del header Content-Type
    content_type: String,

    /// Cuerpo de la respuesta (puede ser binario)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto el body es vacío y el Content-Type es `text/plain`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            body: Vec::new(),
        }
    }

    /// Define el Content-Type
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (imágenes, video, pdf, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Respuesta HTML con el status indicado
    pub fn html(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_content_type("text/html")
            .with_body(body)
    }

    /// Respuesta de error en texto plano
    ///
    /// # Ejemplo
    /// ```
    /// use portfolio_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound, "File not found");
    /// assert_eq!(response.body(), b"File not found");
    /// assert_eq!(response.content_type(), "text/plain");
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::new(status)
            .with_content_type("text/plain")
            .with_body(message)
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera, en este orden:
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - `Content-Type` y `Content-Length`
    /// - `Connection: close`
    /// - Línea vacía y el body crudo
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", self.status);
        head.push_str(&format!("Content-Type: {}\r\n", self.content_type));
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut result = Vec::with_capacity(head.len() + self.body.len());
        result.extend_from_slice(head.as_bytes());
        result.extend_from_slice(&self.body);
        result
    }

    /// Escribe la respuesta completa con una sola escritura
    ///
    /// No hay reintentos: si el cliente cerró, el error se propaga tal cual.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el Content-Type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
