//! # Lectura de Requests desde el socket
//! src/http/reader.rs
//!
//! Lee un request línea por línea:
//!
//! 1. **Request Line**: `METHOD /path VERSION`, separado por espacios
//! 2. **Headers**: `Name: Value` hasta encontrar una línea vacía
//! 3. **Body**: solo si un handler lo pide, exactamente `Content-Length` bytes
//!
//! El fin de línea puede ser `\r\n` o un `\n` suelto. Las líneas de header
//! sin `:` se ignoran en silencio. El largo de línea y la cantidad de headers
//! están acotados por [`Limits`]; excederlos produce
//! [`ReadError::RequestTooLarge`].

use super::request::{Headers, Method, Request};
use std::io::{self, BufRead, Read};

/// Largo máximo por defecto de una línea (sin contar el fin de línea)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8192;

/// Cantidad máxima por defecto de líneas de header
pub const DEFAULT_MAX_HEADERS: usize = 100;

/// Límites de lectura de la cabecera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_line_length: usize,
    pub max_headers: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_headers: DEFAULT_MAX_HEADERS,
        }
    }
}

/// Errores que pueden ocurrir leyendo un request
#[derive(Debug)]
pub enum ReadError {
    /// La conexión se cerró antes de recibir la request line completa
    ConnectionClosed,

    /// La request line no tiene al menos método y path
    InvalidRequestLine(String),

    /// Se excedió un límite (línea demasiado larga o demasiados headers)
    RequestTooLarge(&'static str),

    /// Error de I/O del socket
    Io(io::Error),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::ConnectionClosed => write!(f, "Connection closed before request line"),
            ReadError::InvalidRequestLine(line) => write!(f, "Invalid request line: {:?}", line),
            ReadError::RequestTooLarge(what) => write!(f, "Request too large: {}", what),
            ReadError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        ReadError::Io(err)
    }
}

/// Lee una línea terminada en `\n` o `\r\n`
///
/// Retorna `Ok(None)` si la conexión se cerró antes de completar la línea.
/// El fin de línea no se incluye en el resultado.
pub fn read_line<R: BufRead>(reader: &mut R, max_len: usize) -> Result<Option<String>, ReadError> {
    let mut buf = Vec::new();
    // +2 para dejar pasar el "\r\n" de una línea de largo exactamente max_len
    let limit = max_len.saturating_add(2) as u64;
    let n = reader.by_ref().take(limit).read_until(b'\n', &mut buf)?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&b'\n') {
        if buf.len() as u64 >= limit {
            return Err(ReadError::RequestTooLarge("line too long"));
        }
        // EOF a mitad de línea
        return Ok(None);
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    if buf.len() > max_len {
        return Err(ReadError::RequestTooLarge("line too long"));
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Parsea la request line: `METHOD PATH [VERSION]`
///
/// Falta de versión se tolera (queda vacía); sin método o sin path es error.
pub fn parse_request_line(line: &str) -> Result<(Method, String, String), ReadError> {
    let mut parts = line.split_whitespace();

    let (method, target) = match (parts.next(), parts.next()) {
        (Some(method), Some(target)) => (method, target),
        _ => return Err(ReadError::InvalidRequestLine(line.to_string())),
    };
    let version = parts.next().unwrap_or("");

    Ok((Method::from_token(method), target.to_string(), version.to_string()))
}

/// Parsea una línea de header
///
/// Se divide en el primer `:`. Del valor se quitan espacios y tabs iniciales.
/// Retorna `None` si la línea no tiene `:`.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let (name, value) = line.split_once(':')?;
    Some((name, value.trim_start_matches([' ', '\t'])))
}

/// Lee headers hasta la línea vacía (o hasta que el cliente cierre)
pub fn read_headers<R: BufRead>(reader: &mut R, limits: &Limits) -> Result<Headers, ReadError> {
    let mut headers = Headers::new();
    let mut count = 0usize;

    while let Some(line) = read_line(reader, limits.max_line_length)? {
        if line.is_empty() {
            break;
        }

        count += 1;
        if count > limits.max_headers {
            return Err(ReadError::RequestTooLarge("too many headers"));
        }

        if let Some((name, value)) = parse_header_line(&line) {
            headers.insert(name, value);
        }
    }

    Ok(headers)
}

/// Lee la request line y los headers de una conexión
pub fn read_request<R: BufRead>(reader: &mut R, limits: &Limits) -> Result<Request, ReadError> {
    let line = read_line(reader, limits.max_line_length)?.ok_or(ReadError::ConnectionClosed)?;
    let (method, target, version) = parse_request_line(&line)?;
    let headers = read_headers(reader, limits)?;

    Ok(Request::new(method, &target, &version, headers))
}

/// Lee hasta `len` bytes del body
///
/// Si el cliente cierra antes o el socket falla, se retorna lo que se alcanzó
/// a leer; el parser de multipart se encargará de rechazarlo.
pub fn read_body<R: Read + ?Sized>(reader: &mut R, len: u64) -> Vec<u8> {
    let mut body = Vec::new();
    if let Err(e) = Read::take(reader, len).read_to_end(&mut body) {
        tracing::warn!(error = %e, received = body.len(), expected = len, "error reading request body");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn line(raw: &[u8], max: usize) -> Result<Option<String>, ReadError> {
        read_line(&mut Cursor::new(raw), max)
    }

    #[test]
    fn test_read_line_crlf_and_lf() {
        let mut cursor = Cursor::new(&b"first\r\nsecond\nthird\r\n"[..]);
        assert_eq!(read_line(&mut cursor, 100).unwrap().as_deref(), Some("first"));
        assert_eq!(read_line(&mut cursor, 100).unwrap().as_deref(), Some("second"));
        assert_eq!(read_line(&mut cursor, 100).unwrap().as_deref(), Some("third"));
        assert_eq!(read_line(&mut cursor, 100).unwrap(), None);
    }

    #[test]
    fn test_read_line_eof_mid_line() {
        assert_eq!(line(b"GET / HTT", 100).unwrap(), None);
        assert_eq!(line(b"", 100).unwrap(), None);
    }

    #[test]
    fn test_read_line_limit() {
        assert_eq!(line(b"abcd\r\n", 4).unwrap().as_deref(), Some("abcd"));
        assert!(matches!(line(b"abcde\r\n", 4), Err(ReadError::RequestTooLarge(_))));
        assert!(matches!(line(b"abcdefghij", 4), Err(ReadError::RequestTooLarge(_))));
    }

    #[test]
    fn test_parse_request_line() {
        let (method, target, version) = parse_request_line("GET /index.html HTTP/1.1").unwrap();
        assert_eq!(method, Method::GET);
        assert_eq!(target, "/index.html");
        assert_eq!(version, "HTTP/1.1");

        let (_, _, version) = parse_request_line("POST /upload").unwrap();
        assert_eq!(version, "");
    }

    #[test]
    fn test_invalid_request_line() {
        assert!(matches!(parse_request_line("GET"), Err(ReadError::InvalidRequestLine(_))));
        assert!(matches!(parse_request_line(""), Err(ReadError::InvalidRequestLine(_))));
    }

    #[test]
    fn test_parse_header_line() {
        assert_eq!(parse_header_line("Host: x"), Some(("Host", "x")));
        assert_eq!(parse_header_line("Host:\t  x y "), Some(("Host", "x y ")));
        assert_eq!(parse_header_line("X-Time: 10:30"), Some(("X-Time", "10:30")));
        assert_eq!(parse_header_line("garbage"), None);
    }

    #[test]
    fn test_read_request_skips_malformed_headers() {
        let raw = b"GET / HTTP/1.1\r\nHost: x\r\nnot a header\r\nAccept: */*\r\n\r\n";
        let request = read_request(&mut Cursor::new(&raw[..]), &Limits::default()).unwrap();

        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.header("Accept"), Some("*/*"));
    }

    #[test]
    fn test_read_request_bare_lf() {
        let raw = b"GET /a.txt HTTP/1.1\nHost: x\n\n";
        let request = read_request(&mut Cursor::new(&raw[..]), &Limits::default()).unwrap();
        assert_eq!(request.path(), "/a.txt");
        assert_eq!(request.header("Host"), Some("x"));
    }

    #[test]
    fn test_read_request_closed_early() {
        let result = read_request(&mut Cursor::new(&b""[..]), &Limits::default());
        assert!(matches!(result, Err(ReadError::ConnectionClosed)));
    }

    #[test]
    fn test_too_many_headers() {
        let limits = Limits { max_line_length: 100, max_headers: 2 };
        let raw = b"GET / HTTP/1.1\r\nA: 1\r\nB: 2\r\nC: 3\r\n\r\n";
        let result = read_request(&mut Cursor::new(&raw[..]), &limits);
        assert!(matches!(result, Err(ReadError::RequestTooLarge(_))));
    }

    #[test]
    fn test_read_body_leaves_rest_untouched() {
        let mut cursor = Cursor::new(&b"hello world"[..]);
        assert_eq!(read_body(&mut cursor, 5), b"hello");
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_read_body_short() {
        let mut cursor = Cursor::new(&b"abc"[..]);
        assert_eq!(read_body(&mut cursor, 10), b"abc");
    }

    #[test]
    fn test_body_after_headers() {
        let raw = b"POST /upload HTTP/1.1\r\nContent-Length: 4\r\n\r\nDATA";
        let mut cursor = Cursor::new(&raw[..]);
        let request = read_request(&mut cursor, &Limits::default()).unwrap();
        assert_eq!(request.header("Content-Length"), Some("4"));
        assert_eq!(read_body(&mut cursor, 4), b"DATA");
    }
}
