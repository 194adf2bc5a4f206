//! # Parser de multipart/form-data
//! src/multipart.rs
//!
//! Parser mínimo para un formulario con **un solo archivo**. No es un parser
//! completo de RFC 2388: se busca la primera parte, se exige que tenga
//! `filename="..."` y cualquier otro campo se ignora.
//!
//! ## Formato esperado
//!
//! ```text
//! --BOUNDARY\r\n
//! Content-Disposition: form-data; name="file"; filename="photo.png"\r\n
//! Content-Type: image/png\r\n
//! \r\n
//! <bytes del archivo>\r\n
//! --BOUNDARY--\r\n
//! ```

use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use std::sync::OnceLock;

/// Archivo extraído del body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Nombre tal como lo mandó el cliente (sin sanitizar)
    pub filename: String,

    /// Contenido crudo
    pub content: Vec<u8>,
}

/// Errores del parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartError {
    /// No aparece `--boundary` en el body
    BoundaryNotFound,

    /// La parte no tiene el separador `\r\n\r\n` de fin de headers
    HeadersUnterminated,

    /// Los headers de la parte no traen `filename="..."`
    MissingFilename,

    /// No hay boundary después del contenido
    ClosingBoundaryNotFound,

    /// El nombre quedó vacío o es `.`/`..` después de sanitizar
    InvalidFilename(String),
}

impl std::fmt::Display for MultipartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipartError::BoundaryNotFound => write!(f, "Boundary not found in body"),
            MultipartError::HeadersUnterminated => write!(f, "Part headers not terminated"),
            MultipartError::MissingFilename => write!(f, "Part has no filename"),
            MultipartError::ClosingBoundaryNotFound => write!(f, "Closing boundary not found"),
            MultipartError::InvalidFilename(name) => write!(f, "Invalid filename: {:?}", name),
        }
    }
}

impl std::error::Error for MultipartError {}

fn boundary_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"boundary=([^\s;]+)").expect("boundary regex is valid"))
}

fn filename_regex() -> &'static BytesRegex {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    RE.get_or_init(|| BytesRegex::new(r#"filename="([^"]+)""#).expect("filename regex is valid"))
}

/// Extrae el boundary del header Content-Type
///
/// El token termina en espacio o `;`. Si viene entre comillas se quitan.
///
/// # Ejemplo
/// ```
/// use portfolio_server::multipart::boundary_from_content_type;
///
/// let ct = "multipart/form-data; boundary=----WebKitFormBoundaryX3";
/// assert_eq!(boundary_from_content_type(ct).as_deref(), Some("----WebKitFormBoundaryX3"));
/// assert_eq!(boundary_from_content_type("text/plain"), None);
/// ```
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    let token = boundary_regex().captures(content_type)?.get(1)?.as_str();

    let token = token
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(token);

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Separador entre los headers de la parte y su contenido
fn blank_line_regex() -> &'static BytesRegex {
    static RE: OnceLock<BytesRegex> = OnceLock::new();
    RE.get_or_init(|| BytesRegex::new(r"\r\n\r\n").expect("blank line regex is valid"))
}

/// Busca `needle` en `haystack` a partir de `from`
///
/// Un patrón literal se resuelve con búsqueda de substring en tiempo lineal,
/// así que recorrer un body de varios MiB no es cuadrático.
fn find(haystack: &[u8], needle: &BytesRegex, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    needle.find_at(haystack, from).map(|m| m.start())
}

/// Extrae el único archivo de un body multipart
///
/// 1. Busca el primer `--boundary`
/// 2. Salta el boundary y su fin de línea (2 bytes)
/// 3. Busca `\r\n\r\n` que cierra los headers de la parte
/// 4. Extrae `filename="..."` de esos headers
/// 5. El contenido va hasta el siguiente boundary, menos el `\r\n` previo
pub fn parse_single_file(body: &[u8], boundary: &str) -> Result<FilePart, MultipartError> {
    let delimiter_len = boundary.len() + 2;
    let delimiter = BytesRegex::new(&regex::escape(&format!("--{}", boundary)))
        .map_err(|_| MultipartError::BoundaryNotFound)?;

    let start = find(body, &delimiter, 0).ok_or(MultipartError::BoundaryNotFound)?;
    let headers_start = start + delimiter_len + 2;

    let headers_end =
        find(body, blank_line_regex(), headers_start).ok_or(MultipartError::HeadersUnterminated)?;
    let part_headers = &body[headers_start..headers_end];

    let filename = filename_regex()
        .captures(part_headers)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .ok_or(MultipartError::MissingFilename)?;

    let content_start = headers_end + 4;
    let next = find(body, &delimiter, content_start).ok_or(MultipartError::ClosingBoundaryNotFound)?;
    let content_end = next.saturating_sub(2).max(content_start);

    Ok(FilePart {
        filename,
        content: body[content_start..content_end].to_vec(),
    })
}

/// Deja solo el nombre base: todo hasta el último `/` o `\` se descarta
///
/// Es la única defensa contra escribir fuera del directorio de uploads.
///
/// # Ejemplo
/// ```
/// use portfolio_server::multipart::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/evil.txt").unwrap(), "evil.txt");
/// assert_eq!(sanitize_filename(r"C:\Users\me\cv.pdf").unwrap(), "cv.pdf");
/// assert!(sanitize_filename("..").is_err());
/// ```
pub fn sanitize_filename(name: &str) -> Result<String, MultipartError> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("");

    match base {
        "" | "." | ".." => Err(MultipartError::InvalidFilename(name.to_string())),
        _ => Ok(base.to_string()),
    }
}
