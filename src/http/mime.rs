//! # Tabla MIME
//! src/http/mime.rs
//!
//! Mapea la extensión de un archivo (con el punto incluido) a su
//! Content-Type. La comparación es exacta y sensible a mayúsculas:
//! `foto.PNG` no es `image/png`.

use std::path::Path;

/// Content-Type para extensiones desconocidas o ausentes
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Tabla estática extensión → Content-Type
const MIME_TYPES: &[(&str, &str)] = &[
    (".html", "text/html"),
    (".htm", "text/html"),
    (".css", "text/css"),
    (".js", "application/javascript"),
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".gif", "image/gif"),
    (".svg", "image/svg+xml"),
    (".mp4", "video/mp4"),
    (".webm", "video/webm"),
    (".ogg", "audio/ogg"),
    (".json", "application/json"),
    (".txt", "text/plain"),
    (".pdf", "application/pdf"),
];

/// Busca el Content-Type para una extensión (ej: ".png")
pub fn for_extension(ext: &str) -> &'static str {
    MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

/// Obtiene el Content-Type de un path según la extensión del nombre del archivo
///
/// La extensión es todo lo que sigue al último `.` del nombre. Los puntos en
/// nombres de directorios no cuentan.
///
/// # Ejemplo
/// ```
/// use portfolio_server::http::mime;
/// use std::path::Path;
///
/// assert_eq!(mime::for_path(Path::new("static/index.html")), "text/html");
/// assert_eq!(mime::for_path(Path::new("uploads/README")), "application/octet-stream");
/// ```
pub fn for_path(path: &Path) -> &'static str {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return DEFAULT_MIME,
    };

    match name.rfind('.') {
        Some(pos) => for_extension(&name[pos..]),
        None => DEFAULT_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(for_extension(".html"), "text/html");
        assert_eq!(for_extension(".css"), "text/css");
        assert_eq!(for_extension(".js"), "application/javascript");
        assert_eq!(for_extension(".jpeg"), "image/jpeg");
        assert_eq!(for_extension(".mp4"), "video/mp4");
        assert_eq!(for_extension(".ogg"), "audio/ogg");
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(for_extension(".PNG"), DEFAULT_MIME);
        assert_eq!(for_path(Path::new("foto.PNG")), DEFAULT_MIME);
    }

    #[test]
    fn test_unknown_or_missing_extension() {
        assert_eq!(for_extension(".xyz"), DEFAULT_MIME);
        assert_eq!(for_path(Path::new("static/Makefile")), DEFAULT_MIME);
        assert_eq!(for_path(Path::new("static/v1.2/Makefile")), DEFAULT_MIME);
    }

    #[test]
    fn test_last_dot_wins() {
        assert_eq!(for_path(Path::new("backup.tar.pdf")), "application/pdf");
        assert_eq!(for_path(Path::new("uploads/photo.png")), "image/png");
    }
}
