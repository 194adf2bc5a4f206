//! # Archivos Estáticos
//! src/handlers/static_files.rs
//!
//! Resuelve un path de URL a un archivo dentro de la raíz estática (o del
//! directorio de uploads para `/uploads/<nombre>`), lo lee completo a memoria
//! y lo responde con el Content-Type según su extensión.
//!
//! ## Resolución
//!
//! ```text
//! /                 -> static/index.html
//! /css/site.css     -> static/css/site.css
//! /uploads/cv.pdf   -> static/uploads/cv.pdf, y si no existe uploads/cv.pdf
//! ```
//!
//! El router ya rechazó cualquier path con `..` literal. Aquí además se
//! decodifica `%XX`, se vuelve a revisar `..`, y el path resuelto se
//! canonicaliza y se exige que quede dentro de su raíz (esto también frena
//! symlinks que apuntan afuera).

use super::Site;
use crate::http::{mime, Request, Response, StatusCode};
use percent_encoding::percent_decode_str;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error, warn};

/// Prefijo de URL bajo el que también se sirven los uploads
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Archivo servido para `GET /`
pub const INDEX_FILE: &str = "index.html";

/// Errores al resolver un path de URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No existe ni en static ni en uploads
    NotFound,

    /// Path mal formado: `%XX` inválido, `..` decodificado, etc.
    BadPath(&'static str),

    /// El path resuelto queda fuera de la raíz permitida
    Forbidden,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "File not found"),
            ResolveError::BadPath(why) => write!(f, "Invalid path: {}", why),
            ResolveError::Forbidden => write!(f, "Path escapes its root"),
        }
    }
}

impl std::error::Error for ResolveError {}

impl ResolveError {
    /// Respuesta HTTP correspondiente al error
    pub fn to_response(&self) -> Response {
        match self {
            ResolveError::NotFound => Response::error(StatusCode::NotFound, "File not found"),
            ResolveError::BadPath(_) | ResolveError::Forbidden => {
                Response::error(StatusCode::BadRequest, "Invalid path")
            }
        }
    }
}

/// Decodifica `%XX` y convierte el path de URL en un path relativo seguro
///
/// Se descartan `/` iniciales y componentes `.`; un componente `..` es error.
fn relative_path(raw_path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(raw_path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadPath("invalid percent-encoding"))?;

    if decoded.contains("..") {
        return Err(ResolveError::BadPath("parent directory reference"));
    }
    if decoded.contains('\0') {
        return Err(ResolveError::BadPath("nul byte"));
    }

    let mut relative = PathBuf::new();
    for component in Path::new(decoded.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => relative.push(segment),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir | Component::Prefix(_) => {
                return Err(ResolveError::BadPath("parent directory reference"))
            }
        }
    }

    Ok(relative)
}

/// Verifica que `path` (ya existente) quede dentro de `root`
fn ensure_within(path: PathBuf, root: &Path) -> Result<PathBuf, ResolveError> {
    let root_canonical = root.canonicalize().map_err(|e| {
        warn!(root = %root.display(), error = %e, "root directory not accessible");
        ResolveError::NotFound
    })?;
    let canonical = path.canonicalize().map_err(|_| ResolveError::NotFound)?;

    if canonical.starts_with(&root_canonical) {
        Ok(path)
    } else {
        warn!(
            path = %path.display(),
            resolved = %canonical.display(),
            "path traversal attempt blocked"
        );
        Err(ResolveError::Forbidden)
    }
}

/// Resuelve un path de URL (sin query string) a un archivo existente
///
/// Primero se busca bajo la raíz estática. Si no existe y el path empieza con
/// `/uploads/`, se busca el resto en el directorio de uploads.
pub fn resolve(site: &Site, raw_path: &str) -> Result<PathBuf, ResolveError> {
    let relative = relative_path(raw_path)?;

    let candidate = site.static_dir.join(&relative);
    if candidate.exists() {
        return ensure_within(candidate, &site.static_dir);
    }

    if raw_path.starts_with(UPLOADS_PREFIX) {
        let name = relative
            .strip_prefix("uploads")
            .map_err(|_| ResolveError::NotFound)?;
        let candidate = site.upload_dir.join(name);
        if candidate.exists() {
            return ensure_within(candidate, &site.upload_dir);
        }
    }

    Err(ResolveError::NotFound)
}

/// Lee un archivo completo y arma la respuesta 200
///
/// Un archivo que no se puede leer o que está vacío produce 500.
pub fn serve_file(path: &Path) -> Response {
    match fs::read(path) {
        Ok(content) if content.is_empty() => {
            error!(path = %path.display(), "refusing to serve empty file");
            Response::error(StatusCode::InternalServerError, "Error reading file")
        }
        Ok(content) => Response::new(StatusCode::Ok)
            .with_content_type(mime::for_path(path))
            .with_body_bytes(content),
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to read file");
            Response::error(StatusCode::InternalServerError, "Error reading file")
        }
    }
}

/// Handler para `GET /`
pub fn index_handler(site: &Site, _req: &Request, _body: &mut dyn Read) -> Response {
    serve_file(&site.static_dir.join(INDEX_FILE))
}

/// Handler para cualquier otro `GET`
pub fn static_handler(site: &Site, req: &Request, _body: &mut dyn Read) -> Response {
    match resolve(site, req.path()) {
        Ok(path) => serve_file(&path),
        Err(e) => {
            debug!(path = req.path(), error = %e, "static lookup failed");
            e.to_response()
        }
    }
}
