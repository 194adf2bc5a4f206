//! # Uploads
//! src/handlers/uploads.rs
//!
//! - `POST /upload`: recibe un `multipart/form-data` con un solo archivo y lo
//!   guarda en el directorio de uploads (sobrescribe si ya existe).
//! - `GET /uploads`: listado HTML de lo que hay en el directorio.
//!
//! Las escrituras no se coordinan con lecturas concurrentes del mismo nombre:
//! otra conexión puede ver el archivo a medio escribir.

use super::Site;
use crate::http::{reader, Request, Response, StatusCode};
use crate::multipart;
use html_escape::{encode_single_quoted_attribute, encode_text};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Caracteres que se escapan al armar `href="/uploads/<nombre>"`
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

/// Página de confirmación: vuelve a `/` a los 2 segundos
const UPLOAD_SUCCESS_PAGE: &str = r#"
<html>
<head>
    <title>Upload Success</title>
    <meta http-equiv="refresh" content="2;url=/" />
    <style>
    body {background:#000;color:#0f0;font-family:monospace;text-align:center;padding:50px;}
    </style>
</head>
<body>
<h1>Uploaded Successfully!</h1>
<p>Redirecting back to portfolio...</p>
</body>
</html>"#;

/// Arma el HTML del listado a partir de los nombres
pub fn render_listing(names: &[String]) -> String {
    let mut body = String::from("<html><body><h1>Uploaded Files</h1><ul>");
    for name in names {
        let href = utf8_percent_encode(name, PATH_SEGMENT).to_string();
        body.push_str(&format!(
            "<li><a href='/uploads/{}'>{}</a></li>",
            encode_single_quoted_attribute(&href),
            encode_text(name)
        ));
    }
    body.push_str("</ul></body></html>");
    body
}

/// Nombres de todas las entradas del directorio, ordenados
pub fn list_entries(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Guarda el archivo en el directorio (creándolo si no existe)
pub fn save_upload(dir: &Path, name: &str, content: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

/// Handler para `GET /uploads`
pub fn list_handler(site: &Site, _req: &Request, _body: &mut dyn Read) -> Response {
    match list_entries(&site.upload_dir) {
        Ok(names) => Response::html(StatusCode::Ok, &render_listing(&names)),
        Err(e) => {
            error!(dir = %site.upload_dir.display(), error = %e, "failed to list uploads");
            Response::error(StatusCode::InternalServerError, "Error reading upload directory")
        }
    }
}

/// Handler para `POST /upload`
///
/// Orden de validación:
/// 1. `Content-Length` presente (411) y numérico (400)
/// 2. `Content-Length` dentro del límite (413)
/// 3. `Content-Type` presente (400) y con `boundary=` (400)
/// 4. Se leen exactamente `Content-Length` bytes y se parsea el multipart (400)
/// 5. Se guarda con el nombre sanitizado (500 si falla la escritura)
pub fn upload_handler(site: &Site, req: &Request, body: &mut dyn Read) -> Response {
    let content_length = match req.header("Content-Length") {
        Some(value) => value,
        None => return Response::error(StatusCode::LengthRequired, "Content-Length required"),
    };
    let content_length: u64 = match content_length.trim().parse() {
        Ok(n) => n,
        Err(_) => return Response::error(StatusCode::BadRequest, "Invalid Content-Length"),
    };
    if content_length > site.max_upload_bytes {
        debug!(content_length, max = site.max_upload_bytes, "upload rejected: too large");
        return Response::error(StatusCode::PayloadTooLarge, "Payload too large");
    }

    let content_type = match req.header("Content-Type") {
        Some(value) => value,
        None => return Response::error(StatusCode::BadRequest, "Content-Type required"),
    };
    let boundary = match multipart::boundary_from_content_type(content_type) {
        Some(b) => b,
        None => {
            return Response::error(StatusCode::BadRequest, "Boundary missing in Content-Type")
        }
    };

    let data = reader::read_body(body, content_length);
    if (data.len() as u64) < content_length {
        debug!(received = data.len(), expected = content_length, "upload body shorter than declared");
    }

    let part = match multipart::parse_single_file(&data, &boundary) {
        Ok(part) => part,
        Err(e) => {
            debug!(error = %e, "multipart parse failed");
            return Response::error(StatusCode::BadRequest, "Failed to parse form-data");
        }
    };

    let filename = match multipart::sanitize_filename(&part.filename) {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "upload rejected");
            return Response::error(StatusCode::BadRequest, "Failed to parse form-data");
        }
    };

    match save_upload(&site.upload_dir, &filename, &part.content) {
        Ok(path) => {
            info!(file = %path.display(), bytes = part.content.len(), "upload saved");
            Response::html(StatusCode::Ok, UPLOAD_SUCCESS_PAGE)
        }
        Err(e) => {
            error!(file = %filename, error = %e, "failed to save upload");
            Response::error(StatusCode::InternalServerError, "Failed to save file")
        }
    }
}
