//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor con soporte para argumentos CLI y variables
//! de entorno. Los valores por defecto son los del sitio: puerto 8080 en
//! todas las interfaces, backlog 10, `static/` y `uploads/`.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./portfolio_server --port 8080 \
//!   --static-dir ./static \
//!   --upload-dir ./uploads \
//!   -v
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=3000 UPLOAD_DIR=/srv/uploads ./portfolio_server
//! ```

use crate::http::reader::{DEFAULT_MAX_HEADERS, DEFAULT_MAX_LINE_LENGTH};
use crate::http::Limits;
use clap::Parser;
use std::path::PathBuf;

/// Tamaño máximo por defecto de un upload (64 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 64 * 1024 * 1024;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "portfolio_server")]
#[command(about = "Servidor HTTP minimo: archivos estaticos, uploads y listado")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (0.0.0.0 = todas las interfaces)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Largo de la cola de conexiones pendientes (listen backlog)
    #[arg(long, default_value = "10", env = "HTTP_BACKLOG")]
    pub backlog: i32,

    // === Directorios ===
    /// Directorio de archivos estáticos
    #[arg(long = "static-dir", default_value = "static", env = "STATIC_DIR")]
    pub static_dir: PathBuf,

    /// Directorio donde se guardan los uploads
    #[arg(long = "upload-dir", default_value = "uploads", env = "UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    // === Límites ===
    /// Largo máximo de una línea del request (request line o header)
    #[arg(long = "max-line-length", default_value_t = DEFAULT_MAX_LINE_LENGTH, env = "MAX_LINE_LENGTH")]
    pub max_line_length: usize,

    /// Cantidad máxima de headers por request
    #[arg(long = "max-headers", default_value_t = DEFAULT_MAX_HEADERS, env = "MAX_HEADERS")]
    pub max_headers: usize,

    /// Tamaño máximo del body de un upload en bytes
    #[arg(long = "max-upload-bytes", default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: u64,

    // === Logging ===
    /// Verbosidad del log (-v debug, -vv trace). RUST_LOG tiene prioridad.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use portfolio_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Límites de lectura para el reader de requests
    pub fn limits(&self) -> Limits {
        Limits {
            max_line_length: self.max_line_length,
            max_headers: self.max_headers,
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.backlog <= 0 {
            return Err("Backlog must be >= 1".to_string());
        }
        if self.max_line_length == 0 {
            return Err("Max line length must be >= 1".to_string());
        }
        if self.max_headers == 0 {
            return Err("Max headers must be >= 1".to_string());
        }
        if self.max_upload_bytes == 0 {
            return Err("Max upload bytes must be >= 1".to_string());
        }
        if self.static_dir == self.upload_dir {
            return Err("Static dir and upload dir must be different".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            backlog: 10,
            static_dir: PathBuf::from("static"),
            upload_dir: PathBuf::from("uploads"),
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_headers: DEFAULT_MAX_HEADERS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            verbose: 0,
        }
    }
}
