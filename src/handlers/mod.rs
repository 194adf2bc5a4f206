//! # Handlers del sitio
//! src/handlers/mod.rs
//!
//! - `static_files`: `GET /` y `GET /<path>` (con fallback a uploads)
//! - `uploads`: `POST /upload` y `GET /uploads`
//!
//! Todos los handlers comparten la firma [`Handler`] y reciben el [`Site`]
//! con los directorios y límites.

pub mod static_files;
pub mod uploads;

use crate::config::Config;
use crate::http::{Request, Response};
use std::io::Read;
use std::path::PathBuf;

/// Tipo de función handler
///
/// Recibe el sitio, el request ya parseado y el resto de la conexión para
/// leer el body si lo necesita.
pub type Handler = fn(&Site, &Request, &mut dyn Read) -> Response;

/// Directorios y límites que usan los handlers
#[derive(Debug, Clone)]
pub struct Site {
    /// Raíz de archivos estáticos
    pub static_dir: PathBuf,

    /// Directorio de uploads
    pub upload_dir: PathBuf,

    /// Tamaño máximo aceptado para un body de upload
    pub max_upload_bytes: u64,
}

impl Site {
    pub fn new(static_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            upload_dir: upload_dir.into(),
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            static_dir: config.static_dir.clone(),
            upload_dir: config.upload_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Directorios temporales para los tests de handlers, router y servidor

    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU64, Ordering};

    static DIR_COUNTER: AtomicU64 = AtomicU64::new(1);

    /// Directorio temporal único que se borra al salir de scope
    pub struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        pub fn new(label: &str) -> Self {
            let counter = DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!(
                "portfolio-server-{}-{}-{}",
                label,
                std::process::id(),
                counter
            ));
            let _ = std::fs::remove_dir_all(&path);
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Escribe un archivo relativo al directorio, creando subdirectorios
        pub fn write(&self, relative: &str, content: &[u8]) -> PathBuf {
            let target = self.path.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(&target, content).unwrap();
            target
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    /// Sitio con `static/` y `uploads/` dentro de un directorio temporal
    pub struct TestSite {
        pub root: TempDir,
        pub site: super::Site,
    }

    impl TestSite {
        pub fn new(label: &str) -> Self {
            let root = TempDir::new(label);
            let static_dir = root.path().join("static");
            let upload_dir = root.path().join("uploads");
            std::fs::create_dir_all(&static_dir).unwrap();
            std::fs::create_dir_all(&upload_dir).unwrap();
            Self {
                site: super::Site::new(static_dir, upload_dir),
                root,
            }
        }

        pub fn write_static(&self, relative: &str, content: &[u8]) -> PathBuf {
            self.root.write(&format!("static/{}", relative), content)
        }

        pub fn write_upload(&self, name: &str, content: &[u8]) -> PathBuf {
            self.root.write(&format!("uploads/{}", name), content)
        }
    }
}
