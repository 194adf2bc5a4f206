//! # Portfolio Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo para un sitio de portafolio: sirve archivos
//! estáticos, recibe uploads `multipart/form-data` de un solo archivo y
//! lista lo subido. Cada request usa su propia conexión.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Lectura de requests, responses, status codes y tipos MIME
//! - `multipart`: Extracción del archivo de un body `multipart/form-data`
//! - `handlers`: Archivos estáticos, upload y listado
//! - `router`: Enrutamiento de peticiones a handlers
//! - `server`: Listener TCP, un thread por conexión y apagado ordenado
//! - `config`: Argumentos CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use portfolio_server::config::Config;
//! use portfolio_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod multipart;
pub mod router;
pub mod server;
