//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Subconjunto de HTTP/1.1 implementado desde cero:
//!
//! - Lectura de requests línea por línea, con límites
//! - Construcción y escritura de responses
//! - Códigos de estado
//! - Tabla MIME por extensión
//!
//! No hay conexiones persistentes: cada respuesta lleva `Connection: close`
//! y el servidor cierra el socket al terminar.

pub mod mime; // Extensión → Content-Type
pub mod reader; // Lectura de request line, headers y body
pub mod request; // Request, Method y Headers
pub mod response; // Construcción de HTTP responses
pub mod status; // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
pub use reader::{Limits, ReadError};
pub use request::{Headers, Method, Request};
pub use response::Response;
pub use status::StatusCode;
