//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto
//! 2. Acepta conexiones entrantes, un thread por conexión
//! 3. Lee el request y lo pasa al router
//! 4. Escribe la response y cierra la conexión
//!
//! El apagado ordenado vive en `shutdown` (handle clonable) y `signal`
//! (SIGINT/SIGTERM).

pub mod shutdown;
pub mod signal;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use shutdown::ShutdownHandle;
pub use tcp::Server;
