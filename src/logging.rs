//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing` con un subscriber `fmt`. Todas las líneas pasan por
//! un único `Mutex<Stderr>`, así los threads de conexión no intercalan su
//! salida. Ese lock no protege ningún otro estado.
//!
//! El nivel sale de `-v` (info, debug, trace) y `RUST_LOG` lo sobrescribe:
//!
//! ```bash
//! RUST_LOG=portfolio_server=debug ./portfolio_server
//! ```

use std::io;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Nivel por defecto según la cantidad de `-v`
pub fn default_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Instala el subscriber global
///
/// Llamarla más de una vez no falla: solo la primera instalación vale.
pub fn init(verbosity: u8) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(
            default_level(verbosity)
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        )
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true)
        .with_writer(Mutex::new(io::stderr()))
        .try_init();
}
