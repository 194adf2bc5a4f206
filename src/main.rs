//! # Portfolio Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada: lee la configuración, inicializa el logging, abre el
//! socket y atiende conexiones hasta recibir SIGINT o SIGTERM.

use portfolio_server::config::Config;
use portfolio_server::logging;
use portfolio_server::server::{signal, Server};
use tracing::{error, info};

fn main() {
    // Crear configuración (CLI + env)
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(1);
    }

    logging::init(config.verbose);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        address = %config.address(),
        "starting portfolio server"
    );

    let mut server = Server::new(config);

    if let Err(e) = server.bind() {
        error!(error = %e, "failed to start server");
        std::process::exit(1);
    }

    // Antes de run(): los workers heredan la máscara de señales
    if let Err(e) = signal::install(server.shutdown_handle()) {
        error!(error = %e, "failed to install signal handler");
        std::process::exit(1);
    }

    if let Err(e) = server.run() {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
