//! # Ciclo de vida del servidor
//! src/server/shutdown.rs
//!
//! `accept()` es bloqueante, así que apagar no basta con levantar una
//! bandera: el handle además abre una conexión local contra el listener para
//! despertar al loop, que ve la bandera y sale.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::debug;

/// Tiempo máximo para la conexión de despertar
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Handle clonable para pedir el apagado del servidor desde otro thread
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    requested: Arc<AtomicBool>,
    listen_addr: Arc<OnceLock<SocketAddr>>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra la dirección del listener (una sola vez)
    pub(crate) fn set_listen_addr(&self, addr: SocketAddr) {
        let _ = self.listen_addr.set(addr);
    }

    /// ¿Ya se pidió el apagado?
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Pide el apagado y despierta al loop de accept
    pub fn shutdown(&self) {
        if self.requested.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(addr) = self.listen_addr.get() {
            if let Err(e) = wake(*addr) {
                debug!(error = %e, "wake-up connection failed");
            }
        }
    }
}

/// Conecta al listener; si escucha en 0.0.0.0/:: se usa loopback
fn wake(addr: SocketAddr) -> io::Result<()> {
    let ip = match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    TcpStream::connect_timeout(&SocketAddr::new(ip, addr.port()), WAKE_TIMEOUT).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn test_shutdown_sets_flag() {
        let handle = ShutdownHandle::new();
        assert!(!handle.is_requested());

        handle.shutdown();
        assert!(handle.is_requested());
        // idempotente
        handle.shutdown();
        assert!(handle.is_requested());
    }

    #[test]
    fn test_clones_share_state() {
        let handle = ShutdownHandle::new();
        let other = handle.clone();
        other.shutdown();
        assert!(handle.is_requested());
    }

    #[test]
    fn test_shutdown_wakes_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let handle = ShutdownHandle::new();
        handle.set_listen_addr(listener.local_addr().unwrap());

        handle.shutdown();
        // La conexión de despertar quedó en la cola del listener
        assert!(listener.accept().is_ok());
    }

    #[test]
    fn test_wake_unspecified_uses_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        wake(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)).unwrap();
        assert!(listener.accept().is_ok());
    }
}
