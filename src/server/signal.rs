//! # Señales
//! src/server/signal.rs
//!
//! SIGINT (Ctrl+C) y SIGTERM piden un apagado ordenado. Las señales se
//! bloquean en el thread que llama a [`install`] y se consumen con `sigwait`
//! en un thread dedicado. Como los threads heredan la máscara, hay que
//! llamar a `install` antes de crear los workers.

use super::ShutdownHandle;
use std::io;

#[cfg(unix)]
pub fn install(handle: ShutdownHandle) -> io::Result<()> {
    spawn_waiter(handle).map(drop)
}

/// Bloquea SIGINT/SIGTERM y lanza el thread que las espera
#[cfg(unix)]
fn spawn_waiter(handle: ShutdownHandle) -> io::Result<std::thread::JoinHandle<()>> {
    use nix::sys::signal::{SigSet, Signal};
    use std::thread;
    use tracing::{info, warn};

    let mut set = SigSet::empty();
    set.add(Signal::SIGINT);
    set.add(Signal::SIGTERM);
    set.thread_block().map_err(io::Error::from)?;

    thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || match set.wait() {
            Ok(signal) => {
                info!(signal = ?signal, "shutdown signal received");
                handle.shutdown();
            }
            Err(e) => warn!(error = %e, "sigwait failed; signals disabled"),
        })
}

#[cfg(not(unix))]
pub fn install(_handle: ShutdownHandle) -> io::Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use nix::sys::pthread::pthread_kill;
    use nix::sys::signal::Signal;
    use std::os::unix::thread::JoinHandleExt;

    // La señal se dirige al thread que espera (que la tiene bloqueada), así
    // nunca llega al resto del proceso de tests.
    fn deliver(signal: Signal) -> ShutdownHandle {
        let handle = ShutdownHandle::new();
        let waiter = spawn_waiter(handle.clone()).unwrap();
        assert!(!handle.is_requested());

        pthread_kill(waiter.as_pthread_t(), signal).unwrap();
        waiter.join().unwrap();
        handle
    }

    #[test]
    fn test_sigterm_requests_shutdown() {
        assert!(deliver(Signal::SIGTERM).is_requested());
    }

    #[test]
    fn test_sigint_requests_shutdown() {
        assert!(deliver(Signal::SIGINT).is_requested());
    }
}
