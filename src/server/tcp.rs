//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP: un thread por conexión. El loop de
//! accept es de un solo thread y nunca espera a que termine una conexión.
//!
//! Cada worker es dueño exclusivo de su `TcpStream` desde el accept hasta el
//! cierre; el stream se libera al salir del closure, incluso si el handler
//! entra en pánico. Mientras se lee el request no hay timeouts: un cliente
//! lento ocupa su thread indefinidamente.

use super::ShutdownHandle;
use crate::config::Config;
use crate::handlers::Site;
use crate::http::{reader, Limits, ReadError, Response, StatusCode};
use crate::router::Router;
use socket2::{Domain, Protocol, Socket, Type};
use std::fs;
use std::io::{self, BufReader, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Cuánto se espera a que el cliente cierre después de responder
const LINGER_TIMEOUT: Duration = Duration::from_millis(250);

/// Cuántos bytes sin leer se descartan como máximo al cerrar
const LINGER_MAX_BYTES: u64 = 64 * 1024;

/// Crea el listener con `SO_REUSEADDR` y el backlog indicado
pub fn create_listener(addr: SocketAddr, backlog: i32) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    Ok(socket.into())
}

/// Servidor HTTP concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    listener: Option<TcpListener>,
    shutdown: ShutdownHandle,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let router = Router::portfolio(Site::from_config(&config));

        Self {
            config,
            router: Arc::new(router),
            listener: None,
            shutdown: ShutdownHandle::new(),
        }
    }

    /// Handle para apagar el servidor desde otro thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Dirección efectiva del listener (útil con puerto 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Crea el directorio de uploads y abre el socket
    ///
    /// Cualquier error aquí es fatal para el proceso.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let address = self.config.address();
        let addr = address.to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("address {} did not resolve", address),
            )
        })?;

        fs::create_dir_all(&self.config.upload_dir)?;

        let listener = create_listener(addr, self.config.backlog)?;
        let local_addr = listener.local_addr()?;
        self.shutdown.set_listen_addr(local_addr);
        self.listener = Some(listener);

        info!(
            address = %local_addr,
            backlog = self.config.backlog,
            static_dir = %self.config.static_dir.display(),
            upload_dir = %self.config.upload_dir.display(),
            "server listening"
        );
        Ok(local_addr)
    }

    /// Loop de accept hasta que se pida el apagado
    ///
    /// Si todavía no se llamó a [`Server::bind`], se llama aquí.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = match self.listener.as_ref() {
            Some(listener) => listener,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "listener not bound")),
        };

        let limits = self.config.limits();
        let next_id = AtomicU64::new(1);
        let mut workers: Vec<JoinHandle<()>> = Vec::new();

        for stream in listener.incoming() {
            if self.shutdown.is_requested() {
                break;
            }

            match stream {
                Ok(stream) => {
                    workers.retain(|w| !w.is_finished());

                    let id = next_id.fetch_add(1, Ordering::Relaxed);
                    let router = Arc::clone(&self.router);
                    let spawned = thread::Builder::new()
                        .name(format!("conn-{}", id))
                        .spawn(move || Self::supervise(stream, &router, limits));

                    match spawned {
                        Ok(worker) => workers.push(worker),
                        Err(e) => error!(error = %e, "failed to spawn connection thread"),
                    }
                }
                Err(e) => {
                    warn!(error = %e, "accept failed");
                }
            }
        }

        workers.retain(|w| !w.is_finished());
        info!(in_flight = workers.len(), "server stopped");
        self.listener = None;
        Ok(())
    }

    /// Corre el handler de una conexión y registra errores o pánicos
    fn supervise(stream: TcpStream, router: &Router, limits: Limits) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(move || {
            Self::handle_connection(stream, router, limits)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "connection aborted"),
            Err(_) => error!("connection handler panicked"),
        }
    }

    /// Cierre en dos pasos: FIN primero y luego se descarta lo que el cliente
    /// no alcanzó a enviar (p. ej. un body rechazado con 413). Si el socket se
    /// cerrara con datos sin leer, el kernel mandaría RST y el cliente podría
    /// perder la respuesta.
    fn linger_close<R: Read>(reader: &mut R, stream: &TcpStream) {
        if stream.shutdown(Shutdown::Write).is_err() {
            return;
        }
        let _ = stream.set_read_timeout(Some(LINGER_TIMEOUT));
        let _ = io::copy(&mut Read::take(reader, LINGER_MAX_BYTES), &mut io::sink());
    }

    /// Atiende un request completo y cierra la conexión
    pub fn handle_connection(stream: TcpStream, router: &Router, limits: Limits) -> io::Result<()> {
        let start = Instant::now();
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let mut reader = BufReader::new(&stream);

        let (response, method, target) = match reader::read_request(&mut reader, &limits) {
            Ok(request) => {
                let response = router.route(&request, &mut reader);
                (response, request.method().as_str().to_string(), request.target().to_string())
            }
            Err(ReadError::ConnectionClosed) => {
                debug!(peer = %peer, "connection closed before request line");
                return Ok(());
            }
            Err(ReadError::Io(e)) => return Err(e),
            Err(e @ ReadError::RequestTooLarge(_)) => {
                warn!(peer = %peer, error = %e, "request rejected");
                let response = Response::error(StatusCode::RequestHeaderFieldsTooLarge, "Request too large");
                (response, "-".to_string(), "-".to_string())
            }
            Err(e @ ReadError::InvalidRequestLine(_)) => {
                debug!(peer = %peer, error = %e, "request rejected");
                let response = Response::error(StatusCode::BadRequest, "Invalid request line");
                (response, "-".to_string(), "-".to_string())
            }
        };

        response.write_to(&mut &stream)?;
        Self::linger_close(&mut reader, &stream);

        info!(
            peer = %peer,
            method = %method,
            uri = %target,
            status = response.status().as_u16(),
            bytes = response.body().len(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "request served"
        );

        Ok(())
    }
}
