//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo mapea (método, path) a handlers.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Orden de decisión:
//!
//! 1. `GET` con `..` en cualquier parte del path → 400, sin tocar el disco
//! 2. Ruta exacta registrada para (método, path) → su handler
//! 3. Cualquier otro `GET` → handler de fallback (archivos estáticos)
//! 4. Todo lo demás → 405
//!
//! El chequeo de `..` es una búsqueda de substring, no una normalización:
//! no detecta `%2e%2e`, rutas absolutas ni symlinks. Esos casos los cubre
//! `handlers::static_files` al resolver.

use crate::handlers::{static_files, uploads, Handler, Site};
use crate::http::{Method, Request, Response, StatusCode};
use std::io::Read;
use tracing::debug;

/// Router que mapea (método, path) a handlers
pub struct Router {
    /// Directorios y límites que se pasan a cada handler
    site: Site,

    /// Rutas exactas: (método, path, handler)
    routes: Vec<(Method, String, Handler)>,

    /// Handler para los `GET` sin ruta exacta
    fallback: Option<Handler>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new(site: Site) -> Self {
        Self {
            site,
            routes: Vec::new(),
            fallback: None,
        }
    }

    /// Router con las rutas del portafolio
    ///
    /// | Método | Path | Handler |
    /// |---|---|---|
    /// | GET | `/` | `index.html` |
    /// | GET | `/uploads` | listado |
    /// | POST | `/upload` | upload multipart |
    /// | GET | otro | archivo estático |
    pub fn portfolio(site: Site) -> Self {
        let mut router = Self::new(site);
        router.register(Method::GET, "/", static_files::index_handler);
        router.register(Method::GET, "/uploads", uploads::list_handler);
        router.register(Method::POST, "/upload", uploads::upload_handler);
        router.set_fallback(static_files::static_handler);
        router
    }

    /// Registra una ruta exacta
    ///
    /// # Ejemplo
    /// ```
    /// use portfolio_server::router::Router;
    /// use portfolio_server::handlers::Site;
    /// use portfolio_server::http::{Method, Request, Response, StatusCode};
    /// use std::io::Read;
    ///
    /// fn ping(_site: &Site, _req: &Request, _body: &mut dyn Read) -> Response {
    ///     Response::new(StatusCode::Ok).with_body("pong")
    /// }
    ///
    /// let mut router = Router::new(Site::new("static", "uploads"));
    /// router.register(Method::GET, "/ping", ping);
    ///
    /// let request = Request::parse(b"GET /ping HTTP/1.1\r\n\r\n").unwrap();
    /// let response = router.route(&request, &mut std::io::empty());
    /// assert_eq!(response.body(), b"pong");
    /// ```
    pub fn register(&mut self, method: Method, path: &str, handler: Handler) {
        self.routes.push((method, path.to_string(), handler));
    }

    /// Define el handler para `GET` sin ruta exacta
    pub fn set_fallback(&mut self, handler: Handler) {
        self.fallback = Some(handler);
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// `body` es el resto de la conexión; solo lo lee el handler que lo
    /// necesita (upload).
    pub fn route(&self, request: &Request, body: &mut dyn Read) -> Response {
        let method = request.method();
        let path = request.path();

        if *method == Method::GET && request.target().contains("..") {
            debug!(uri = request.target(), "rejected path with '..'");
            return Response::error(StatusCode::BadRequest, "Invalid path");
        }

        for (route_method, route_path, handler) in &self.routes {
            if route_method == method && route_path == path {
                return handler(&self.site, request, body);
            }
        }

        match (method, self.fallback) {
            (Method::GET, Some(fallback)) => fallback(&self.site, request, body),
            (Method::GET, None) => Response::error(StatusCode::NotFound, "File not found"),
            _ => Response::error(StatusCode::MethodNotAllowed, "Method Not Allowed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::TestSite;
    use std::io::{self, Cursor};

    fn ok_handler(_site: &Site, _req: &Request, _body: &mut dyn Read) -> Response {
        Response::new(StatusCode::Ok).with_body("ok")
    }

    fn route(router: &Router, raw: &[u8]) -> Response {
        let request = Request::parse(raw).unwrap();
        router.route(&request, &mut io::empty())
    }

    #[test]
    fn test_router_creation() {
        let router = Router::new(Site::new("static", "uploads"));
        assert_eq!(router.routes.len(), 0);
        assert!(router.fallback.is_none());
    }

    #[test]
    fn test_portfolio_routes() {
        let router = Router::portfolio(Site::new("static", "uploads"));
        assert_eq!(router.routes.len(), 3);
        assert!(router.fallback.is_some());
    }

    #[test]
    fn test_exact_route() {
        let mut router = Router::new(Site::new("static", "uploads"));
        router.register(Method::GET, "/test", ok_handler);

        assert_eq!(route(&router, b"GET /test HTTP/1.1\r\n\r\n").status(), StatusCode::Ok);
        assert_eq!(route(&router, b"GET /test?x=1 HTTP/1.1\r\n\r\n").status(), StatusCode::Ok);
    }

    #[test]
    fn test_method_must_match() {
        let mut router = Router::new(Site::new("static", "uploads"));
        router.register(Method::POST, "/upload", ok_handler);

        assert_eq!(route(&router, b"POST /upload HTTP/1.1\r\n\r\n").status(), StatusCode::Ok);
        assert_eq!(
            route(&router, b"GET /upload HTTP/1.1\r\n\r\n").status(),
            StatusCode::NotFound
        );
    }

    #[test]
    fn test_method_not_allowed() {
        let router = Router::portfolio(Site::new("static", "uploads"));

        for raw in [
            &b"PUT /upload HTTP/1.1\r\n\r\n"[..],
            b"DELETE /index.html HTTP/1.1\r\n\r\n",
            b"HEAD / HTTP/1.1\r\n\r\n",
            b"OPTIONS * HTTP/1.1\r\n\r\n",
            b"POST / HTTP/1.1\r\n\r\n",
            b"POST /uploads HTTP/1.1\r\n\r\n",
        ] {
            let response = route(&router, raw);
            assert_eq!(response.status(), StatusCode::MethodNotAllowed);
            assert_eq!(response.body(), b"Method Not Allowed");
        }
    }

    #[test]
    fn test_dot_dot_rejected_before_lookup() {
        let mut router = Router::new(Site::new("static", "uploads"));
        router.register(Method::GET, "/a/../b", ok_handler);

        for raw in [
            &b"GET /a/../b HTTP/1.1\r\n\r\n"[..],
            b"GET /../../etc/passwd HTTP/1.1\r\n\r\n",
            b"GET /file..txt HTTP/1.1\r\n\r\n",
            b"GET /x?p=.. HTTP/1.1\r\n\r\n",
        ] {
            let response = route(&router, raw);
            assert_eq!(response.status(), StatusCode::BadRequest);
            assert_eq!(response.body(), b"Invalid path");
        }
    }

    #[test]
    fn test_post_with_dot_dot_is_405() {
        let router = Router::portfolio(Site::new("static", "uploads"));
        let response = route(&router, b"POST /../upload HTTP/1.1\r\n\r\n");
        assert_eq!(response.status(), StatusCode::MethodNotAllowed);
    }

    #[test]
    fn test_portfolio_dispatch() {
        let t = TestSite::new("router");
        t.write_static("index.html", b"<h1>hi</h1>");
        t.write_static("about.html", b"about");
        t.write_upload("a.txt", b"a");
        let router = Router::portfolio(t.site.clone());

        assert_eq!(route(&router, b"GET / HTTP/1.1\r\n\r\n").body(), b"<h1>hi</h1>");
        assert_eq!(route(&router, b"GET /about.html HTTP/1.1\r\n\r\n").body(), b"about");
        assert_eq!(route(&router, b"GET /uploads/a.txt HTTP/1.1\r\n\r\n").body(), b"a");
        assert_eq!(
            route(&router, b"GET /missing HTTP/1.1\r\n\r\n").status(),
            StatusCode::NotFound
        );

        let listing = route(&router, b"GET /uploads HTTP/1.1\r\n\r\n");
        assert!(String::from_utf8_lossy(listing.body()).contains("/uploads/a.txt"));
    }

    #[test]
    fn test_upload_reads_body() {
        let t = TestSite::new("router-upload");
        let router = Router::portfolio(t.site.clone());

        let body = b"--b\r\nContent-Disposition: form-data; name=\"f\"; filename=\"x.txt\"\r\n\r\nX!\r\n--b--\r\n";
        let head = format!(
            "POST /upload HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=b\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        let request = Request::parse(head.as_bytes()).unwrap();
        let response = router.route(&request, &mut Cursor::new(body.to_vec()));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(std::fs::read(t.site.upload_dir.join("x.txt")).unwrap(), b"X!");
    }
}
