//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Códigos de estado que puede devolver el servidor. Solo están los que
//! realmente se usan:
//!
//! - **2xx**: Éxito (200 OK)
//! - **4xx**: Error del cliente (400, 404, 405, 411, 413, 431)
//! - **5xx**: Error del servidor (500)

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 400 Bad Request - Path inválido, headers o multipart malformados
    BadRequest = 400,

    /// 404 Not Found - Archivo no encontrado
    NotFound = 404,

    /// 405 Method Not Allowed - Combinación método/path no soportada
    MethodNotAllowed = 405,

    /// 411 Length Required - POST sin Content-Length
    LengthRequired = 411,

    /// 413 Payload Too Large - Upload mayor al límite configurado
    PayloadTooLarge = 413,

    /// 431 Request Header Fields Too Large - Línea o cantidad de headers excedida
    RequestHeaderFieldsTooLarge = 431,

    /// 500 Internal Server Error - Error leyendo o escribiendo archivos
    InternalServerError = 500,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use portfolio_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use portfolio_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::LengthRequired.reason_phrase(), "Length Required");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::LengthRequired => "Length Required",
            StatusCode::PayloadTooLarge => "Payload Too Large",
            StatusCode::RequestHeaderFieldsTooLarge => "Request Header Fields Too Large",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
