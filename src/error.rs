// ============================================================================
// API ERROR - Error único normalizado para todas las llamadas al backend
// ============================================================================

use thiserror::Error;

/// Mensaje genérico cuando no hay detalle del servidor
pub const GENERIC_API_ERROR: &str = "API Error: Unable to complete request";

/// Error normalizado de la API.
///
/// Fallo de transporte y rechazo del servidor son variantes del mismo tipo;
/// la UI solo necesita `message()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// No hubo respuesta (red caída, CORS, backend apagado)
    #[error("API Error: Unable to complete request")]
    Unreachable,

    /// El servidor respondió con status de error
    #[error("Request failed with status code {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// HTTP 2xx pero con payload `{"error": ...}`
    #[error("Backend error: {0}")]
    Backend(String),

    /// Respuesta con forma inesperada
    #[error("Parse error: {0}")]
    Decode(String),

    /// Entrada rechazada antes de enviar nada
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Texto legible para mostrar en la UI
    pub fn message(&self) -> String {
        self.to_string()
    }
}
