// libs/infra/oracle/src/errors.rs
// =================================================================
// APARATO: ORACLE CLIENT ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS DE TRANSPORTE HACIA EL ORACULO
// =================================================================

use thiserror::Error;

/// Errores posibles al invocar el servicio oraculo remoto. No hay
/// reintentos dentro del cliente: el llamador decide el fallback.
#[derive(Error, Debug)]
pub enum OracleError {
    /// La peticion no completo dentro del timeout asignado a esa ruta.
    #[error("oracle call timed out")]
    Timeout,

    /// Fallo de transporte (DNS, conexion rechazada, TLS, etc).
    #[error("oracle transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// El oraculo respondio con un codigo no-2xx.
    #[error("oracle rejected the call: HTTP {0}")]
    NonSuccess(u16),

    /// El cuerpo de respuesta no pudo deserializarse al contrato esperado.
    #[error("oracle response malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
