// libs/domain/signatures/src/errors.rs
// =================================================================
// APARATO: SIGNATURE ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS EN NORMALIZACION Y EXTRACCION
// =================================================================

use thiserror::Error;

/// Errores posibles al extraer firmas de un mensaje crudo.
#[derive(Error, Debug)]
pub enum SignatureError {
    /// El envoltorio MIME no pudo ser interpretado.
    #[error("invalid MIME envelope")]
    InvalidMime,
}
