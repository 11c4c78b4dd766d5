// libs/core/fingerprint/src/errors.rs
// =================================================================
// APARATO: FINGERPRINT ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS EN EL MOTOR DE DIGEST DIFUSO
// =================================================================

use thiserror::Error;

/// Errores posibles al computar o comparar un digest difuso.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FingerprintError {
    /// El contenido de entrada no alcanza la longitud minima exigida por el
    /// algoritmo (ver [`crate::MIN_DIGEST_INPUT_LENGTH`]).
    #[error("input too short for digest computation: {0} bytes, minimum is {1}")]
    InputTooShort(usize, usize),

    /// Fallo interno irrecuperable durante el computo del histograma o la
    /// cuantizacion por cuartiles.
    #[error("internal fault computing digest: {0}")]
    TlshInternal(String),
}
