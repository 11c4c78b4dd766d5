// libs/domain/matcher/src/errors.rs
// =================================================================
// APARATO: MATCHER ERRORS
// RESPONSABILIDAD: CATALOGO DE FALLOS DEL PROCEDIMIENTO DE DECISION
// =================================================================

use thiserror::Error;

/// Errores posibles al correr el procedimiento de decision. En la
/// practica casi todos se degradan a "allow, proximity retenida" en
/// lugar de propagarse, por eso este tipo rara vez escapa al llamador.
#[derive(Error, Debug)]
pub enum MatchError {
    /// El almacen de indices no respondio.
    #[error("index store unavailable: {0}")]
    Store(#[from] guardian_infra_store::StoreError),
}
