// [libs/infra/store/src/errors.rs]
// =================================================================
// APARATO: STORE ERROR CATALOG
// RESPONSABILIDAD: CATALOGACION SEMANTICA DE FALLOS DE PERSISTENCIA
// =================================================================

use thiserror::Error;

/// Errores posibles al hablar con el servidor compatible con Redis.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Fallo de enlace fisico o de red con el servidor.
    #[error("store connection unavailable: {0}")]
    ConnectionError(String),

    /// Error devuelto por el comando ejecutado contra el servidor.
    #[error("store command rejected: {0}")]
    Command(#[from] redis::RedisError),

    /// Fallo al (de)serializar un valor JSON almacenado.
    #[error("store payload malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}
