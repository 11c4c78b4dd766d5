// [libs/core/fingerprint/src/lib.rs]

#![deny(missing_docs)]

//! # APARATO: FINGERPRINT STRATUM ROOT
//! CLASIFICACION: CORE INFRASTRUCTURE (ESTRATO L1)
//! RESPONSABILIDAD: DIGEST DIFUSO, BANDAS LSH Y DISTANCIA POR LOTES
//!
//! Tres operaciones puras, sin estado compartido ni E/S: computar un digest
//! a partir de bytes, extraer sus bandas y medir distancia entre digests.
//! Los estratos de dominio (`guardian-domain-*`) consumen esta crate como
//! unica fuente de verdad sobre la forma del digest.

/// Definiciones de errores semanticos para el triaje programatico de fallos.
pub mod errors;

/// Primitiva de hashing Pearson usada por el histograma del digest.
mod pearson;

/// Computo del digest difuso (forma TLSH) a partir de bytes crudos.
pub mod digest;

/// Extraccion de bandas LSH sobre el cuerpo del digest.
pub mod bands;

/// Distancia por pares y por lotes entre digests.
pub mod distance;

pub use crate::bands::extract_bands;
pub use crate::digest::{compute_digest, Digest, MIN_DIGEST_INPUT_LENGTH};
pub use crate::distance::{batch_distance, distance};
pub use crate::errors::FingerprintError;

/// Coleccion de tipos de alta frecuencia para inyeccion directa en los
/// estratos de dominio.
pub mod prelude {
    pub use crate::bands::extract_bands;
    pub use crate::digest::{compute_digest, Digest, MIN_DIGEST_INPUT_LENGTH};
    pub use crate::distance::{batch_distance, distance};
    pub use crate::errors::FingerprintError;
}
