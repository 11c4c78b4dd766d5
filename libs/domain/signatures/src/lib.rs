// libs/domain/signatures/src/lib.rs
//! Body normalization and typed-signature extraction: the second and third
//! components of the message analysis pipeline. Consumes raw MIME bytes and
//! a whitelist lookup, and produces either a whitelist short-circuit or the
//! ordered list of typed signatures the matcher consumes next.

pub mod errors;
pub mod extractor;
pub mod normalizer;

pub use errors::SignatureError;
pub use extractor::{extract_signatures, ExtractionOutcome, SignatureConfig, WhitelistCheck};
pub use normalizer::normalize;
