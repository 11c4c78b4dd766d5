// [apps/sidecar/src/handlers/mod.rs]
/*!
 * =================================================================
 * APARATO: INDICE DE HANDLERS HTTP
 * CLASIFICACION: API ADAPTERS (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICION NOMINAL DE LOS PUNTOS DE ENTRADA
 *
 * Topologia de modulos:
 * - status:    GET /status
 * - analyze:   POST /analyze
 * - report:    POST /report
 * - whitelist: GET/POST/DELETE /whitelist
 * - metrics:   GET /metrics
 * =================================================================
 */

pub mod analyze;
pub mod metrics;
pub mod report;
pub mod status;
pub mod whitelist;
