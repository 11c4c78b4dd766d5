// [apps/sidecar/src/services/mod.rs]
/*!
 * =================================================================
 * APARATO: INDICE DE SERVICIOS DE FONDO
 * CLASIFICACION: APPLICATION SERVICES (ESTRATO L4)
 * RESPONSABILIDAD: EXPOSICION NOMINAL DE LOS DAEMONS PERIODICOS
 *
 * Topologia de modulos:
 * - sync_worker:  sincronizacion periodica de bandas con el oraculo
 * - stats_worker: vaciado periodico de contadores hacia el oraculo
 * =================================================================
 */

pub mod stats_worker;
pub mod sync_worker;

pub use stats_worker::spawn_stats_worker;
pub use sync_worker::spawn_sync_worker;
