// ============================================================================
// Module : api
// ============================================================================
// Client de l'endpoint JSON de cotations (Yahoo Finance)
// ============================================================================

pub mod yahoo;  // Client API Yahoo Finance

// Re-export des éléments principaux
pub use yahoo::{QuoteClient, DEFAULT_ENDPOINT, SYMBOL_PLACEHOLDER};
