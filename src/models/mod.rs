// ============================================================================
// Module : models
// ============================================================================
// Structures de données : symboles, cotations et état par symbole
// ============================================================================

pub mod ticker; // Symbole validé + parsing de la liste -s
pub mod quote;  // Prix courant / précédent et direction
pub mod price;  // Normalisation du champ prix

// Re-export des structures principales pour simplifier les imports
pub use ticker::{parse_symbol_list, Ticker};
pub use quote::{Direction, Quote, QuoteRow, QuoteState};
pub use price::parse_price;
