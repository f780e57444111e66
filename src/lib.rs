// ============================================================================
// StockTicker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client de l'endpoint de cotations
pub mod models;    // Symboles, prix, état par symbole
pub mod tracker;   // Map partagée symbole → état + rafraîchissement parallèle
pub mod app;       // État de l'affichage
pub mod config;    // Ligne de commande
pub mod ui;        // Interface utilisateur

#[cfg(test)]
mod test_support;  // Faux serveur HTTP pour les tests
