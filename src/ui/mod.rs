// ============================================================================
// Module : ui
// ============================================================================
// Interface terminal : événements clavier et rendu du tableau
// ============================================================================

pub mod events;    // Thread lecteur + channel d'événements
pub mod dashboard; // Rendu du ticker

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use dashboard::render;
