// ============================================================================
// Structure : App
// ============================================================================
// État de l'affichage TUI
//
// PATTERN : "Application State"
// - Le rendu lit uniquement depuis App
// - La boucle principale met App à jour après chaque rafraîchissement
// - App ne touche jamais au Mutex du tracker : elle garde un snapshot
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::models::QuoteRow;
use crate::tracker::RefreshSummary;
use crate::ui::events::{is_interrupt_event, is_quit_event, Event, EventHandler};

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Lignes affichées, triées par symbole
    pub rows: Vec<QuoteRow>,

    /// Heure du dernier rafraîchissement terminé
    pub last_refresh: Option<DateTime<Local>>,

    /// Nombre de rafraîchissements terminés
    pub refresh_count: u64,

    /// Bilan du dernier rafraîchissement
    pub last_summary: RefreshSummary,

    /// Intervalle de rafraîchissement (affiché dans le header)
    pub interval: Duration,

    /// Hôte de l'API (affiché dans le header)
    pub source: String,
}

impl App {
    /// Crée l'état initial, sans aucune ligne
    pub fn new(interval: Duration, source: impl Into<String>) -> Self {
        Self {
            running: true,
            rows: Vec::new(),
            last_refresh: None,
            refresh_count: 0,
            last_summary: RefreshSummary::default(),
            interval,
            source: source.into(),
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application est toujours en cours d'exécution
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Affiche les lignes avant le premier rafraîchissement
    pub fn set_rows(&mut self, rows: Vec<QuoteRow>) {
        self.rows = rows;
    }

    /// Applique le résultat d'un rafraîchissement
    pub fn apply_refresh(&mut self, rows: Vec<QuoteRow>, summary: RefreshSummary) {
        self.rows = rows;
        self.last_summary = summary;
        self.last_refresh = Some(Local::now());
        self.refresh_count += 1;
    }

    /// Nombre de lignes en erreur
    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.state.has_error()).count()
    }

    /// Traite un événement, retourne true s'il faut redessiner
    ///
    /// - Touche (Ctrl-C compris) : quitte
    /// - Resize : redessine
    /// - Erreur de lecture du terminal : quitte
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(_) if is_interrupt_event(event) => {
                info!("User interrupted (Ctrl-C)");
                self.quit();
                false
            }
            Event::Key(key) if is_quit_event(event) => {
                info!(key = ?key.code, "User pressed a key, quitting");
                self.quit();
                false
            }
            Event::Resize(width, height) => {
                debug!(width = *width, height = *height, "Terminal resized");
                true
            }
            Event::Error(message) => {
                error!(error = %message, "Terminal event error, quitting");
                self.quit();
                false
            }
            Event::Key(_) => false,
        }
    }
}

// ============================================================================
// Attente entre deux rafraîchissements
// ============================================================================
// CONCEPT : tokio::select!
// - Attend le premier prêt parmi : un événement terminal, la deadline
// - Resize : on redessine et on continue d'attendre la MÊME deadline
// - Touche, erreur ou channel fermé : on quitte
// ============================================================================

/// Attend la deadline en traitant les événements
///
/// `redraw` est appelé après chaque événement qui demande un redessin.
/// Retourne dès que l'application ne tourne plus.
pub async fn wait_for_deadline<F>(
    app: &mut App,
    events: &mut EventHandler,
    deadline: Instant,
    mut redraw: F,
) -> Result<()>
where
    F: FnMut(&App) -> Result<()>,
{
    while app.is_running() {
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(event) => {
                    if app.handle_event(&event) {
                        redraw(app)?;
                    }
                }
                None => {
                    warn!("Event channel closed, exiting");
                    app.quit();
                }
            },
            _ = tokio::time::sleep_until(deadline) => break,
        }
    }

    Ok(())
}

// ============================================================================
// Tests unitaires
// ============================================================================
