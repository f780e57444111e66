// ============================================================================
// Structure : StockTicker
// ============================================================================
// Map partagée symbole → état de cotation, protégée par un Mutex
//
// CONCEPTS RUST :
// 1. Arc<Mutex<HashMap<..>>> : état partagé entre les tâches de fetch
// 2. tokio::task::JoinSet : une tâche par symbole, on attend toutes les tâches
// 3. Lock scope minimisé : le lock n'est jamais gardé pendant un .await
// ============================================================================

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::api::QuoteClient;
use crate::models::{Quote, QuoteRow, QuoteState, Ticker};

/// Bilan d'un rafraîchissement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Symboles mis à jour avec un nouveau prix
    pub updated: usize,
    /// Symboles dont le fetch a échoué
    pub failed: usize,
}

/// Tracker des cotations
#[derive(Debug, Clone)]
pub struct StockTicker {
    quotes: Arc<Mutex<HashMap<Ticker, QuoteState>>>,
    interval: Duration,
}

impl StockTicker {
    /// Crée un tracker vide avec l'intervalle de rafraîchissement
    pub fn new(interval: Duration) -> Self {
        Self {
            quotes: Arc::new(Mutex::new(HashMap::new())),
            interval,
        }
    }

    /// Intervalle entre deux rafraîchissements
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Accès à la map
    ///
    /// Un Mutex empoisonné (panic dans une autre tâche) reste utilisable :
    /// la map ne contient que des valeurs, jamais d'invariant à moitié écrit.
    fn lock(&self) -> MutexGuard<'_, HashMap<Ticker, QuoteState>> {
        self.quotes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ajoute un symbole (sans effet s'il est déjà suivi)
    pub fn add(&self, ticker: Ticker) {
        self.lock().entry(ticker).or_default();
    }

    /// Symboles suivis, triés
    pub fn symbols(&self) -> Vec<Ticker> {
        let mut symbols: Vec<Ticker> = self.lock().keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Enregistre un nouveau prix pour un symbole
    pub fn update_price(&self, ticker: &Ticker, price: f64) {
        self.lock().entry(ticker.clone()).or_default().record_price(price);
    }

    /// Enregistre une cotation complète (prix + nom)
    pub fn update_quote(&self, ticker: &Ticker, quote: &Quote) {
        self.lock().entry(ticker.clone()).or_default().record_quote(quote);
    }

    /// Enregistre l'échec du fetch d'un symbole
    pub fn record_failure(&self, ticker: &Ticker, error: impl Into<String>) {
        self.lock().entry(ticker.clone()).or_default().record_failure(error);
    }

    /// Copie de l'état, triée par symbole (ordre d'affichage stable)
    pub fn snapshot(&self) -> Vec<QuoteRow> {
        let mut rows: Vec<QuoteRow> = self
            .lock()
            .iter()
            .map(|(ticker, state)| QuoteRow::new(ticker.clone(), state.clone()))
            .collect();
        rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        rows
    }

    /// Rafraîchit tous les symboles en parallèle
    ///
    /// CONCEPT : Fan-out / fan-in
    /// - JoinSet::spawn : une tâche tokio par symbole
    /// - join_next() : récupère les résultats dans l'ordre d'arrivée
    /// - Chaque résultat est appliqué sous le lock dès qu'il arrive
    ///
    /// Un échec n'interrompt jamais le rafraîchissement : il est loggé et
    /// affiché sur la ligne du symbole. Les résultats sont rangés sous le
    /// symbole demandé, pas sous celui renvoyé par l'API.
    pub async fn refresh(&self, client: &QuoteClient) -> RefreshSummary {
        self.refresh_with(|ticker| {
            let client = client.clone();
            async move { client.fetch_quote(&ticker).await }
        })
        .await
    }

    /// Rafraîchit avec une fonction de fetch quelconque
    async fn refresh_with<F, Fut>(&self, fetch: F) -> RefreshSummary
    where
        F: Fn(Ticker) -> Fut,
        Fut: Future<Output = Result<Quote>> + Send + 'static,
    {
        let symbols = self.symbols();
        debug!(count = symbols.len(), "Refreshing quotes");

        // Symboles dont la tâche n'a pas encore rendu de résultat
        let mut pending: HashSet<Ticker> = symbols.iter().cloned().collect();

        let mut tasks = JoinSet::new();
        for ticker in symbols {
            let fetching = fetch(ticker.clone());
            tasks.spawn(async move { (ticker, fetching.await) });
        }

        let mut summary = RefreshSummary::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((ticker, Ok(quote))) => {
                    pending.remove(&ticker);
                    if !quote.symbol.eq_ignore_ascii_case(ticker.as_str()) {
                        debug!(requested = %ticker, returned = %quote.symbol, "API returned a different symbol");
                    }
                    self.update_quote(&ticker, &quote);
                    summary.updated += 1;
                }
                Ok((ticker, Err(e))) => {
                    pending.remove(&ticker);
                    warn!(ticker = %ticker, error = ?e, "Failed to fetch quote");
                    self.record_failure(&ticker, format!("{:#}", e));
                    summary.failed += 1;
                }
                Err(e) => {
                    error!(error = ?e, "Fetch task did not complete");
                }
            }
        }

        // Tâches paniquées ou annulées : le symbole n'a rendu aucun résultat
        for ticker in pending {
            error!(ticker = %ticker, "Fetch task lost, no result for symbol");
            self.record_failure(&ticker, "tâche de fetch interrompue");
            summary.failed += 1;
        }

        info!(updated = summary.updated, failed = summary.failed, "Refresh done");
        summary
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
