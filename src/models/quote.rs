// ============================================================================
// Structure : QuoteState
// ============================================================================
// État de cotation d'un symbole entre deux rafraîchissements :
// prix courant, prix précédent, et éventuelle erreur du dernier fetch
//
// CONCEPTS RUST :
// 1. Option<f64> : "pas encore de prix" est un état explicite (pas 0.0)
// 2. Enum Direction : le compilateur force à gérer Up / Down / Unchanged
// ============================================================================

use std::cmp::Ordering;

use chrono::{DateTime, Local};

use crate::models::Ticker;

/// Direction du prix depuis le rafraîchissement précédent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Le prix a monté
    Up,
    /// Le prix a baissé
    Down,
    /// Pas de prix précédent, ou prix identique
    Unchanged,
}

impl Direction {
    /// Flèche affichée dans le tableau
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Unchanged => "-",
        }
    }
}

/// Cotation renvoyée par l'API pour un symbole
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Symbole tel que renvoyé par l'API
    pub symbol: String,
    /// Nom court de l'instrument (si l'API le fournit)
    pub name: Option<String>,
    /// Prix normalisé à 2 décimales
    pub price: f64,
}

/// Prix courant et précédent d'un symbole
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteState {
    /// Dernier prix reçu
    pub current: Option<f64>,

    /// Prix reçu au rafraîchissement d'avant
    pub previous: Option<f64>,

    /// Nom de l'instrument
    pub name: Option<String>,

    /// Message d'erreur du dernier fetch (None si le dernier fetch a réussi)
    pub last_error: Option<String>,

    /// Heure locale du dernier prix reçu
    pub updated_at: Option<DateTime<Local>>,
}

impl QuoteState {
    /// Crée un état vide (aucun prix reçu)
    pub fn new() -> Self {
        Self::default()
    }

    /// Enregistre un nouveau prix : l'ancien courant devient le précédent
    pub fn record_price(&mut self, price: f64) {
        self.previous = self.current;
        self.current = Some(price);
        self.last_error = None;
        self.updated_at = Some(Local::now());
    }

    /// Enregistre une cotation complète (prix + nom)
    pub fn record_quote(&mut self, quote: &Quote) {
        if quote.name.is_some() {
            self.name = quote.name.clone();
        }
        self.record_price(quote.price);
    }

    /// Enregistre un échec de fetch, les prix restent intacts
    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    /// Direction depuis le rafraîchissement précédent
    ///
    /// Un prix précédent à 0.0 compte comme absent.
    pub fn direction(&self) -> Direction {
        match (self.current, self.previous) {
            (Some(current), Some(previous)) if previous != 0.0 => {
                match current.partial_cmp(&previous) {
                    Some(Ordering::Greater) => Direction::Up,
                    Some(Ordering::Less) => Direction::Down,
                    _ => Direction::Unchanged,
                }
            }
            _ => Direction::Unchanged,
        }
    }

    /// Vrai si le dernier fetch a échoué
    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Ligne du tableau : un symbole et une copie de son état
///
/// CONCEPT : Snapshot
/// - Copié hors du Mutex pour que le rendu ne garde jamais le lock
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRow {
    pub ticker: Ticker,
    pub state: QuoteState,
}

impl QuoteRow {
    pub fn new(ticker: Ticker, state: QuoteState) -> Self {
        Self { ticker, state }
    }

    pub fn direction(&self) -> Direction {
        self.state.direction()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
