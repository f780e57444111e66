// ============================================================================
// Structure : Ticker
// ============================================================================
// Représente un symbole boursier validé (action, crypto, ETF, indice, forex)
//
// CONCEPTS RUST :
// 1. Newtype pattern : struct Ticker(String)
//    - Un String "brut" peut contenir n'importe quoi
//    - Un Ticker est forcément valide (construit uniquement via FromStr)
//
// 2. Traits standards : FromStr, Display, AsRef<str>
//    - "aapl".parse::<Ticker>() fonctionne grâce à FromStr
//    - format!("{}", ticker) fonctionne grâce à Display
// ============================================================================

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};

/// Longueur maximale d'un symbole (ex: "EURUSD=X", "BTC-USD", "^GSPC")
pub const MAX_SYMBOL_LEN: usize = 15;

/// Symbole boursier normalisé en majuscules
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    /// Symbole sous forme de &str (ex: "AAPL")
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Caractères acceptés dans un symbole Yahoo
fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '^' | '=')
}

impl FromStr for Ticker {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let symbol = s.trim();

        if symbol.is_empty() {
            bail!("Symbole vide");
        }
        if symbol.len() > MAX_SYMBOL_LEN {
            bail!("Symbole trop long : {} ({} caractères max)", symbol, MAX_SYMBOL_LEN);
        }
        if let Some(bad) = symbol.chars().find(|&c| !is_symbol_char(c)) {
            bail!("Caractère invalide '{}' dans le symbole {}", bad, symbol);
        }

        Ok(Self(symbol.to_ascii_uppercase()))
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parse une liste de symboles séparés par des virgules
///
/// CONCEPT RUST : Iterator chaining
/// - split(',') découpe la liste
/// - les fragments vides ("AAPL,,TSLA" ou virgule finale) sont ignorés
/// - HashSet::insert retourne false pour un doublon : on garde le premier
///
/// # Exemple
/// let tickers = parse_symbol_list("aapl,TSLA,btc-usd")?;
/// assert_eq!(tickers[0].as_str(), "AAPL");
pub fn parse_symbol_list(list: &str) -> Result<Vec<Ticker>> {
    let mut seen = HashSet::new();
    let mut tickers = Vec::new();

    for fragment in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let ticker: Ticker = fragment.parse()?;
        if seen.insert(ticker.clone()) {
            tickers.push(ticker);
        }
    }

    if tickers.is_empty() {
        bail!("Aucun symbole fourni (ex: -s AAPL,TSLA)");
    }

    Ok(tickers)
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_is_uppercased() {
        let ticker: Ticker = " aapl ".parse().unwrap();
        assert_eq!(ticker.as_str(), "AAPL");
        assert_eq!(ticker.to_string(), "AAPL");
    }

    #[test]
    fn test_ticker_accepts_yahoo_forms() {
        for symbol in ["BTC-USD", "^GSPC", "EURUSD=X", "BRK.B"] {
            assert!(symbol.parse::<Ticker>().is_ok(), "{} devrait être valide", symbol);
        }
    }

    #[test]
    fn test_ticker_rejects_invalid() {
        assert!("".parse::<Ticker>().is_err());
        assert!("AA PL".parse::<Ticker>().is_err());
        assert!("AAPL/".parse::<Ticker>().is_err());
        assert!("ABCDEFGHIJKLMNOP".parse::<Ticker>().is_err());
    }

    #[test]
    fn test_parse_single_symbol() {
        let tickers = parse_symbol_list("goog").unwrap();
        assert_eq!(tickers.len(), 1);
        assert_eq!(tickers[0].as_str(), "GOOG");
    }

    #[test]
    fn test_parse_list_dedup_and_order() {
        let tickers = parse_symbol_list("TSLA,aapl,,tsla, MSFT ,").unwrap();
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL", "MSFT"]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_symbol_list("").is_err());
        assert!(parse_symbol_list(" , ,").is_err());
    }

    #[test]
    fn test_parse_list_with_invalid_symbol() {
        assert!(parse_symbol_list("AAPL,TS LA").is_err());
    }
}
