// ============================================================================
// Parsing du champ prix
// ============================================================================
// L'API peut renvoyer le prix sous forme de texte ("185.2345") ou de nombre.
// On garde le nombre en tête de chaîne, tronqué (pas arrondi) à 2 décimales.
// ============================================================================

use anyhow::{bail, Context, Result};

/// Nombre de décimales conservées
pub const PRICE_DECIMALS: usize = 2;

/// Parse un prix textuel et le tronque à 2 décimales
///
/// - "123.4567" → 123.45
/// - "98" → 98.0
/// - "1,234.5" → 1234.5 (séparateurs de milliers ignorés)
/// - "" / "N/A" → erreur
pub fn parse_price(raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|&c| c != ',').collect();

    // Préfixe numérique : chiffres et points uniquement
    let end = cleaned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(cleaned.len());
    let number = &cleaned[..end];

    if !number.starts_with(|c: char| c.is_ascii_digit()) {
        bail!("Prix invalide : {:?}", raw);
    }

    let truncated = match number.split_once('.') {
        Some((integer, fraction)) => {
            let fraction: String = fraction
                .chars()
                .take_while(char::is_ascii_digit)
                .take(PRICE_DECIMALS)
                .collect();
            if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{}.{}", integer, fraction)
            }
        }
        None => number.to_string(),
    };

    truncated
        .parse::<f64>()
        .with_context(|| format!("Prix invalide : {:?}", raw))
}

/// Normalise un prix numérique avec les mêmes règles que le texte
pub fn normalize_price(price: f64) -> Result<f64> {
    if !price.is_finite() {
        bail!("Prix non fini : {}", price);
    }
    parse_price(&price.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_two_decimals() {
        assert_eq!(parse_price("123.4567").unwrap(), 123.45);
        assert_eq!(parse_price("0.999").unwrap(), 0.99);
        assert_eq!(parse_price("5.1").unwrap(), 5.1);
    }

    #[test]
    fn test_integer_and_trailing_text() {
        assert_eq!(parse_price("98").unwrap(), 98.0);
        assert_eq!(parse_price("98.").unwrap(), 98.0);
        assert_eq!(parse_price(" 42.10 USD").unwrap(), 42.1);
        assert_eq!(parse_price("1,234.567").unwrap(), 1234.56);
    }

    #[test]
    fn test_invalid_prices() {
        assert!(parse_price("").is_err());
        assert!(parse_price("N/A").is_err());
        assert!(parse_price(".5").is_err());
        assert!(parse_price("-3.2").is_err());
    }

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_price(185.2391).unwrap(), 185.23);
        assert_eq!(normalize_price(7.0).unwrap(), 7.0);
        assert!(normalize_price(f64::NAN).is_err());
    }
}
