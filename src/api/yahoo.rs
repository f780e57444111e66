// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère la dernière cotation d'un symbole depuis l'endpoint JSON
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : un fetch par symbole, lancés en parallèle par le tracker
// 2. Result<T, E> : gestion d'erreurs avec contexte (anyhow)
// 3. Serde : désérialisation JSON automatique, #[serde(untagged)]
// ============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::models::price::normalize_price;
use crate::models::{parse_price, Quote, Ticker};

/// Marqueur remplacé par le symbole dans le template d'URL
pub const SYMBOL_PLACEHOLDER: &str = "{symbol}";

/// Endpoint par défaut : chart v8 de Yahoo, on ne lit que les métadonnées
pub const DEFAULT_ENDPOINT: &str =
    "https://query1.finance.yahoo.com/v8/finance/chart/{symbol}?interval=1d&range=1d";

/// User-Agent de navigateur pour éviter le blocage par Yahoo
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// On ne déclare que les champs utiles : serde ignore le reste du JSON
// ============================================================================

/// Réponse complète de l'API Yahoo Finance
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    symbol: String,
    regular_market_price: Option<RawPrice>,
    short_name: Option<String>,
    long_name: Option<String>,
}

/// Le prix peut arriver en nombre (185.23) ou en texte ("185.2300")
///
/// CONCEPT RUST : #[serde(untagged)]
/// - Serde essaie chaque variant dans l'ordre
/// - Le premier qui matche le JSON gagne
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(f64),
    Text(String),
}

impl RawPrice {
    fn to_price(&self) -> Result<f64> {
        match self {
            RawPrice::Number(value) => normalize_price(*value),
            RawPrice::Text(text) => parse_price(text),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP partagé par toutes les tâches de fetch
///
/// CONCEPT RUST : Clone bon marché
/// - reqwest::Client contient un Arc interne
/// - Cloner le client réutilise le même pool de connexions
#[derive(Debug, Clone)]
pub struct QuoteClient {
    http: reqwest::Client,
    endpoint: String,
    source: String,
}

impl QuoteClient {
    /// Crée le client avec le template d'URL et le timeout par requête
    ///
    /// # Arguments
    /// * `endpoint` - URL contenant `{symbol}`
    /// * `timeout` - durée max d'une requête
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        let source = endpoint_host(&endpoint)?;

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self { http, endpoint, source })
    }

    /// Hôte de l'endpoint (affiché dans le header)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// URL de cotation pour un symbole
    pub fn quote_url(&self, ticker: &Ticker) -> String {
        self.endpoint.replace(SYMBOL_PLACEHOLDER, ticker.as_str())
    }

    /// Récupère la cotation d'un symbole
    ///
    /// CONCEPT RUST : #[instrument]
    /// - Tous les logs à l'intérieur portent le champ ticker
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote> {
        let url = self.quote_url(ticker);
        debug!(url = %url, "Sending HTTP request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Échec de la requête HTTP pour {}", ticker))?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            error!(status = %status, "Quote endpoint returned error status");
            anyhow::bail!("L'API a retourné une erreur pour {} : HTTP {}", ticker, status);
        }

        let yahoo_response: YahooResponse = response
            .json()
            .await
            .with_context(|| format!("Échec du parsing JSON pour {}", ticker))?;

        let quote = parse_quote_response(yahoo_response, ticker)?;
        info!(price = quote.price, "Quote fetched");
        Ok(quote)
    }
}

/// Vérifie le template d'URL et en extrait l'hôte
fn endpoint_host(endpoint: &str) -> Result<String> {
    if !endpoint.contains(SYMBOL_PLACEHOLDER) {
        anyhow::bail!("L'endpoint doit contenir {} : {}", SYMBOL_PLACEHOLDER, endpoint);
    }

    let sample = endpoint.replace(SYMBOL_PLACEHOLDER, "AAPL");
    let url = reqwest::Url::parse(&sample)
        .with_context(|| format!("Endpoint invalide : {}", endpoint))?;

    let host = url.host_str().context("Endpoint sans hôte")?;
    Ok(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Convertit la réponse Yahoo en Quote
fn parse_quote_response(yahoo_response: YahooResponse, ticker: &Ticker) -> Result<Quote> {
    if let Some(err) = yahoo_response.chart.error.filter(|e| !e.is_null()) {
        anyhow::bail!("Yahoo Finance a retourné une erreur pour {} : {}", ticker, err);
    }

    let result = yahoo_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .with_context(|| format!("Aucune donnée retournée pour {}", ticker))?;

    let meta = result.meta;
    let price = meta
        .regular_market_price
        .with_context(|| format!("Pas de prix dans la réponse pour {}", ticker))?
        .to_price()?;

    Ok(Quote {
        symbol: meta.symbol,
        name: meta.short_name.or(meta.long_name),
        price,
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{chart_body, spawn_quote_server};

    fn ticker(symbol: &str) -> Ticker {
        symbol.parse().unwrap()
    }

    fn parse(json: &str) -> Result<Quote> {
        let response: YahooResponse = serde_json::from_str(json).unwrap();
        parse_quote_response(response, &ticker("AAPL"))
    }

    #[test]
    fn test_quote_url() {
        let client = QuoteClient::new(DEFAULT_ENDPOINT, Duration::from_secs(10)).unwrap();
        let url = client.quote_url(&ticker("btc-usd"));
        assert!(url.contains("/chart/BTC-USD?"));
        assert_eq!(client.source(), "query1.finance.yahoo.com");
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(QuoteClient::new("https://example.com/quote", Duration::from_secs(1)).is_err());
        assert!(QuoteClient::new("not a url {symbol}", Duration::from_secs(1)).is_err());
        assert_eq!(
            endpoint_host("http://127.0.0.1:8080/q/{symbol}").unwrap(),
            "127.0.0.1:8080"
        );
    }

    #[test]
    fn test_parse_numeric_price() {
        let quote = parse(&chart_body("AAPL", "185.2391")).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, 185.23);
        assert_eq!(quote.name.as_deref(), Some("AAPL Inc."));
    }

    #[test]
    fn test_parse_text_price() {
        let quote = parse(&chart_body("AAPL", "\"42.129\"")).unwrap();
        assert_eq!(quote.price, 42.12);
    }

    #[test]
    fn test_parse_error_payload() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let err = parse(json).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn test_parse_empty_result() {
        assert!(parse(r#"{"chart":{"result":[],"error":null}}"#).is_err());
    }

    #[test]
    fn test_parse_missing_price() {
        let json = r#"{"chart":{"result":[{"meta":{"symbol":"AAPL"}}],"error":null}}"#;
        assert!(parse(json).is_err());
    }

    #[tokio::test]
    async fn test_fetch_quote_from_local_server() {
        let base = spawn_quote_server(|path| {
            if path.ends_with("/MSFT") {
                (200, chart_body("MSFT", "410.5"))
            } else {
                (404, r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#.to_string())
            }
        })
        .await;

        let client = QuoteClient::new(format!("{}/quote/{{symbol}}", base), Duration::from_secs(5)).unwrap();

        let quote = client.fetch_quote(&ticker("msft")).await.unwrap();
        assert_eq!(quote.symbol, "MSFT");
        assert_eq!(quote.price, 410.5);

        let err = client.fetch_quote(&ticker("NOPE")).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
