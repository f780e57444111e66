// ============================================================================
// Configuration : ligne de commande
// ============================================================================
// stockticker -s AAPL,TSLA,BTC-USD -i 5
//
// CONCEPT RUST : clap derive
// - Chaque champ de Cli est un argument
// - Les bornes (interval >= 1) sont vérifiées par clap avant le démarrage
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::api::DEFAULT_ENDPOINT;
use crate::models::{parse_symbol_list, Ticker};

/// Intervalle de rafraîchissement par défaut (secondes)
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Timeout HTTP par défaut (secondes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Arguments de la ligne de commande
#[derive(Debug, Parser)]
#[command(name = "stockticker", version, about = "Ticker boursier dans le terminal")]
pub struct Cli {
    /// Symboles à suivre, séparés par des virgules (ex: AAPL,TSLA,BTC-USD)
    #[arg(short = 's', long = "symbols", value_name = "LIST")]
    pub symbols: String,

    /// Intervalle de rafraîchissement en secondes
    #[arg(
        short = 'i',
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Timeout de chaque requête HTTP en secondes
    #[arg(
        short = 't',
        long,
        value_name = "SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Template d'URL de l'API, {symbol} est remplacé par le symbole
    #[arg(long, env = "STOCKTICKER_ENDPOINT", value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Répertoire des fichiers de logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Configuration validée
#[derive(Debug, Clone)]
pub struct Config {
    pub symbols: Vec<Ticker>,
    pub interval: Duration,
    pub timeout: Duration,
    pub endpoint: String,
    pub log_dir: PathBuf,
}

impl Cli {
    /// Valide les arguments et construit la Config
    ///
    /// Le template d'endpoint est vérifié par `QuoteClient::new`.
    pub fn into_config(self) -> Result<Config> {
        let symbols = parse_symbol_list(&self.symbols)?;

        Ok(Config {
            symbols,
            interval: Duration::from_secs(self.interval),
            timeout: Duration::from_secs(self.timeout),
            endpoint: self.endpoint,
            log_dir: self.log_dir.unwrap_or_else(default_log_dir),
        })
    }
}

/// Répertoire de logs par défaut
///
/// - Linux/WSL : ~/.local/share/stockticker/logs
/// - macOS : ~/Library/Application Support/stockticker/logs
/// - Windows : C:\Users\<user>\AppData\Local\stockticker\logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("stockticker").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

// ============================================================================
// Tests unitaires
// ============================================================================
