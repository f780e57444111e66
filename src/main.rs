// ============================================================================
// StockTicker
// ============================================================================
// Affiche dans le terminal le prix de chaque symbole et sa direction
// depuis le rafraîchissement précédent.
//
// Boucle principale :
// 1. Rafraîchit tous les symboles en parallèle
// 2. Redessine le tableau
// 3. Attend le timer OU une touche (n'importe quelle touche quitte)
// ============================================================================

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use stockticker::api::QuoteClient;
use stockticker::app::{wait_for_deadline, App};
use stockticker::config::{Cli, Config};
use stockticker::tracker::StockTicker;
use stockticker::ui::{render, EventHandler};

/// Délai max entre deux vérifications du flag d'arrêt du thread d'événements
const EVENT_POLL_RATE: Duration = Duration::from_millis(250);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers
// un fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/stockticker/logs/stockticker.log
/// RUST_LOG=stockticker=trace stockticker -s AAPL
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "stockticker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockticker=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(
        symbols = ?config.symbols,
        interval = ?config.interval,
        endpoint = %config.endpoint,
        "StockTicker starting up"
    );

    let client = QuoteClient::new(config.endpoint.clone(), config.timeout)?;

    let ticker = StockTicker::new(config.interval);
    for symbol in &config.symbols {
        ticker.add(symbol.clone());
    }

    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let result = runtime.block_on(run(&mut terminal, &ticker, &client, &config));

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Boucle principale
// ============================================================================
// Rafraîchit, redessine, puis attend la deadline (voir app::wait_for_deadline)
// ============================================================================

async fn run(terminal: &mut Tui, ticker: &StockTicker, client: &QuoteClient, config: &Config) -> Result<()> {
    let mut app = App::new(config.interval, client.source());
    let mut events = EventHandler::new(EVENT_POLL_RATE)?;

    // Premier affichage : les symboles sans prix
    app.set_rows(ticker.snapshot());
    draw(terminal, &app)?;

    while app.is_running() {
        let summary = ticker.refresh(client).await;
        app.apply_refresh(ticker.snapshot(), summary);
        draw(terminal, &app)?;

        let deadline = tokio::time::Instant::now() + ticker.interval();
        wait_for_deadline(&mut app, &mut events, deadline, |app| draw(terminal, app)).await?;
    }

    Ok(())
}

/// Dessine l'état courant
fn draw(terminal: &mut Tui, app: &App) -> Result<()> {
    terminal
        .draw(|frame| render(frame, app))
        .context("Échec du rendu du terminal")?;
    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
