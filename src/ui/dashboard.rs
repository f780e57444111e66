// ============================================================================
// Dashboard - Rendu du ticker
// ============================================================================
// Header (titre + dernière mise à jour), tableau des cotations, footer.
//
// Une ligne par symbole : symbole, prix courant, prix précédent, flèche.
// Vert si le prix monte, rouge s'il baisse, gris sinon.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{Direction, QuoteRow};

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_quotes(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Formatage d'une ligne
// ============================================================================

/// Prix affiché avec 2 décimales
fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Texte d'une ligne : "  AAPL  185.23  184.10    ↑"
///
/// Colonnes alignées à droite (6, 7, 7, 4). Le prix précédent et la
/// flèche valent "-" tant qu'il n'y a pas de variation. "..." tant que
/// le premier prix n'est pas arrivé.
pub fn format_row(row: &QuoteRow) -> String {
    let current = match row.state.current {
        Some(price) => format_price(price),
        None => "...".to_string(),
    };

    let direction = row.direction();
    let previous = match (direction, row.state.previous) {
        (Direction::Up | Direction::Down, Some(previous)) => format_price(previous),
        _ => "-".to_string(),
    };

    format!(
        "{:>6} {:>7} {:>7} {:>4}",
        row.ticker.as_str(),
        current,
        previous,
        direction.arrow()
    )
}

/// Couleur d'une ligne selon la direction
fn row_style(row: &QuoteRow) -> Style {
    if row.state.current.is_none() {
        return Style::default().fg(Color::DarkGray);
    }

    match row.direction() {
        Direction::Up => Style::default().fg(Color::Green),
        Direction::Down => Style::default().fg(Color::Red),
        Direction::Unchanged => Style::default().fg(Color::Gray),
    }
}

/// Entête des colonnes, aligné sur format_row
fn column_header() -> String {
    format!("{:>6} {:>7} {:>7} {:>4}", "Symb.", "Prix", "Préc.", "Var.")
}

// ============================================================================
// Widgets
// ============================================================================

/// Dessine le header avec le titre et l'heure de mise à jour
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" StockTicker ")
        .title_alignment(Alignment::Center);

    let updated = match app.last_refresh {
        Some(at) => format!("Mis à jour à {}", at.format("%H:%M:%S")),
        None => "Chargement...".to_string(),
    };

    let text = Line::from(vec![
        Span::styled(updated, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(format!("  ·  toutes les {}s  ·  {}", app.interval.as_secs(), app.source)),
    ]);

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Dessine le tableau des cotations
fn render_quotes(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Cotations ");

    let mut items = vec![ListItem::new(column_header())
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))];

    items.extend(app.rows.iter().map(|row| {
        let mut spans = vec![Span::styled(format_row(row), row_style(row))];

        if let Some(name) = &row.state.name {
            spans.push(Span::styled(format!("  {}", name), Style::default().fg(Color::Gray)));
        }
        if row.state.has_error() {
            spans.push(Span::styled(
                "  ERR",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }

        ListItem::new(Line::from(spans))
    }));

    frame.render_widget(List::new(items).block(block), area);
}

/// Dessine le footer : aide et erreurs du dernier rafraîchissement
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![
        Span::styled("[n'importe quelle touche]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Quitter"),
    ];

    let failed = app.failed_count();
    if failed > 0 {
        spans.push(Span::styled(
            format!("   ⚠ {} symbole(s) en erreur (voir les logs)", failed),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteState;
    use crate::tracker::RefreshSummary;

    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn row(symbol: &str, prices: &[f64]) -> QuoteRow {
        let mut state = QuoteState::new();
        for &price in prices {
            state.record_price(price);
        }
        QuoteRow::new(symbol.parse().unwrap(), state)
    }

    #[test]
    fn test_format_row_pending() {
        assert_eq!(format_row(&row("AAPL", &[])), "  AAPL     ...       -    -");
    }

    #[test]
    fn test_format_row_first_price() {
        assert_eq!(format_row(&row("AAPL", &[185.2])), "  AAPL  185.20       -    -");
    }

    #[test]
    fn test_format_row_up_and_down() {
        assert_eq!(format_row(&row("TSLA", &[200.0, 201.5])), "  TSLA  201.50  200.00    ↑");
        assert_eq!(format_row(&row("TSLA", &[201.5, 200.0])), "  TSLA  200.00  201.50    ↓");
    }

    #[test]
    fn test_format_row_unchanged_hides_previous() {
        assert_eq!(format_row(&row("MSFT", &[410.0, 410.0])), "  MSFT  410.00       -    -");
    }

    #[test]
    fn test_row_colours() {
        assert_eq!(row_style(&row("AAPL", &[1.0, 2.0])).fg, Some(Color::Green));
        assert_eq!(row_style(&row("AAPL", &[2.0, 1.0])).fg, Some(Color::Red));
        assert_eq!(row_style(&row("AAPL", &[2.0, 2.0])).fg, Some(Color::Gray));
        assert_eq!(row_style(&row("AAPL", &[2.0])).fg, Some(Color::Gray));
        assert_eq!(row_style(&row("AAPL", &[])).fg, Some(Color::DarkGray));
    }

    #[test]
    fn test_render_dashboard() {
        let mut app = App::new(Duration::from_secs(5), "query1.finance.yahoo.com");

        let mut failed = row("BAD", &[]);
        failed.state.record_failure("HTTP 500");
        app.apply_refresh(
            vec![row("AAPL", &[100.0, 101.0]), failed],
            RefreshSummary { updated: 1, failed: 1 },
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();

        assert!(content.contains("StockTicker"));
        assert!(content.contains("AAPL"));
        assert!(content.contains("101.00"));
        assert!(content.contains("ERR"));
        assert!(content.contains("toutes les 5s"));
    }
}
