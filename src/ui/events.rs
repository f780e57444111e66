// ============================================================================
// Gestion des événements
// ============================================================================
// Un thread dédié lit les événements clavier de crossterm et les envoie
// sur un channel tokio. La boucle principale fait un select! entre ce
// channel et le timer de rafraîchissement.
//
// CONCEPTS RUST :
// 1. Enums avec données : Key(KeyEvent), Resize(w, h)
// 2. Thread OS + channel async : crossterm::event::read() est bloquant
// 3. Drop : arrêt du thread quand le handler est détruit
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Terminal redimensionné
    Resize(u16, u16),

    /// Erreur de lecture du terminal
    Error(String),
}

/// Gestionnaire d'événements
///
/// CONCEPT : Keypress-to-quit channel
/// - Le thread lecteur possède le Sender
/// - La boucle principale possède le Receiver
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    stop: Arc<AtomicBool>,
}

impl EventHandler {
    /// Lance le thread lecteur
    ///
    /// `poll_rate` : délai max entre deux vérifications du flag d'arrêt
    pub fn new(poll_rate: Duration) -> Result<Self> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();

        thread::Builder::new()
            .name("terminal-events".to_string())
            .spawn(move || read_events(sender, thread_stop, poll_rate))
            .context("Échec du lancement du thread d'événements")?;

        Ok(Self { receiver, stop })
    }

    /// Handler alimenté par un channel existant (tests)
    #[cfg(test)]
    pub(crate) fn from_receiver(receiver: mpsc::UnboundedReceiver<Event>) -> Self {
        Self {
            receiver,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attend le prochain événement
    ///
    /// Retourne None si le thread lecteur s'est arrêté
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Boucle du thread lecteur
fn read_events(sender: mpsc::UnboundedSender<Event>, stop: Arc<AtomicBool>, poll_rate: Duration) {
    debug!("Event reader thread started");

    while !stop.load(Ordering::Relaxed) {
        let event = match event::poll(poll_rate) {
            Ok(false) => continue,
            Ok(true) => match event::read() {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                Ok(CrosstermEvent::Resize(width, height)) => Event::Resize(width, height),
                Ok(_) => continue,
                Err(e) => Event::Error(e.to_string()),
            },
            Err(e) => Event::Error(e.to_string()),
        };

        let is_error = matches!(event, Event::Error(_));
        if let Event::Error(message) = &event {
            error!(error = %message, "Failed to read terminal event");
        }

        if sender.send(event).is_err() || is_error {
            break;
        }
    }

    debug!("Event reader thread exiting");
}

/// Vérifie si l'événement doit quitter l'application
///
/// N'importe quelle touche quitte, Ctrl-C compris (en raw mode le
/// terminal n'envoie pas SIGINT, Ctrl-C arrive comme une touche).
pub fn is_quit_event(event: &Event) -> bool {
    matches!(event, Event::Key(_))
}

/// Vérifie si l'événement est Ctrl-C
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
    } else {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_any_key_quits() {
        assert!(is_quit_event(&key(KeyCode::Char('q'), KeyModifiers::empty())));
        assert!(is_quit_event(&key(KeyCode::Enter, KeyModifiers::empty())));
        assert!(is_quit_event(&key(KeyCode::Esc, KeyModifiers::empty())));

        assert!(!is_quit_event(&Event::Resize(80, 24)));
        assert!(!is_quit_event(&Event::Error("io".to_string())));
    }

    #[test]
    fn test_interrupt_event() {
        assert!(is_interrupt_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_interrupt_event(&key(KeyCode::Char('c'), KeyModifiers::empty())));
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut events = EventHandler::from_receiver(receiver);

        sender.send(Event::Resize(100, 30)).unwrap();
        sender.send(key(KeyCode::Char('x'), KeyModifiers::empty())).unwrap();
        drop(sender);

        assert!(matches!(events.next().await, Some(Event::Resize(100, 30))));
        assert!(matches!(events.next().await, Some(Event::Key(_))));
        assert!(events.next().await.is_none());
    }
}
