use crossterm::event::{KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Refresh, // Auto-refresh timer fired
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, refresh_every: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // tokio intervals panic on a zero period
        let tick_rate = tick_rate.max(Duration::from_millis(1));
        let refresh_every = refresh_every.max(Duration::from_secs(1));

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);
            let mut refresh_interval = tokio::time::interval(refresh_every);

            // First tick fires immediately; the initial run covers it
            refresh_interval.tick().await;

            loop {
                let event = tokio::select! {
                    maybe_event = reader.next() => match maybe_event {
                        // Press only (Windows reports releases too)
                        Some(Ok(crossterm::event::Event::Key(key)))
                            if key.kind == KeyEventKind::Press => Event::Key(key),
                        Some(Ok(_)) | Some(Err(_)) => continue,
                        None => break,
                    },
                    _ = tick_interval.tick() => Event::Tick,
                    _ = refresh_interval.tick() => Event::Refresh,
                };

                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        EventHandler { rx }
    }

    /// Next event, or `None` once the terminal input stream has closed
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
