use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent};
use tracing::debug;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize,
}

/// Polls crossterm on a background thread and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("terminal-events".into())
            .spawn(move || {
                loop {
                    let event = if event::poll(tick_rate).unwrap_or(false) {
                        match event::read() {
                            Ok(Event::Key(key)) => AppEvent::Key(key),
                            Ok(Event::Resize(_, _)) => AppEvent::Resize,
                            _ => continue,
                        }
                    } else {
                        AppEvent::Tick
                    };
                    if tx.send(event).is_err() {
                        debug!("event receiver dropped, stopping poll thread");
                        return;
                    }
                }
            })?;

        Ok(Self { rx })
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
