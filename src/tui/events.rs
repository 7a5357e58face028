use std::time::Duration;

use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};
use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// How long a single poll waits before checking whether the board is gone.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Forwards key presses from the terminal onto the board's channel.
///
/// Runs on the blocking pool; it exits once the receiving side is dropped.
pub fn spawn_key_reader<M, F>(tx: UnboundedSender<M>, wrap: F) -> JoinHandle<()>
where
    M: Send + 'static,
    F: Fn(KeyEvent) -> M + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        loop {
            if tx.is_closed() {
                break;
            }
            match event::poll(POLL_INTERVAL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    warn!("Terminal poll failed: {}", e);
                    break;
                }
            }
            match event::read() {
                // Release/repeat events from some terminals are ignored
                Ok(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(wrap(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Terminal read failed: {}", e);
                    break;
                }
            }
        }
        debug!("Key reader stopped");
    })
}
