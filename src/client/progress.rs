use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const TICK: Duration = Duration::from_millis(200);
pub const STEP: u8 = 10;
pub const SIMULATED_CEILING: u8 = 90;
pub const STORED: u8 = 95;
pub const COMPLETE: u8 = 100;

/// Simulated upload progress in percent. It does not measure transferred bytes.
#[derive(Clone)]
pub struct UploadProgress {
    tx: Arc<watch::Sender<u8>>,
}

impl Default for UploadProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadProgress {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<u8> {
        self.tx.subscribe()
    }

    pub fn value(&self) -> u8 {
        *self.tx.borrow()
    }

    /// Advances by one step; false once the simulated ceiling is reached.
    pub fn tick(&self) -> bool {
        advance(&self.tx)
    }

    pub fn mark_stored(&self) {
        self.tx.send_replace(STORED);
    }

    pub fn complete(&self) {
        self.tx.send_replace(COMPLETE);
    }

    pub fn reset(&self) {
        self.tx.send_replace(0);
    }

    /// Starts ticking every [`TICK`] until the ceiling. Dropping the guard stops it.
    pub fn start_simulation(&self) -> Simulation {
        self.reset();
        let tx = Arc::clone(&self.tx);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(TICK);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if !advance(&tx) {
                    break;
                }
            }
        });
        Simulation { handle }
    }
}

fn advance(tx: &watch::Sender<u8>) -> bool {
    tx.send_if_modified(|value| {
        if *value >= SIMULATED_CEILING {
            return false;
        }
        *value = (*value + STEP).min(SIMULATED_CEILING);
        true
    })
}

pub struct Simulation {
    handle: JoinHandle<()>,
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
