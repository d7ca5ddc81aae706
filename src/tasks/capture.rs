use std::panic;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use device_query::{DeviceQuery, DeviceState};

use crate::app::AppState;
use crate::counter;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Verify the key-capture backend is usable before anything is spawned.
///
/// `DeviceState::new` panics when no input backend is available (for example
/// a Linux session without X11). That panic is converted into a startup
/// error so the program refuses to run instead of counting nothing.
pub fn probe() -> Result<()> {
    panic::catch_unwind(|| {
        let device_state = DeviceState::new();
        device_state.get_keys();
    })
    .map_err(|_| anyhow!("global key capture is unavailable on this system"))?;

    Ok(())
}

/// Run the capture loop on a dedicated thread.
///
/// The device handle is created on that thread and never leaves it.
pub fn spawn(state: Arc<AppState>) {
    thread::spawn(move || capture_keys(state));
}

/// Poll the system-wide pressed-key set and count new qualifying key-downs.
///
/// A key present in the current poll but not the previous one is one
/// key-down event. Held keys stay in the set and are counted once.
fn capture_keys(state: Arc<AppState>) {
    let device_state = DeviceState::new();
    let mut last_keys = device_state.get_keys();

    loop {
        thread::sleep(POLL_INTERVAL);

        let current_keys = device_state.get_keys();
        for key in current_keys.iter().filter(|k| !last_keys.contains(k)) {
            if counter::is_qualifying(key) {
                state.counter.increment();
            }
        }

        last_keys = current_keys;
    }
}
