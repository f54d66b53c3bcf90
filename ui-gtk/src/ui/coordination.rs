use std::net::SocketAddr;
use std::sync::mpsc;
use std::time::Duration;

use utils::server::CHANNEL_CAPACITY;
use utils::{claim, Claim};

use super::constants::WORD_DRAIN_INTERVAL_MS;
use super::view::LookupView;

/// Claim the coordination endpoint and route delivered words into the window.
///
/// Losing the claim is the normal case for a second window; it keeps running,
/// it just isn't reachable by the launcher.
pub fn start_coordination(addr: SocketAddr, view: &LookupView) {
    let server = match claim(addr) {
        Ok(Claim::Owner(server)) => server,
        Ok(Claim::Taken) => {
            log::info!("{} is owned by another instance; not serving", addr);
            return;
        }
        Err(e) => {
            log::warn!("cannot listen on {}: {e}; not serving", addr);
            return;
        }
    };

    let (word_tx, word_rx) = mpsc::sync_channel::<String>(CHANNEL_CAPACITY);
    if let Err(e) = server.spawn(word_tx) {
        log::error!("coordination thread failed to start: {e}");
        return;
    }
    install_word_drain(word_rx, view.clone());
}

fn install_word_drain(word_rx: mpsc::Receiver<String>, view: LookupView) {
    // glib 0.19 / gtk4: a main-thread timeout drains the std channel in arrival order.
    glib::timeout_add_local(Duration::from_millis(WORD_DRAIN_INTERVAL_MS), move || {
        loop {
            match word_rx.try_recv() {
                Ok(word) => view.receive_word(&word),
                Err(mpsc::TryRecvError::Empty) => return glib::ControlFlow::Continue,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("coordination thread stopped; no more deliveries");
                    return glib::ControlFlow::Break;
                }
            }
        }
    });
}
