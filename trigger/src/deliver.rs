use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use std::net::SocketAddr;
use std::time::Duration;

use utils::protocol::payload;

#[derive(Debug, Clone, Copy)]
pub struct DeliveryOpts {
    pub addr: SocketAddr,
    pub connect_timeout: Duration,
    pub settle_delay: Duration,
}

impl DeliveryOpts {
    pub fn from_config(cfg: &utils::Config) -> Self {
        Self {
            addr: cfg.endpoint(),
            connect_timeout: cfg.connect_timeout(),
            settle_delay: cfg.settle_delay(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A running instance took the word on the first try.
    Delivered,
    /// Nothing was running; an instance was started and there was no word to send.
    Launched,
    /// Nothing was running; an instance was started and the retry got through.
    RetryDelivered,
    /// Nothing was running; an instance was started but the retry failed too.
    RetryFailed,
    SpawnFailed,
}

pub async fn send_word(addr: SocketAddr, word: &str, timeout: Duration) -> anyhow::Result<()> {
    log::debug!("send_word: target={} bytes={}", addr, word.len());
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .context("connect timed out")?
        .context("connect")?;
    tokio::time::timeout(timeout, stream.write_all(payload(word)))
        .await
        .context("write timed out")?
        .context("write word")?;
    let _ = stream.shutdown().await;
    Ok(())
}

/// Hand `word` to the running instance, starting one with `spawn` if needed.
///
/// After a spawn the send is retried exactly once, after `settle_delay`. With
/// no word the first attempt only checks that something is listening.
pub async fn send_or_spawn<F>(opts: &DeliveryOpts, word: Option<&str>, spawn: F) -> Outcome
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match send_word(opts.addr, word.unwrap_or(""), opts.connect_timeout).await {
        Ok(()) => {
            log::info!("delivered to running instance at {}", opts.addr);
            return Outcome::Delivered;
        }
        Err(e) => log::info!("no instance at {} ({e:#}), starting one", opts.addr),
    }

    if let Err(e) = spawn() {
        log::error!("failed to start word-lookup: {e:#}");
        return Outcome::SpawnFailed;
    }

    let Some(word) = word else {
        return Outcome::Launched;
    };

    tokio::time::sleep(opts.settle_delay).await;
    match send_word(opts.addr, word, opts.connect_timeout).await {
        Ok(()) => {
            log::info!("delivered after start-up");
            Outcome::RetryDelivered
        }
        Err(e) => {
            log::warn!("retry after start-up failed: {e:#}");
            Outcome::RetryFailed
        }
    }
}
