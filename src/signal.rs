//! Signal-aware cancellation tokens
//!
//! [`new_signal_context`] derives a child token that is cancelled by the first
//! matching OS signal, or when its parent is cancelled. A second delivery of
//! the signal that cancelled the token exits the process with
//! [`FORCED_EXIT_CODE`], so work that never observes the token can still be
//! interrupted.

use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub use crate::constants::FORCED_EXIT_CODE;
use crate::error::{Error, Result};

/// Signals observed when none are requested: SIGINT and SIGTERM
pub fn default_signals() -> [SignalKind; 2] {
    [SignalKind::interrupt(), SignalKind::terminate()]
}

/// Derive a child of `parent` cancelled on the first of `signals`
///
/// Handlers are registered before this returns. Must be called from within
/// a Tokio runtime.
pub fn new_signal_context(
    parent: &CancellationToken,
    signals: &[SignalKind],
) -> Result<CancellationToken> {
    let signals = if signals.is_empty() {
        default_signals().to_vec()
    } else {
        signals.to_vec()
    };

    if tokio::runtime::Handle::try_current().is_err() {
        return Err(Error::SignalRegistration {
            source: std::io::Error::other("no Tokio runtime is running"),
        });
    }

    let mut streams = Vec::with_capacity(signals.len());
    for kind in &signals {
        let stream = signal(*kind).map_err(|source| Error::SignalRegistration { source })?;
        streams.push((*kind, stream));
    }

    let token = parent.child_token();
    info!(signals = ?signals, "signal registration complete");

    for (kind, stream) in streams {
        tokio::spawn(watch_signal(kind, stream, token.clone(), || {
            std::process::exit(FORCED_EXIT_CODE)
        }));
    }

    Ok(token)
}

/// Cancel `token` on the first delivery and run `on_repeat` on the second
///
/// Returns without waiting for a signal once `token` is cancelled elsewhere.
async fn watch_signal<F>(kind: SignalKind, mut stream: Signal, token: CancellationToken, on_repeat: F)
where
    F: FnOnce(),
{
    tokio::select! {
        _ = token.cancelled() => {
            debug!(signal = ?kind, "signal watcher stopped");
            return;
        }
        received = stream.recv() => {
            if received.is_none() {
                return;
            }
            info!(signal = ?kind, "received shutdown signal, cancelling");
            token.cancel();
        }
    }

    if stream.recv().await.is_some() {
        warn!(signal = ?kind, "received signal again, exiting immediately");
        on_repeat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_signal_cancels_token() {
        let parent = CancellationToken::new();
        let token = new_signal_context(&parent, &[SignalKind::user_defined1()]).unwrap();
        assert!(!token.is_cancelled());

        // SAFETY: raising a signal the runtime has a handler installed for
        unsafe {
            libc::raise(libc::SIGUSR1);
        }

        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("token was not cancelled by the signal");
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_parent_cancellation_propagates() {
        let parent = CancellationToken::new();
        let token = new_signal_context(&parent, &[SignalKind::user_defined2()]).unwrap();

        parent.cancel();

        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("token was not cancelled by its parent");
    }

    #[tokio::test]
    async fn test_second_signal_runs_repeat_hook() {
        let kind = SignalKind::window_change();
        let stream = signal(kind).unwrap();
        let token = CancellationToken::new();
        let (tx, rx) = tokio::sync::oneshot::channel();

        let watcher = tokio::spawn(watch_signal(kind, stream, token.clone(), move || {
            let _ = tx.send(());
        }));

        // SAFETY: a Tokio handler is installed for SIGWINCH
        unsafe {
            libc::raise(libc::SIGWINCH);
        }
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("first signal did not cancel the token");
        assert!(!watcher.is_finished());

        unsafe {
            libc::raise(libc::SIGWINCH);
        }
        tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .expect("second signal did not run the hook")
            .unwrap();
        watcher.await.unwrap();
    }

    #[tokio::test]
    async fn test_watcher_stops_when_cancelled_elsewhere() {
        let kind = SignalKind::user_defined2();
        let stream = signal(kind).unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let mut hook_ran = false;
        tokio::time::timeout(
            Duration::from_secs(1),
            watch_signal(kind, stream, token, || hook_ran = true),
        )
        .await
        .expect("watcher kept running after cancellation");
        assert!(!hook_ran);
    }

    #[test]
    fn test_requires_runtime() {
        let parent = CancellationToken::new();
        let result = new_signal_context(&parent, &[SignalKind::user_defined2()]);
        assert!(matches!(result, Err(Error::SignalRegistration { .. })));
    }

    #[test]
    fn test_default_signals() {
        assert_eq!(
            default_signals(),
            [SignalKind::interrupt(), SignalKind::terminate()]
        );
    }
}
