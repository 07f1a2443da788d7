//! Cancellable background proof generation.
//!
//! Groth16 proving is CPU-bound and takes seconds, so it runs on the blocking
//! pool. Cancelling a task stops waiting for it immediately; the blocking
//! computation finishes in the background and its result is discarded.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use zeroize::Zeroizing;
use zkauth_crypto::{ProofBundle, ProofProver};
use zkauth_types::{ZkAuthError, ZkAuthResult};

#[derive(Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    pub fn new() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { receiver: rx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once cancelled, or once every sender is gone.
    pub async fn cancelled(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }
}

/// Cloneable handle that cancels one `ProofTask`.
#[derive(Clone)]
pub struct Canceller {
    sender: Arc<watch::Sender<bool>>,
}

impl Canceller {
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }
}

pub struct ProofTask {
    handle: JoinHandle<ZkAuthResult<ProofBundle>>,
    canceller: Canceller,
    token: CancellationToken,
}

impl ProofTask {
    /// Each task owns its own copies of the inputs. The secret is wiped when
    /// the task finishes.
    pub fn spawn(prover: ProofProver, secret: String, nonce: String, commitment: String) -> Self {
        let secret = Zeroizing::new(secret);
        Self::spawn_with(move || prover.prove(&secret, &nonce, &commitment))
    }

    pub fn spawn_with<F>(work: F) -> Self
    where
        F: FnOnce() -> ZkAuthResult<ProofBundle> + Send + 'static,
    {
        let (sender, token) = CancellationToken::new();
        Self {
            handle: tokio::task::spawn_blocking(work),
            canceller: Canceller {
                sender: Arc::new(sender),
            },
            token,
        }
    }

    pub fn canceller(&self) -> Canceller {
        self.canceller.clone()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits for the proof, resolving to `Cancelled` as soon as the task is
    /// cancelled.
    pub async fn wait(mut self) -> ZkAuthResult<ProofBundle> {
        let mut token = self.token.clone();
        let joined = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            joined = &mut self.handle => Some(joined),
        };

        match joined {
            Some(joined) => joined
                .map_err(|e| ZkAuthError::Internal(format!("proof task failed: {}", e)))?,
            None => {
                debug!("Proof task cancelled");
                self.handle.abort();
                Err(ZkAuthError::Cancelled)
            }
        }
    }

    /// Like `wait`, but cancels the task once `timeout` elapses.
    pub async fn wait_timeout(self, timeout: Duration) -> ZkAuthResult<ProofBundle> {
        let canceller = self.canceller();
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Proof generation timed out after {:?}", timeout);
                canceller.cancel();
                Err(ZkAuthError::Cancelled)
            }
        }
    }
}
