use anyhow::{anyhow, Result};
use futures::channel::oneshot;

/// A value being produced on a worker thread.
///
/// The host polls it between frames; the result is handed over exactly once.
pub struct PendingAsset<T> {
    label: String,
    receiver: Option<oneshot::Receiver<Result<T>>>,
}

impl<T: Send + 'static> PendingAsset<T> {
    /// Run `load` on a named worker thread
    pub fn spawn<F>(label: impl Into<String>, load: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = oneshot::channel();

        let spawned = std::thread::Builder::new()
            .name(format!("load {}", label))
            .spawn(move || {
                // Receiver gone means the host shut down first
                let _ = sender.send(load());
            });
        if let Err(e) = spawned {
            // The sender was dropped with the closure, so poll() reports the failure
            log::warn!("Could not start loader thread for {}: {}", label, e);
        }

        Self {
            label,
            receiver: Some(receiver),
        }
    }

    /// An already-resolved load
    pub fn ready(label: impl Into<String>, result: Result<T>) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(result);
        Self {
            label: label.into(),
            receiver: Some(receiver),
        }
    }
}

impl<T> PendingAsset<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// True until the result has been taken
    pub fn is_pending(&self) -> bool {
        self.receiver.is_some()
    }

    /// Non-blocking check. Yields the result once; later calls return `None`.
    pub fn poll(&mut self) -> Option<Result<T>> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(Some(result)) => {
                self.receiver = None;
                Some(result)
            }
            Ok(None) => None,
            Err(oneshot::Canceled) => {
                self.receiver = None;
                Some(Err(anyhow!("Load of {} ended without a result", self.label)))
            }
        }
    }

    /// Wait for the result
    pub async fn wait(mut self) -> Result<T> {
        let receiver = self
            .receiver
            .take()
            .ok_or_else(|| anyhow!("Load of {} was already taken", self.label))?;
        receiver
            .await
            .map_err(|_| anyhow!("Load of {} ended without a result", self.label))?
    }
}
