//! Background loads that report back exactly once

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::error::{Result, ViewerError};

/// Handle to a load running on a background thread.
///
/// The result is delivered through [`LoadHandle::poll`] at most once: after
/// the success or failure has been handed out, the handle is finished and
/// further polls return `None`.
pub struct LoadHandle<T> {
    label: String,
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> std::fmt::Debug for LoadHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadHandle")
            .field("label", &self.label)
            .field("finished", &self.receiver.is_none())
            .finish()
    }
}

impl<T: Send + 'static> LoadHandle<T> {
    /// Run `job` on a named background thread
    pub fn spawn<F>(label: impl Into<String>, job: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let label = label.into();
        let (sender, receiver) = mpsc::channel();
        let thread_sender = sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("load:{label}"))
            .spawn(move || {
                // The receiver may already be gone if the viewer shut down
                let _ = thread_sender.send(job());
            });
        if let Err(e) = spawned {
            let _ = sender.send(Err(ViewerError::Io(e)));
        }

        Self {
            label,
            receiver: Some(receiver),
        }
    }

    /// A handle whose result is already known
    pub fn ready(label: impl Into<String>, result: Result<T>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(result);
        Self {
            label: label.into(),
            receiver: Some(receiver),
        }
    }
}

impl<T> LoadHandle<T> {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }

    /// Non-blocking check for the result
    pub fn poll(&mut self) -> Option<Result<T>> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ViewerError::Disconnected),
        };
        self.receiver = None;
        Some(outcome)
    }

    /// Block until the result arrives
    pub fn wait(mut self) -> Result<T> {
        match self.receiver.take() {
            Some(receiver) => receiver.recv().unwrap_or(Err(ViewerError::Disconnected)),
            None => Err(ViewerError::Disconnected),
        }
    }
}
