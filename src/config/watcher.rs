//! Routing file watcher for hot reload.
//!
//! The watcher only reports that something changed. Loading happens on
//! the reload controller's task so reload attempts stay serialized.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::reload::ReloadTrigger;

/// Watches the routing file and forwards change notifications.
pub struct ConfigWatcher {
    path: PathBuf,
    trigger_tx: mpsc::UnboundedSender<ReloadTrigger>,
}

impl ConfigWatcher {
    pub fn new(path: &Path, trigger_tx: mpsc::UnboundedSender<ReloadTrigger>) -> Self {
        Self {
            path: path.to_path_buf(),
            trigger_tx,
        }
    }

    /// Start watching on notify's background thread.
    ///
    /// The parent directory is watched rather than the file so that
    /// editors replacing the file through a rename are still seen. The
    /// returned watcher must be kept alive; dropping it stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let watch_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|name| name.to_os_string());
        let tx = self.trigger_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if let Some(path) = relevant_path(&event, file_name.as_ref()) {
                        tracing::info!(path = %path.display(), kind = ?event.kind, "Config file change detected");
                        // Receiver gone means the controller has shut down.
                        let _ = tx.send(ReloadTrigger::FileChanged { path });
                    }
                }
                Err(e) => tracing::error!(error = %e, "Watch error"),
            },
            Config::default(),
        )?;

        watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), dir = %watch_dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// The path of the routing file if `event` is a write or create touching it.
fn relevant_path(event: &Event, file_name: Option<&OsString>) -> Option<PathBuf> {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return None;
    }

    event
        .paths
        .iter()
        .find(|path| match file_name {
            Some(name) => path.file_name() == Some(name.as_os_str()),
            None => true,
        })
        .cloned()
}
