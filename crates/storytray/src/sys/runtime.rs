use crate::config::{self, Config, ConfigLoader};
use crate::events::AppEvent;
use crate::sys::server;
use async_channel::Sender;
use std::thread::{self, JoinHandle};

/// Runs the control socket and the config watcher on a current-thread Tokio
/// runtime in a thread of their own, leaving the main thread to GTK.
///
/// `current` is the config the tray was built from; only changes against it
/// are forwarded.
pub fn spawn_services(
    loader: ConfigLoader,
    current: Config,
    tx: Sender<AppEvent>,
) -> std::io::Result<JoinHandle<()>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("storytray-services".into())
        .spawn(move || {
            rt.block_on(async move {
                let control = server::run_server(tx.clone());
                let reload = async move {
                    if let Err(e) = config::watch(loader, current, tx).await {
                        log::error!("Config reload disabled: {}", e);
                    }
                };
                tokio::join!(control, reload);
            });
        })
}
