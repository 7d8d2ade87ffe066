use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    StartLoading,
    StopLoading,
    ToggleLoading,
    /// The config file changed and still describes a valid tray.
    ConfigReload(Box<Config>),
    /// The config file changed but cannot be used; the reason.
    ConfigInvalid(String),
}
