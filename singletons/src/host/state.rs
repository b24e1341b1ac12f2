/// Enumeration of possible states the host can be in.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum State {
    /// The host has never been started. Authoring and editing happen here.
    #[default]
    Dead,
    /// The host is starting up
    Starting,
    /// The host is running in normal operation
    Running,
    /// The host is shutting down
    Stopping,
    /// The host has stopped
    Stopped,
}

impl State {
    /// Only a running host dispatches singleton initialization.
    #[inline]
    pub fn is_running(&self) -> bool {
        *self == State::Running
    }
}
