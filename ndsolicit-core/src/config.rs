//! Transport configuration

use std::time::Duration;

/// Options applied to every raw socket the transport opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Upper bound on the blocking write; `None` leaves the OS default
    pub write_timeout: Option<Duration>,
    /// Bind the socket to the interface by name (Linux `SO_BINDTODEVICE`)
    pub bind_device: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            write_timeout: None,
            bind_device: true,
        }
    }
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the write timeout from milliseconds; zero disables it
    pub fn with_timeout_ms(mut self, millis: u64) -> Self {
        self.write_timeout = match millis {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        self
    }

    pub fn with_bind_device(mut self, bind: bool) -> Self {
        self.bind_device = bind;
        self
    }
}
