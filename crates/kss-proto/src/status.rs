//! Connectivity and unread-count status, as overwritten by the periodic
//! probes. Last writer wins; a failed probe only parks the value on its
//! failure sentinel until the next tick.

use chrono::{DateTime, Local};

/// Sentinel for "unread count could not be fetched this tick".
pub const UNREAD_FAILED: i64 = -1;

#[derive(Debug, Clone, Default)]
pub struct ConnectivityStatus {
    pub connected: bool,
    /// When the health probe last completed (success or failure).
    pub last_checked: Option<DateTime<Local>>,
}

impl ConnectivityStatus {
    /// Overwrite with the result of one health probe.
    pub fn record(&mut self, connected: bool) {
        self.connected = connected;
        self.last_checked = Some(Local::now());
    }

    /// The unread probe is gated on the connectivity snapshot taken at tick
    /// time: while disconnected, the tick is a no-op and no request leaves
    /// the device.
    pub fn allows_unread_poll(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_overwrites_and_stamps() {
        let mut status = ConnectivityStatus::default();
        assert!(!status.connected);
        assert!(status.last_checked.is_none());

        status.record(true);
        assert!(status.connected);
        assert!(status.last_checked.is_some());
        assert!(status.allows_unread_poll());

        status.record(false);
        assert!(!status.allows_unread_poll());
        assert!(status.last_checked.is_some()); // failure still stamps
    }
}
