//! The bulk-dump session state machine the framer's caller drives message-by-message (spec
//! §4.12: `idle → awaiting_data → closed`).

use log::warn;
use snafu::ensure;

use crate::error::{self, LibResult};
use crate::sysex::message::SysexMessage;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SessionState {
    Idle,
    AwaitingData,
    Closed,
}

/// Tracks session state and the device number an Init opened the session with, so that a
/// mismatched device on a later message can be flagged.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BulkDumpSession {
    state: SessionState,
    device: Option<u8>,
}

impl Default for BulkDumpSession {
    fn default() -> Self {
        Self {
            state: SessionState::Idle,
            device: None,
        }
    }
}

impl BulkDumpSession {
    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    /// Advances the session by one message. Returns an error on a Bulk-Dump received while
    /// `Idle`, or on a device-number mismatch; both conditions are logged regardless of outcome.
    pub(crate) fn transition(&mut self, message: &SysexMessage) -> LibResult<()> {
        match message {
            SysexMessage::Init { device } => {
                self.state = SessionState::AwaitingData;
                self.device = Some(*device);
                Ok(())
            }
            SysexMessage::Close { device } => {
                self.check_device(*device)?;
                self.state = SessionState::Closed;
                Ok(())
            }
            SysexMessage::BulkDump { device, .. } => {
                ensure!(
                    self.state != SessionState::Idle,
                    error::InvalidFile {
                        site: site!(),
                        description: "bulk-dump message received before Init".to_string(),
                    }
                );
                self.check_device(*device)
            }
            SysexMessage::ParameterChange { .. } => Ok(()),
        }
    }

    fn check_device(&self, device: u8) -> LibResult<()> {
        match self.device {
            Some(expected) if expected != device => {
                warn!("device number mismatch: session opened with {}, message carries {}", expected, device);
                error::InvalidFile {
                    site: site!(),
                    description: format!("device number mismatch: expected {}, got {}", expected, device),
                }
                .fail()
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_bulk_dump_then_close_succeeds() {
        let mut session = BulkDumpSession::default();
        session.transition(&SysexMessage::Init { device: 0 }).unwrap();
        assert_eq!(SessionState::AwaitingData, session.state());
        session
            .transition(&SysexMessage::BulkDump {
                device: 0,
                address: crate::sysex::address::Address::header(),
                payload_encoded: vec![],
                checksum: 0,
            })
            .unwrap();
        session.transition(&SysexMessage::Close { device: 0 }).unwrap();
        assert_eq!(SessionState::Closed, session.state());
    }

    #[test]
    fn bulk_dump_before_init_is_an_error() {
        let mut session = BulkDumpSession::default();
        let result = session.transition(&SysexMessage::BulkDump {
            device: 0,
            address: crate::sysex::address::Address::header(),
            payload_encoded: vec![],
            checksum: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn mismatched_device_is_an_error() {
        let mut session = BulkDumpSession::default();
        session.transition(&SysexMessage::Init { device: 0 }).unwrap();
        let result = session.transition(&SysexMessage::BulkDump {
            device: 1,
            address: crate::sysex::address::Address::header(),
            payload_encoded: vec![],
            checksum: 0,
        });
        assert!(result.is_err());
    }
}
