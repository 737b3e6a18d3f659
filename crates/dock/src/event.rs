//! Window event decoding
//!
//! The event channel delivers newline-delimited records of the form
//! `event>>args`. Only the window lifecycle and focus events matter to the
//! dock; everything else decodes to [`WindowEvent::Unknown`].

use crate::error::DockError;
use crate::task::{normalize_address, AppKey};

/// Separator between the event name and its arguments
const EVENT_SEPARATOR: &str = ">>";

/// Decoded event channel record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowEvent {
    /// `openwindow>>address,workspace,class,title`
    Opened { address: String, key: AppKey },
    /// `closewindow>>address`
    ///
    /// Only carries an opaque address, so it is a reconciliation trigger
    /// rather than a statement about which class stopped running.
    Closed { address: String },
    /// `activewindow>>class,title`. `None` when nothing is focused.
    Focused { key: Option<AppKey> },
    /// `activewindowv2>>address`
    FocusedAddress { address: String },
    /// Well-formed record with an event name the dock ignores
    Unknown { name: String },
}

impl WindowEvent {
    /// Decode one record (without its trailing newline).
    ///
    /// # Errors
    ///
    /// Returns `DockError::Decode` when the record has no separator or a
    /// recognized event is missing required arguments.
    pub fn decode(line: &str) -> Result<Self, DockError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (name, args) = line.split_once(EVENT_SEPARATOR).ok_or_else(|| DockError::Decode {
            what: "event record",
            reason: format!("missing '{EVENT_SEPARATOR}' in {line:?}"),
        })?;

        match name {
            "openwindow" => {
                // Title is last and may itself contain commas
                let mut fields = args.splitn(4, ',');
                let address = fields.next().unwrap_or_default();
                let _workspace = fields.next();
                let class = fields.next().ok_or_else(|| malformed(name, args))?;
                let key = AppKey::new(class).ok_or_else(|| malformed(name, args))?;
                Ok(Self::Opened {
                    address: normalize_address(address),
                    key,
                })
            }
            "closewindow" => {
                let address = args.trim();
                if address.is_empty() {
                    return Err(malformed(name, args));
                }
                Ok(Self::Closed {
                    address: normalize_address(address),
                })
            }
            "activewindow" => {
                let class = args.split(',').next().unwrap_or_default();
                Ok(Self::Focused {
                    key: AppKey::new(class),
                })
            }
            "activewindowv2" => {
                let first = args.split(',').next().unwrap_or_default().trim();
                if looks_like_address(first) {
                    Ok(Self::FocusedAddress {
                        address: normalize_address(first),
                    })
                } else {
                    Ok(Self::Focused {
                        key: AppKey::new(first),
                    })
                }
            }
            other => Ok(Self::Unknown {
                name: other.to_string(),
            }),
        }
    }

    /// Whether applying this event should be followed by a fresh snapshot
    pub fn needs_snapshot(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

fn malformed(name: &str, args: &str) -> DockError {
    DockError::Decode {
        what: "event arguments",
        reason: format!("{name}>>{args:?}"),
    }
}

/// Window addresses are printed as bare hex (`55d0c7a1b2c0`) or with a `0x` prefix.
fn looks_like_address(value: &str) -> bool {
    if value.starts_with("0x") || value.starts_with("0X") {
        return value.len() > 2 && value[2..].chars().all(|c| c.is_ascii_hexdigit());
    }
    value.len() >= 8 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(class: &str) -> AppKey {
        AppKey::new(class).unwrap()
    }

    #[test]
    fn decode_openwindow() {
        let event = WindowEvent::decode("openwindow>>55d0c7a1b2c0,1,kitty,~/code").unwrap();
        assert_eq!(
            event,
            WindowEvent::Opened {
                address: "55d0c7a1b2c0".to_string(),
                key: key("kitty"),
            }
        );
    }

    #[test]
    fn decode_openwindow_title_with_commas() {
        let event =
            WindowEvent::decode("openwindow>>abc,2,Firefox,Inbox, 3 unread, Mail").unwrap();
        assert!(matches!(event, WindowEvent::Opened { key: k, .. } if k.as_str() == "firefox"));
    }

    #[test]
    fn decode_openwindow_without_class_is_rejected() {
        assert!(WindowEvent::decode("openwindow>>abc,2").is_err());
        assert!(WindowEvent::decode("openwindow>>abc,2,,title").is_err());
    }

    #[test]
    fn decode_closewindow() {
        let event = WindowEvent::decode("closewindow>>55d0c7a1b2c0").unwrap();
        assert_eq!(
            event,
            WindowEvent::Closed {
                address: "55d0c7a1b2c0".to_string()
            }
        );
        assert!(event.needs_snapshot());
        assert!(WindowEvent::decode("closewindow>>").is_err());
    }

    #[test]
    fn decode_activewindow() {
        let event = WindowEvent::decode("activewindow>>kitty,fish ~").unwrap();
        assert_eq!(event, WindowEvent::Focused { key: Some(key("kitty")) });
    }

    #[test]
    fn decode_activewindow_empty_means_nothing_focused() {
        let event = WindowEvent::decode("activewindow>>,").unwrap();
        assert_eq!(event, WindowEvent::Focused { key: None });
        let event = WindowEvent::decode("activewindowv2>>").unwrap();
        assert_eq!(event, WindowEvent::Focused { key: None });
    }

    #[test]
    fn decode_activewindowv2_address() {
        let event = WindowEvent::decode("activewindowv2>>55d0c7a1b2c0").unwrap();
        assert_eq!(
            event,
            WindowEvent::FocusedAddress {
                address: "55d0c7a1b2c0".to_string()
            }
        );
    }

    #[test]
    fn decode_activewindowv2_class() {
        let event = WindowEvent::decode("activewindowv2>>kitty,fish").unwrap();
        assert_eq!(event, WindowEvent::Focused { key: Some(key("kitty")) });
    }

    #[test]
    fn decode_unknown_event() {
        let event = WindowEvent::decode("workspace>>2").unwrap();
        assert_eq!(event, WindowEvent::Unknown { name: "workspace".to_string() });
        assert!(!event.needs_snapshot());
    }

    #[test]
    fn decode_garbage_is_an_error() {
        assert!(WindowEvent::decode("not an event").is_err());
        assert!(WindowEvent::decode("").is_err());
    }

    #[test]
    fn decode_strips_carriage_return() {
        let event = WindowEvent::decode("closewindow>>abc\r").unwrap();
        assert_eq!(event, WindowEvent::Closed { address: "abc".to_string() });
    }
}
