//! Tests for the event connector against real Unix sockets

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::path::PathBuf;

    use crate::event::WindowEvent;
    use crate::ipc::{ConnectionState, EventConnector, IpcError};
    use crate::task::AppKey;

    /// Listener in a fresh temp dir, standing in for `.socket2.sock`
    fn listener() -> (tempfile::TempDir, PathBuf, UnixListener) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(".socket2.sock");
        let listener = UnixListener::bind(&path).expect("failed to bind socket");
        (dir, path, listener)
    }

    fn connected() -> (tempfile::TempDir, EventConnector, UnixStream) {
        let (dir, path, listener) = listener();
        let mut connector = EventConnector::new(Some(path));
        assert!(connector.connect().unwrap());
        let (server, _) = listener.accept().unwrap();
        (dir, connector, server)
    }

    #[test]
    fn connect_to_missing_socket_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut connector = EventConnector::new(Some(dir.path().join(".socket2.sock")));
        let result = connector.connect();
        assert!(matches!(result, Err(IpcError::Unavailable(_))));
        assert_eq!(connector.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn connect_without_listener_is_unavailable() {
        let (_dir, path, listener) = listener();
        drop(listener);
        let mut connector = EventConnector::new(Some(path));
        assert!(matches!(connector.connect(), Err(IpcError::Unavailable(_))));
        assert_eq!(connector.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn duplicate_connect_is_suppressed() {
        let (_dir, mut connector, _server) = connected();
        assert_eq!(connector.state(), ConnectionState::Connected);
        assert!(!connector.connect().unwrap());
        assert_eq!(connector.state(), ConnectionState::Connected);
    }

    #[test]
    fn nothing_to_read_is_not_an_error() {
        let (_dir, mut connector, _server) = connected();
        let mut events = Vec::new();
        connector.read_events(&mut events).unwrap();
        assert!(events.is_empty());
        assert_eq!(connector.state(), ConnectionState::Connected);
    }

    #[test]
    fn records_split_across_writes_are_reassembled() {
        let (_dir, mut connector, mut server) = connected();
        let mut events = Vec::new();

        server.write_all(b"openwindow>>abc,1,ki").unwrap();
        connector.read_events(&mut events).unwrap();
        assert!(events.is_empty());

        server.write_all(b"tty,fish\nactivewindow>>kitty,fish\n").unwrap();
        connector.read_events(&mut events).unwrap();
        assert_eq!(
            events,
            vec![
                WindowEvent::Opened {
                    address: "abc".to_string(),
                    key: AppKey::new("kitty").unwrap(),
                },
                WindowEvent::Focused {
                    key: AppKey::new("kitty"),
                },
            ]
        );
    }

    #[test]
    fn malformed_and_unknown_records_are_dropped() {
        let (_dir, mut connector, mut server) = connected();
        server
            .write_all(b"garbage\nworkspace>>3\nopenwindow>>x\ncloseWindow>>abc\nclosewindow>>abc\n")
            .unwrap();
        let mut events = Vec::new();
        connector.read_events(&mut events).unwrap();
        assert_eq!(events, vec![WindowEvent::Closed { address: "abc".to_string() }]);
        assert_eq!(connector.state(), ConnectionState::Connected);
    }

    #[test]
    fn peer_close_disconnects_but_delivers_pending_events() {
        let (_dir, mut connector, mut server) = connected();
        server.write_all(b"closewindow>>abc\n").unwrap();
        drop(server);

        let mut events = Vec::new();
        let result = connector.read_events(&mut events);
        assert!(matches!(result, Err(IpcError::Closed)));
        assert_eq!(events.len(), 1);
        assert_eq!(connector.state(), ConnectionState::Disconnected);
        assert!(connector.stream().is_none());
    }

    #[test]
    fn reconnects_after_loss() {
        let (_dir, path, listener) = listener();
        let mut connector = EventConnector::new(Some(path));
        connector.connect().unwrap();
        let (server, _) = listener.accept().unwrap();
        drop(server);

        let mut events = Vec::new();
        assert!(connector.read_events(&mut events).is_err());

        assert!(connector.connect().unwrap());
        let (mut server, _) = listener.accept().unwrap();
        server.write_all(b"activewindow>>firefox,tab\n").unwrap();
        connector.read_events(&mut events).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn partial_record_discarded_on_reconnect() {
        let (_dir, path, listener) = listener();
        let mut connector = EventConnector::new(Some(path));
        connector.connect().unwrap();
        let (mut server, _) = listener.accept().unwrap();
        server.write_all(b"openwindow>>abc,1,kit").unwrap();
        let mut events = Vec::new();
        connector.read_events(&mut events).unwrap();
        drop(server);
        assert!(connector.read_events(&mut events).is_err());

        connector.connect().unwrap();
        let (mut server, _) = listener.accept().unwrap();
        server.write_all(b"ty,x\n").unwrap();
        connector.read_events(&mut events).unwrap();
        // "ty,x" alone has no separator and is dropped
        assert!(events.is_empty());
    }

    #[test]
    fn read_without_connection_reports_closed() {
        let mut connector = EventConnector::new(None);
        let mut events = Vec::new();
        assert!(matches!(connector.read_events(&mut events), Err(IpcError::Closed)));
    }
}
