//! Event loop wiring
//!
//! Registers the periodic snapshot timer, the event channel and its retry
//! timer, and SIGINT/SIGTERM handling with a calloop event loop. Callbacks
//! only record what happened; connection attempts, retry scheduling and
//! shutdown run in [`DockLoop::maintain`] between dispatches.

use std::os::unix::net::UnixStream;
use std::time::Duration;

use calloop::generic::Generic;
use calloop::signals::{Signal, Signals};
use calloop::timer::{TimeoutAction, Timer};
use calloop::{EventLoop, Interest, LoopHandle, LoopSignal, Mode, PostAction, RegistrationToken};

use crate::dock::Dock;
use crate::ipc::EventConnector;

/// Event loop state
pub struct DockLoop {
    pub dock: Dock,
    connector: EventConnector,
    handle: LoopHandle<'static, DockLoop>,
    signal: LoopSignal,
    retry_interval: Duration,

    snapshot_token: Option<RegistrationToken>,
    retry_token: Option<RegistrationToken>,
    event_token: Option<RegistrationToken>,

    /// Event channel lost or never opened; schedule a retry
    needs_retry: bool,
    /// Retry timer fired; attempt a connection
    connect_due: bool,
    /// Dock view changed since last reported
    dirty: bool,
    /// Shutdown requested; late callbacks do nothing
    shutting_down: bool,
}

impl DockLoop {
    /// Loop state for a started dock, with the snapshot timer registered.
    ///
    /// The first connection attempt happens on the first [`DockLoop::maintain`].
    pub fn new(dock: Dock, event_loop: &EventLoop<'static, DockLoop>) -> anyhow::Result<Self> {
        let handle = event_loop.handle();
        let config = dock.config();
        let snapshot_token = setup_snapshot_timer(&handle, config.snapshot_interval())?;
        Ok(Self {
            connector: EventConnector::new(config.event_socket.clone()),
            retry_interval: config.retry_interval(),
            dock,
            handle,
            signal: event_loop.get_signal(),
            snapshot_token: Some(snapshot_token),
            retry_token: None,
            event_token: None,
            needs_retry: false,
            connect_due: true,
            dirty: true,
            shutting_down: false,
        })
    }

    /// Process work queued by callbacks. Called once per loop iteration.
    pub fn maintain(&mut self) {
        if self.shutting_down {
            self.shutdown();
            return;
        }
        if self.connect_due {
            self.connect_due = false;
            self.try_connect();
        }
        if self.needs_retry {
            self.needs_retry = false;
            self.schedule_retry();
        }
        if self.dirty {
            self.dirty = false;
            log_view(&self.dock);
        }
    }

    /// Attempt to open the event channel and register it with the loop.
    fn try_connect(&mut self) {
        match self.connector.connect() {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                tracing::debug!(error = %e, "event channel not available yet");
                self.needs_retry = true;
                return;
            }
        }

        let stream = match self.connector.stream().map(UnixStream::try_clone) {
            Some(Ok(stream)) => stream,
            Some(Err(e)) => {
                tracing::warn!(error = ?e, "failed to clone event stream");
                self.connector.disconnect();
                self.needs_retry = true;
                return;
            }
            None => return,
        };

        match self.handle.insert_source(
            Generic::new(stream, Interest::READ, Mode::Level),
            |_, _, state: &mut DockLoop| Ok(state.on_readable()),
        ) {
            Ok(token) => {
                self.event_token = Some(token);
                // Events were missed while disconnected
                self.dirty |= self.dock.poll_snapshot();
            }
            Err(e) => {
                tracing::error!(error = %e.error, "failed to register event channel");
                self.connector.disconnect();
                self.needs_retry = true;
            }
        }
    }

    fn on_readable(&mut self) -> PostAction {
        if self.shutting_down {
            return PostAction::Remove;
        }
        let mut events = Vec::new();
        let result = self.connector.read_events(&mut events);
        if !events.is_empty() {
            self.dirty |= self.dock.apply_events(&events);
        }
        match result {
            Ok(()) => PostAction::Continue,
            Err(e) => {
                tracing::info!(error = %e, retry = ?self.retry_interval, "event channel down, retrying");
                self.event_token = None;
                self.needs_retry = true;
                PostAction::Remove
            }
        }
    }

    /// Arm the retry timer unless one is already pending.
    fn schedule_retry(&mut self) {
        if self.retry_token.is_some() || self.shutting_down {
            return;
        }
        let timer = Timer::from_duration(self.retry_interval);
        match self.handle.insert_source(timer, |_, _, state: &mut DockLoop| {
            state.retry_token = None;
            if !state.shutting_down {
                state.connect_due = true;
            }
            TimeoutAction::Drop
        }) {
            Ok(token) => self.retry_token = Some(token),
            Err(e) => tracing::error!(error = %e.error, "failed to schedule event channel retry"),
        }
    }

    /// Stop after the current iteration. Callbacks that still fire do nothing.
    pub fn request_shutdown(&mut self) {
        self.shutting_down = true;
    }

    /// Remove every source this loop registered.
    fn shutdown(&mut self) {
        for token in [
            self.snapshot_token.take(),
            self.retry_token.take(),
            self.event_token.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.handle.remove(token);
        }
        self.connector.disconnect();
        self.signal.stop();
    }
}

fn log_view(dock: &Dock) {
    let view = dock.view();
    let visible: Vec<&str> = view.visible.iter().map(|t| t.key.as_str()).collect();
    let focused = view.visible.iter().find(|t| t.focused).map(|t| t.key.as_str());
    tracing::info!(
        ?visible,
        hidden = view.hidden.len(),
        page = view.page,
        pages = view.page_count,
        ?focused,
        "dock updated"
    );
}

/// Insert the periodic snapshot timer.
pub fn setup_snapshot_timer(
    handle: &LoopHandle<'static, DockLoop>,
    interval: Duration,
) -> anyhow::Result<RegistrationToken> {
    handle
        .insert_source(Timer::from_duration(interval), move |_, _, state| {
            if state.shutting_down {
                return TimeoutAction::Drop;
            }
            state.dirty |= state.dock.poll_snapshot();
            TimeoutAction::ToDuration(interval)
        })
        .map_err(|e| anyhow::anyhow!("Failed to insert snapshot timer: {e:?}"))
}

/// Insert SIGINT/SIGTERM handling that requests an orderly shutdown.
pub fn setup_signals(handle: &LoopHandle<'static, DockLoop>) -> anyhow::Result<RegistrationToken> {
    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])
        .map_err(|e| anyhow::anyhow!("Failed to create signal source: {e:?}"))?;
    handle
        .insert_source(signals, |event, _, state| {
            tracing::info!(signal = ?event.signal(), "shutting down");
            state.request_shutdown();
        })
        .map_err(|e| anyhow::anyhow!("Failed to insert signal source: {e:?}"))
}

/// Start the dock and run its event loop until a shutdown signal arrives.
pub fn run(mut dock: Dock) -> anyhow::Result<()> {
    let mut event_loop: EventLoop<'static, DockLoop> = EventLoop::try_new()
        .map_err(|e| anyhow::anyhow!("Failed to create event loop: {e:?}"))?;

    dock.start();
    let mut state = DockLoop::new(dock, &event_loop)?;
    setup_signals(&event_loop.handle())?;
    state.maintain();

    tracing::info!(
        snapshot_interval = ?state.dock.config().snapshot_interval(),
        retry_interval = ?state.retry_interval,
        "event loop running"
    );
    event_loop
        .run(None, &mut state, DockLoop::maintain)
        .map_err(|e| anyhow::anyhow!("Event loop failed: {e:?}"))?;

    tracing::info!("dock stopped");
    Ok(())
}
