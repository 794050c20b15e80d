// Copyright 2025 the Overlook Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transient presentation: views that only exist while presented on a host.

use core::time::Duration;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Instant;

use kurbo::{Point, Rect, Size};

use crate::view::View;

/// Size of the throwaway host window presentations are attached to.
pub const HOST_WINDOW_SIZE: Size = Size::new(375.0, 667.0);

/// A throwaway top-level container for a presentation.
#[derive(Clone, Debug)]
pub struct HostWindow {
    frame: Rect,
    key: bool,
}

impl HostWindow {
    /// Creates a hidden window of `size`.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            frame: Rect::from_origin_size(Point::ORIGIN, size),
            key: false,
        }
    }

    /// The window's frame.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Makes the window the key window and shows it.
    pub fn make_key_and_visible(&mut self) {
        self.key = true;
    }

    /// Returns `true` once [`make_key_and_visible`](Self::make_key_and_visible) was called.
    #[must_use]
    pub fn is_key(&self) -> bool {
        self.key
    }
}

/// One-shot signal that a presentation finished.
///
/// `Completion` is `Send`, so toolkits may fire it from their own thread.
#[derive(Debug)]
pub struct Completion {
    sender: Sender<()>,
}

impl Completion {
    /// Signals that the presentation is on screen.
    pub fn fulfill(self) {
        // The harness may already have given up waiting.
        let _ = self.sender.send(());
    }
}

/// A view that is shown by presenting it on a host window.
pub trait Presentable: View {
    /// Presents `self` on `host`, calling [`Completion::fulfill`] once done.
    fn present(&mut self, host: &mut HostWindow, completion: Completion);

    /// Delivers pending toolkit events.
    ///
    /// Called repeatedly while the harness waits for the completion, for
    /// toolkits that fire it from their own event loop.
    fn pump_events(&mut self) {}
}

/// How a presentation wait ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum WaitOutcome {
    Presented,
    TimedOut,
    /// The completion was dropped without firing.
    Abandoned,
}

#[derive(Debug)]
pub(crate) struct PendingPresentation {
    receiver: Receiver<()>,
}

pub(crate) fn completion() -> (Completion, PendingPresentation) {
    let (sender, receiver) = mpsc::channel();
    (Completion { sender }, PendingPresentation { receiver })
}

impl PendingPresentation {
    /// Blocks until the completion fires or `timeout` elapses, calling `pump`
    /// at least every `pump_interval`.
    pub(crate) fn wait(
        &self,
        timeout: Duration,
        pump_interval: Duration,
        mut pump: impl FnMut(),
    ) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        loop {
            pump();
            let now = Instant::now();
            if now >= deadline {
                return match self.receiver.try_recv() {
                    Ok(()) => WaitOutcome::Presented,
                    Err(TryRecvError::Empty) => WaitOutcome::TimedOut,
                    Err(TryRecvError::Disconnected) => WaitOutcome::Abandoned,
                };
            }
            let step = (deadline - now).min(pump_interval);
            match self.receiver.recv_timeout(step) {
                Ok(()) => return WaitOutcome::Presented,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return WaitOutcome::Abandoned,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SHORT: Duration = Duration::from_millis(50);
    const PUMP: Duration = Duration::from_millis(5);

    #[test]
    fn host_window_starts_hidden() {
        let mut host = HostWindow::new(HOST_WINDOW_SIZE);
        assert!(!host.is_key());
        host.make_key_and_visible();
        assert!(host.is_key());
        assert_eq!(host.frame(), Rect::new(0.0, 0.0, 375.0, 667.0));
    }

    #[test]
    fn synchronous_completion() {
        let (completion, pending) = completion();
        completion.fulfill();
        assert_eq!(pending.wait(SHORT, PUMP, || {}), WaitOutcome::Presented);
    }

    #[test]
    fn completion_from_another_thread() {
        let (completion, pending) = completion();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            completion.fulfill();
        });
        assert_eq!(
            pending.wait(Duration::from_secs(2), PUMP, || {}),
            WaitOutcome::Presented
        );
        handle.join().unwrap();
    }

    #[test]
    fn completion_from_event_pump() {
        let (completion, pending) = completion();
        let mut completion = Some(completion);
        let mut pumps = 0;
        let outcome = pending.wait(Duration::from_secs(2), PUMP, || {
            pumps += 1;
            if pumps == 3
                && let Some(completion) = completion.take()
            {
                completion.fulfill();
            }
        });
        assert_eq!(outcome, WaitOutcome::Presented);
        assert!(pumps >= 3);
    }

    #[test]
    fn never_fired_times_out() {
        let (completion, pending) = completion();
        let started = Instant::now();
        assert_eq!(pending.wait(SHORT, PUMP, || {}), WaitOutcome::TimedOut);
        assert!(started.elapsed() >= SHORT);
        drop(completion);
    }

    #[test]
    fn dropped_completion_is_abandoned() {
        let (completion, pending) = completion();
        drop(completion);
        assert_eq!(pending.wait(SHORT, PUMP, || {}), WaitOutcome::Abandoned);
    }
}
