//! Tokio runtime driver.
//!
//! Runs the two schedules a [`FocusEngine`] needs as independent tasks on the
//! current thread: the capture loop at ~30 fps and the 1 Hz tick. Each task has
//! its own child [`CancellationToken`] so either can be stopped alone.
//!
//! The engine holds non-`Send` camera and detector handles, so the driver must
//! be spawned inside a [`tokio::task::LocalSet`].

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::engine::FocusEngine;
use crate::events::Event;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct EngineDriver {
    engine: Rc<RefCell<FocusEngine>>,
    clock: Rc<dyn Clock>,
    events: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    frame_cancel: CancellationToken,
    tick_cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl EngineDriver {
    /// Spawn both loops on the current `LocalSet`.
    ///
    /// Events from every schedule and from [`EngineDriver::dispatch`] arrive on
    /// the returned receiver in the order they were produced.
    pub fn spawn(
        engine: FocusEngine,
        clock: impl Clock + 'static,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let engine = Rc::new(RefCell::new(engine));
        let clock: Rc<dyn Clock> = Rc::new(clock);
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let frame_cancel = cancel.child_token();
        let tick_cancel = cancel.child_token();

        let handles = vec![
            tokio::task::spawn_local(frame_loop(
                engine.clone(),
                clock.clone(),
                tx.clone(),
                frame_cancel.clone(),
            )),
            tokio::task::spawn_local(tick_loop(
                engine.clone(),
                clock.clone(),
                tx.clone(),
                tick_cancel.clone(),
            )),
        ];
        info!("engine driver started");

        let driver = Self {
            engine,
            clock,
            events: tx,
            cancel,
            frame_cancel,
            tick_cancel,
            handles,
        };
        (driver, rx)
    }

    pub fn engine(&self) -> Rc<RefCell<FocusEngine>> {
        self.engine.clone()
    }

    /// Run an engine operation at the current time and forward its events.
    pub fn dispatch<F>(&self, op: F)
    where
        F: FnOnce(&mut FocusEngine, u64) -> Vec<Event>,
    {
        let now = self.clock.now_ms();
        let events = op(&mut self.engine.borrow_mut(), now);
        forward(&self.events, events);
    }

    /// Stop the capture loop; ticks keep running.
    pub fn stop_frames(&self) {
        self.frame_cancel.cancel();
    }

    /// Stop the 1 Hz tick; frames keep running.
    pub fn stop_ticks(&self) {
        self.tick_cancel.cancel();
    }

    /// Cancel both loops and wait for them to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for handle in std::mem::take(&mut self.handles) {
            if let Err(err) = handle.await {
                warn!("engine task ended abnormally: {err}");
            }
        }
        info!("engine driver stopped");
    }
}

impl Drop for EngineDriver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn frame_loop(
    engine: Rc<RefCell<FocusEngine>>,
    clock: Rc<dyn Clock>,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = engine.borrow_mut().on_frame(clock.now_ms());
                forward(&tx, events);
            }
            _ = cancel.cancelled() => {
                debug!("frame loop shutting down");
                break;
            }
        }
    }
}

async fn tick_loop(
    engine: Rc<RefCell<FocusEngine>>,
    clock: Rc<dyn Clock>,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = engine.borrow_mut().tick(clock.now_ms());
                forward(&tx, events);
            }
            _ = cancel.cancelled() => {
                debug!("tick loop shutting down");
                break;
            }
        }
    }
}

fn forward(tx: &mpsc::UnboundedSender<Event>, events: Vec<Event>) {
    for event in events {
        if tx.send(event).is_err() {
            debug!("event receiver dropped, discarding events");
            return;
        }
    }
}
