//! Imperative spin engine
//!
//! Owns one snapshot, one persistent RNG and a listener list. Every state
//! change swaps in a fresh `Rc<SpinState>`, so holders of an old snapshot can
//! detect updates with `Rc::ptr_eq`.
//!
//! Single-threaded by construction (`Rc`/`RefCell`); the caller drives time
//! through `tick`.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll, Waker};

use serde::{Deserialize, Serialize};

use crate::config::{SpinConfig, SpinOverrides};
use crate::error::{Result, SpinError};
use crate::rng::SpinRng;
use crate::spin::{Segment, SpinPhase, SpinPlan, SpinState, begin_spin, plan_spin, step};

/// Lifecycle notification kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpinEventKind {
    SpinStarted,
    SpinProgress,
    SpinCompleted,
    SpinReset,
    Disposed,
}

impl SpinEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinEventKind::SpinStarted => "spin-started",
            SpinEventKind::SpinProgress => "spin-progress",
            SpinEventKind::SpinCompleted => "spin-completed",
            SpinEventKind::SpinReset => "spin-reset",
            SpinEventKind::Disposed => "disposed",
        }
    }
}

/// A notification carrying the snapshot that became current
#[derive(Debug, Clone)]
pub struct SpinEvent<T = ()> {
    pub kind: SpinEventKind,
    pub state: Rc<SpinState<T>>,
}

type Listener<T> = Rc<RefCell<dyn FnMut(&SpinEvent<T>)>>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            listeners: Vec::new(),
        }
    }
}

/// Handle returned by [`SpinEngine::subscribe`].
///
/// Dropping it keeps the listener registered; call `unsubscribe` to remove it.
pub struct Subscription<T = ()> {
    id: u64,
    registry: Weak<RefCell<Registry<T>>>,
}

impl<T> Subscription<T> {
    /// Remove exactly this registration. Returns false if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|(id, _)| *id != self.id);
        registry.listeners.len() != before
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CompletionStatus {
    Pending,
    Completed,
    Abandoned,
}

struct CompletionSlot {
    plan: SpinPlan,
    status: CompletionStatus,
    waker: Option<Waker>,
}

impl CompletionSlot {
    fn settle(&mut self, status: CompletionStatus) {
        self.status = status;
        if let Some(waker) = self.waker.take() {
            waker.wake();
        }
    }
}

/// Resolves with the plan once the engine emits `spin-completed`.
///
/// Resolution happens inside a later `tick`; a reset or dispose first makes
/// it resolve with [`SpinError::Abandoned`].
pub struct SpinCompletion {
    slot: Rc<RefCell<CompletionSlot>>,
}

impl SpinCompletion {
    /// The plan this handle waits on
    pub fn plan(&self) -> SpinPlan {
        self.slot.borrow().plan
    }

    pub fn is_complete(&self) -> bool {
        self.slot.borrow().status == CompletionStatus::Completed
    }

    /// Non-blocking check: `None` while the spin is still running
    pub fn try_result(&self) -> Option<Result<SpinPlan>> {
        let slot = self.slot.borrow();
        match slot.status {
            CompletionStatus::Pending => None,
            CompletionStatus::Completed => Some(Ok(slot.plan)),
            CompletionStatus::Abandoned => Some(Err(SpinError::Abandoned)),
        }
    }
}

impl Future for SpinCompletion {
    type Output = Result<SpinPlan>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.try_result() {
            Some(result) => Poll::Ready(result),
            None => {
                self.slot.borrow_mut().waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

impl fmt::Debug for SpinCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("SpinCompletion")
            .field("plan", &slot.plan)
            .field("status", &slot.status)
            .finish()
    }
}

/// Stateful spin timeline with lifecycle events
pub struct SpinEngine<T = ()> {
    /// Private copy; callers only change it through engine methods
    config: SpinConfig<T>,
    state: Rc<SpinState<T>>,
    /// Resolved once at construction, never reseeded
    rng: SpinRng,
    registry: Rc<RefCell<Registry<T>>>,
    pending: Vec<Rc<RefCell<CompletionSlot>>>,
    disposed: bool,
}

impl<T: Clone> SpinEngine<T> {
    /// Validate the config and resolve the generator from its seed (or entropy)
    pub fn new(config: SpinConfig<T>) -> Result<Self> {
        let rng = SpinRng::resolve(config.seed.as_ref());
        Self::with_random_source(config, rng)
    }

    /// Use a caller-supplied generator instead of the config seed
    pub fn with_random_source(config: SpinConfig<T>, rng: SpinRng) -> Result<Self> {
        config.validate()?;
        let state = SpinState::new(config.start_angle, config.segments.clone());
        log::debug!(
            "Spin engine created ({} segments, {:?} rng)",
            config.segments.len(),
            rng
        );
        Ok(Self {
            config,
            state: Rc::new(state),
            rng,
            registry: Rc::new(RefCell::new(Registry::new())),
            pending: Vec::new(),
            disposed: false,
        })
    }

    /// Plan and start a spin.
    ///
    /// Re-spinning mid-animation replaces the plan; completion handles of the
    /// replaced spin settle as [`SpinError::Abandoned`].
    pub fn spin(&mut self, overrides: SpinOverrides) -> Result<SpinPlan> {
        if self.disposed {
            return Err(SpinError::Disposed);
        }
        let plan = plan_spin(&self.state, &self.config, &overrides, &mut self.rng)?;
        let mut next = begin_spin(&self.state, &plan);
        if next.options.is_empty() {
            // Planned against the config list; keep the winner resolvable
            next.options = self.config.segments.clone();
        }
        self.settle_pending(CompletionStatus::Abandoned);
        log::debug!(
            "Spin started: winner {} in {} ms ({} rotations)",
            plan.winning_index,
            plan.duration_ms,
            plan.rotations
        );
        self.replace_state(next);
        self.emit(SpinEventKind::SpinStarted);
        Ok(plan)
    }

    /// Spin so that `index` wins
    pub fn stop_at(&mut self, index: usize) -> Result<SpinPlan> {
        self.spin(SpinOverrides::target_index(index))
    }

    /// Like [`spin`](Self::spin), plus a handle that resolves on completion
    pub fn spin_with_completion(&mut self, overrides: SpinOverrides) -> Result<SpinCompletion> {
        let plan = self.spin(overrides)?;
        let slot = Rc::new(RefCell::new(CompletionSlot {
            plan,
            status: CompletionStatus::Pending,
            waker: None,
        }));
        self.pending.push(Rc::clone(&slot));
        Ok(SpinCompletion { slot })
    }

    pub fn stop_at_with_completion(&mut self, index: usize) -> Result<SpinCompletion> {
        self.spin_with_completion(SpinOverrides::target_index(index))
    }

    /// Advance the active spin by `delta_ms`.
    ///
    /// After dispose, or when nothing is spinning toward a target, returns the
    /// current snapshot untouched and emits nothing.
    pub fn tick(&mut self, delta_ms: f64) -> Rc<SpinState<T>> {
        if self.disposed
            || self.state.phase != SpinPhase::Spinning
            || self.state.target_angle.is_none()
        {
            return Rc::clone(&self.state);
        }

        let next = step(&self.state, &self.config, delta_ms);
        let completed = next.phase == SpinPhase::Stopped;
        log::trace!(
            "Tick +{} ms: angle {:.2}, elapsed {:.1}/{:.1}",
            delta_ms,
            next.angle,
            next.elapsed_ms,
            next.duration_ms
        );
        self.replace_state(next);
        self.emit(SpinEventKind::SpinProgress);

        if completed {
            log::debug!(
                "Spin completed: winner {:?} at {:.2}",
                self.state.winning_index,
                self.state.angle
            );
            self.emit(SpinEventKind::SpinCompleted);
            self.settle_pending(CompletionStatus::Completed);
        }

        Rc::clone(&self.state)
    }

    /// Back to idle at the start angle, keeping the current options
    pub fn reset(&mut self) -> Result<()> {
        if self.disposed {
            return Err(SpinError::Disposed);
        }
        let options = self.state.options.clone();
        self.replace_state(SpinState::new(self.config.start_angle, options));
        self.settle_pending(CompletionStatus::Abandoned);
        log::debug!("Spin reset");
        self.emit(SpinEventKind::SpinReset);
        Ok(())
    }

    /// Replace the option list in both the config copy and the snapshot
    pub fn set_options(&mut self, options: Vec<Segment<T>>) -> Result<()> {
        if self.disposed {
            return Err(SpinError::Disposed);
        }
        if options.is_empty() {
            return Err(SpinError::EmptySegments);
        }
        self.config.segments = options.clone();
        let next = SpinState {
            options,
            ..SpinState::clone(&self.state)
        };
        self.replace_state(next);
        Ok(())
    }

    /// Current snapshot
    pub fn state(&self) -> Rc<SpinState<T>> {
        Rc::clone(&self.state)
    }

    /// Replace the snapshot wholesale (external synchronization)
    pub fn set_state(&mut self, next: impl Into<Rc<SpinState<T>>>) {
        self.state = next.into();
    }

    /// Segment chosen by the current plan, if any
    pub fn winning_segment(&self) -> Option<&Segment<T>> {
        self.state.winning_segment()
    }

    pub fn config(&self) -> &SpinConfig<T> {
        &self.config
    }

    /// Register a listener for every lifecycle event
    pub fn subscribe(&self, listener: impl FnMut(&SpinEvent<T>) + 'static) -> Subscription<T> {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener<T> = Rc::new(RefCell::new(listener));
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Tear down: notify current listeners once, then go silent. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        let listeners = std::mem::take(&mut self.registry.borrow_mut().listeners);
        if !self.pending.is_empty() {
            log::warn!(
                "Disposing with {} spin completion(s) still pending",
                self.pending.len()
            );
        }
        self.settle_pending(CompletionStatus::Abandoned);
        log::debug!("Spin engine disposed ({} listeners)", listeners.len());

        let event = SpinEvent {
            kind: SpinEventKind::Disposed,
            state: Rc::clone(&self.state),
        };
        for (_, listener) in listeners {
            let mut callback = listener.borrow_mut();
            (*callback)(&event);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn replace_state(&mut self, next: SpinState<T>) {
        self.state = Rc::new(next);
    }

    fn emit(&self, kind: SpinEventKind) {
        if self.disposed {
            return;
        }
        let event = SpinEvent {
            kind,
            state: Rc::clone(&self.state),
        };
        // Snapshot the list so listeners may unsubscribe while being called
        let listeners: Vec<Listener<T>> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            let mut callback = listener.borrow_mut();
            (*callback)(&event);
        }
    }

    fn settle_pending(&mut self, status: CompletionStatus) {
        for slot in self.pending.drain(..) {
            slot.borrow_mut().settle(status);
        }
    }
}

impl<T> fmt::Debug for SpinEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpinEngine")
            .field("phase", &self.state.phase)
            .field("angle", &self.state.angle)
            .field("rng", &self.rng)
            .field("listeners", &self.registry.borrow().listeners.len())
            .field("pending", &self.pending.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
