// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Exports
//======================================================================================================================

pub mod aggregate;

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::runtime::{
    fail::Fail,
    logging,
    SharedObject,
};
use ::crossbeam_channel::{
    Receiver,
    Sender,
};
use ::std::{
    mem,
    panic::{
        self,
        AssertUnwindSafe,
    },
    sync::{
        Condvar,
        Mutex,
    },
    thread,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// A handle to a unit of work that starts executing on its own thread the moment it is constructed. The completion,
/// result, and error of the work can be observed later, from any thread, through the accessors on this handle.
/// Cloning a future yields another handle to the same unit of work, not a new activation.
///
/// A future is constructed with exactly one kind of action: a *runnable* ([Future::run]), which produces no value,
/// or a *supplier* ([Future::supply]), which produces a value of type `T`. The degenerate no-action case is its own
/// constructor ([Future::completed]) and is done the moment it is built.
pub struct Future<T>(SharedObject<FutureState<T>>);

/// State shared between a future's activation thread and all handles to it.
struct FutureState<T> {
    /// Completion flag and recorded error. Guarded together, so a caller that observes the done transition also
    /// observes the final error value.
    completion: Mutex<Completion>,
    /// Signaled when the activation finishes.
    done_cond: Condvar,
    /// Result slot, serializing the drain-or-cache decision between concurrent readers.
    result: Mutex<ResultSlot<T>>,
}

/// Outcome of an activation. Written exactly once, by the activation itself.
struct Completion {
    /// Set when the activation has finished, successfully or not. Never goes back.
    done: bool,
    /// The single error raised by the action, if any.
    error: Option<Fail>,
}

/// The three shapes of a future's result slot.
#[derive(Default)]
enum ResultSlot<T> {
    /// Supplier future whose value has not been drained from the handoff yet.
    Pending(Receiver<T>),
    /// Value already drained and memoized. Single source of truth for all subsequent reads.
    Cached(T),
    /// No result was ever planned: runnable and no-action futures.
    #[default]
    Vacant,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

/// Associate Functions for Futures
impl<T> Future<T> {
    /// Creates a future that carries no action at all. It is done the moment it is constructed, holds no result and
    /// no error, and none of its accessors block.
    pub fn completed() -> Self {
        Self(SharedObject::new(FutureState::settled()))
    }

    /// Blocks the calling thread until the activation of this future has finished, regardless of whether it
    /// succeeded or failed. Safe to call redundantly and concurrently from any number of threads.
    pub fn wait(&self) {
        self.0.wait();
    }

    /// Blocks until this future is done, then returns the error recorded by its action, if any.
    pub fn err(&self) -> Option<Fail> {
        self.wait();
        let completion = self.0.completion.lock().expect("completion lock poisoned");
        completion.error.clone()
    }

    /// Tells whether this future is done, without blocking. Safe for polling.
    pub fn is_done(&self) -> bool {
        self.0.completion.lock().expect("completion lock poisoned").done
    }
}

impl<T: Clone + Default + Send + 'static> Future<T> {
    /// Creates a future from a runnable action and immediately launches it on a dedicated thread. A runnable action
    /// only reports success or failure; the future plans no result, so [Future::get] returns the zero value.
    pub fn run<F>(action: F) -> Self
    where
        F: FnOnce() -> Result<(), Fail> + Send + 'static,
    {
        logging::initialize();
        let future: Future<T> = Self(SharedObject::new(FutureState::pending(ResultSlot::Vacant)));
        let state: SharedObject<FutureState<T>> = future.0.clone();
        thread::spawn(move || {
            let error: Option<Fail> = run_guarded(action).err();
            state.complete(error);
        });
        future
    }

    /// Creates a future from a supplier action and immediately launches it on a dedicated thread. The produced value
    /// travels through a one-shot handoff channel to the first caller of [Future::get].
    pub fn supply<F>(action: F) -> Self
    where
        F: FnOnce() -> Result<T, Fail> + Send + 'static,
    {
        logging::initialize();
        let (value_tx, value_rx): (Sender<T>, Receiver<T>) = crossbeam_channel::bounded(1);
        let future: Future<T> = Self(SharedObject::new(FutureState::pending(ResultSlot::Pending(value_rx))));
        let state: SharedObject<FutureState<T>> = future.0.clone();
        thread::spawn(move || {
            let error: Option<Fail> = match run_guarded(action) {
                Ok(value) => {
                    let _ = value_tx.send(value);
                    None
                },
                Err(e) => {
                    // The handoff is fed even on failure, with the zero value, so that no reader can ever block on
                    // an empty handoff.
                    let _ = value_tx.send(T::default());
                    Some(e)
                },
            };
            // The value is in the handoff before completion is published.
            state.complete(error);
        });
        future
    }

    /// Blocks until this future is done, then returns its value. The first call drains the one-shot handoff, caches
    /// the value, and closes the handoff; every later call is served from the cache, so repeated calls are idempotent
    /// and never re-invoke the action. For a future that planned no result, returns the zero value of `T` without
    /// blocking.
    pub fn get(&self) -> T {
        {
            let slot = self.0.result.lock().expect("result lock poisoned");
            if matches!(&*slot, ResultSlot::Vacant) {
                return T::default();
            }
        }
        self.wait();
        let mut slot = self.0.result.lock().expect("result lock poisoned");
        match mem::take(&mut *slot) {
            ResultSlot::Pending(handoff) => {
                // The activation fed the handoff before publishing completion, so the value is already there.
                // Dropping the endpoint on the way out closes the handoff for good.
                let value: T = handoff.try_recv().unwrap_or_default();
                *slot = ResultSlot::Cached(value.clone());
                value
            },
            ResultSlot::Cached(value) => {
                *slot = ResultSlot::Cached(value.clone());
                value
            },
            ResultSlot::Vacant => T::default(),
        }
    }

    /// Returns both the value and the error of this future, blocking until it is done.
    pub fn result(&self) -> (T, Option<Fail>) {
        let value: T = self.get();
        let error: Option<Fail> = self.err();
        (value, error)
    }
}

/// Associate Functions for Future State
impl<T> FutureState<T> {
    /// Creates the state of a future whose activation is about to be launched.
    fn pending(result: ResultSlot<T>) -> Self {
        Self {
            completion: Mutex::new(Completion {
                done: false,
                error: None,
            }),
            done_cond: Condvar::new(),
            result: Mutex::new(result),
        }
    }

    /// Creates the state of a future that is done on construction.
    fn settled() -> Self {
        Self {
            completion: Mutex::new(Completion {
                done: true,
                error: None,
            }),
            done_cond: Condvar::new(),
            result: Mutex::new(ResultSlot::Vacant),
        }
    }

    /// Publishes the done transition together with the outcome of the action. Runs exactly once, on the activation
    /// thread, as its very last step.
    fn complete(&self, error: Option<Fail>) {
        let mut completion = self.completion.lock().expect("completion lock poisoned");
        completion.error = error;
        completion.done = true;
        self.done_cond.notify_all();
    }

    /// Blocks until the done transition has been published.
    fn wait(&self) {
        let mut completion = self.completion.lock().expect("completion lock poisoned");
        while !completion.done {
            completion = self.done_cond.wait(completion).expect("completion lock poisoned");
        }
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

/// Clone Trait Implementation for Futures
impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Runs a user-supplied action, converting an unwinding panic into a [Fail]. A misbehaving action is captured as
/// data; it never escapes the activation and never strands a waiter.
fn run_guarded<T, F>(action: F) -> Result<T, Fail>
where
    F: FnOnce() -> Result<T, Fail>,
{
    match panic::catch_unwind(AssertUnwindSafe(action)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let fail: Fail = Fail::from_panic(payload.as_ref());
            warn!("run_guarded(): recovered a fault in an action (cause={:?})", fail.cause);
            Err(fail)
        },
    }
}
