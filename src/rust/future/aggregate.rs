// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    future::Future,
    runtime::fail::Fail,
};
use ::crossbeam_channel::{
    select,
    Receiver,
    Sender,
};
use ::std::thread::{
    self,
    JoinHandle,
};

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Blocks until every future in `futures` is done. Surfaces no error: the members' work was already launched when
/// they were constructed, so this only supplies the waiting. Returns immediately for an empty slice.
pub fn wait_all<T>(futures: &[Future<T>]) {
    trace!("wait_all(): waiting on {:?} futures", futures.len());
    for future in futures {
        future.wait();
    }
}

/// Blocks until every future in `futures` is done, with the expectation that the caller interrogates each member
/// individually through [Future::err] or [Future::result] afterwards. Surfaces no error itself. Returns immediately
/// for an empty slice.
pub fn run_all<T>(futures: &[Future<T>]) {
    wait_all(futures);
}

/// Blocks until either every future in `futures` is done, in which case `None` is returned, or one of them has
/// failed, in which case the first observed error is returned as soon as it is observed, even while sibling futures
/// are still running. After an early return, sibling futures may still be mutating their own result and error slots.
/// Returns `None` immediately for an empty slice.
pub fn execute_all<T: Send + 'static>(futures: &[Future<T>]) -> Option<Fail> {
    if futures.is_empty() {
        return None;
    }
    trace!("execute_all(): executing {:?} futures", futures.len());

    let (fail_tx, fail_rx): (Sender<Fail>, Receiver<Fail>) = crossbeam_channel::unbounded();
    let (all_done_tx, all_done_rx): (Sender<()>, Receiver<()>) = crossbeam_channel::bounded(0);

    // One watcher per member, reporting that member's failure, if any.
    let mut watchers: Vec<JoinHandle<()>> = Vec::with_capacity(futures.len());
    for future in futures {
        let future: Future<T> = future.clone();
        let fail_tx: Sender<Fail> = fail_tx.clone();
        watchers.push(thread::spawn(move || {
            future.wait();
            if let Some(error) = future.err() {
                let _ = fail_tx.send(error);
            }
        }));
    }
    drop(fail_tx);

    // Closes the all-done channel once every watcher has finished.
    thread::spawn(move || {
        for watcher in watchers {
            let _ = watcher.join();
        }
        drop(all_done_tx);
    });

    // When completion and failure are observable at the same time, the failure wins: the all-done leg drains a
    // simultaneously-reported error before declaring success, so exactly one error is returned, never none.
    select! {
        recv(fail_rx) -> error => error.ok(),
        recv(all_done_rx) -> _ => fail_rx.try_recv().ok(),
    }
}
