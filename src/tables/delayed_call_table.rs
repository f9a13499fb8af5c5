// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Deadline-scheduled one-shot tasks. Realized directly as `tokio::time`
//! sleeps rather than a hand-rolled deadline heap, since the runtime's own
//! timer wheel already gives FIFO-fair, cancellable delayed execution.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Schedules `task` to run after `delay`, returning a token that cancels
/// it if dropped-into before it fires. Exceptions from `task` are not
/// possible in Rust (`FnOnce` can't panic-and-report here); a caller whose
/// task panics sees that propagate into the spawned task and logged by
/// the executor, matching the "log, never propagate into the table" rule
/// at the call site that invokes this.
pub fn call_later<F>(delay: Duration, task: F) -> CancellationToken
where
    F: FnOnce() + Send + 'static,
{
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(delay) => task(),
            _ = child.cancelled() => {},
        }
    });
    token
}
