//! Selective delay stage
//!
//! Splits a stream by predicate into a pass-through branch and a
//! delayed branch, paces the delayed branch with a growing Fibonacci
//! backoff, and remerges both into one output stream. Relative order
//! within each branch is preserved; order across the two branches at
//! the merge point is not.
//!
//! The backoff counter advances once per delayed element and never
//! resets for the lifetime of the stage, so each stage instance must
//! serve exactly one pipeline.

use std::time::Duration;

use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_stream::wrappers::ReceiverStream;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 16;

/// Classic Fibonacci sequence: 1, 1, 2, 3, 5, 8, ...
pub fn fibonacci(n: u32) -> u64 {
    let (mut a, mut b) = (1u64, 1u64);
    for _ in 0..n {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

/// Applies Fibonacci-paced delays to the elements matching `predicate`
/// while unmatched elements pass through unhindered.
///
/// Dropping the returned stream tears the stage down: the router and
/// branch worker stop at their next send, and an in-flight delayed
/// element is dropped rather than delivered.
pub fn selective_delay<T, S, P>(input: S, predicate: P, unit: Duration) -> impl Stream<Item = T>
where
    T: Send + 'static,
    S: Stream<Item = T> + Send + 'static,
    P: Fn(&T) -> bool + Send + 'static,
{
    let (pass_tx, pass_rx) = mpsc::channel::<T>(CHANNEL_CAPACITY);
    let (hold_tx, hold_rx) = mpsc::channel::<T>(CHANNEL_CAPACITY);
    let (paced_tx, paced_rx) = mpsc::channel::<T>(CHANNEL_CAPACITY);

    // Router: partition the input into the two branch queues.
    tokio::spawn(async move {
        futures_util::pin_mut!(input);
        while let Some(element) = input.next().await {
            let delivered = if predicate(&element) {
                hold_tx.send(element).await.is_ok()
            } else {
                pass_tx.send(element).await.is_ok()
            };
            if !delivered {
                break;
            }
        }
    });

    // Branch worker: drain the delayed queue sequentially, sleeping the
    // next Fibonacci step before each forward. Sequential draining is
    // what preserves within-branch ordering.
    tokio::spawn(async move {
        let mut step: u32 = 0;
        let mut hold_rx = hold_rx;
        while let Some(element) = hold_rx.recv().await {
            let factor = u32::try_from(fibonacci(step)).unwrap_or(u32::MAX);
            let wait = unit.saturating_mul(factor);
            step += 1;
            trace!(step, wait_ms = wait.as_millis() as u64, "delaying element");
            tokio::select! {
                _ = sleep(wait) => {
                    if paced_tx.send(element).await.is_err() {
                        break;
                    }
                }
                // Consumer went away; drop the in-flight element.
                _ = paced_tx.closed() => break,
            }
        }
    });

    stream::select(
        ReceiverStream::new(pass_rx),
        ReceiverStream::new(paced_rx),
    )
}
