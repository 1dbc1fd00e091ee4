//! Typed, cancellable iteration over contract event logs.
//!
//! An [`EventIterator`] yields decoded events either from a finite batch of
//! historical logs or from a live subscription fed by a background pump
//! task. The first log that fails to decode (or a subscription failure)
//! stops the iterator for good; the error stays readable via
//! [`EventIterator::error`]. Closing, from the owner or from another task
//! through a [`CloseHandle`], unsubscribes and wakes a pending `next()`.

use crate::error::BindingError;
use alloy_primitives::{Address, B256};
use alloy_rpc_types::Log;
use alloy_sol_types::SolEvent;
use futures::{Stream, StreamExt};
use std::{collections::VecDeque, marker::PhantomData, sync::Arc};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{debug, warn};

/// Capacity of the channel between a subscription pump and its iterator.
const SUBSCRIPTION_BUFFER: usize = 256;

/// A decoded event together with the raw log it came from.
#[derive(Debug, Clone)]
pub struct DecodedLog<E> {
    pub event: E,
    pub log: Log,
}

impl<E> DecodedLog<E> {
    pub const fn address(&self) -> Address {
        self.log.inner.address
    }

    pub const fn block_number(&self) -> Option<u64> {
        self.log.block_number
    }

    pub const fn transaction_hash(&self) -> Option<B256> {
        self.log.transaction_hash
    }

    pub const fn log_index(&self) -> Option<u64> {
        self.log.log_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// May still produce events
    Open,
    /// Stopped by a decode or subscription error
    Failed,
    /// Exhausted or closed by the caller
    Closed,
}

/// Closes an [`EventIterator`] from anywhere; cheap to clone.
#[derive(Debug, Clone)]
pub struct CloseHandle(Arc<watch::Sender<bool>>);

impl CloseHandle {
    pub fn close(&self) {
        self.0.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.0.borrow()
    }
}

/// Receiving end of a live subscription; dropping it stops the pump.
struct LogSubscription {
    rx: mpsc::Receiver<Result<Log, BindingError>>,
    task: JoinHandle<()>,
}

impl Drop for LogSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct EventIterator<E> {
    buffered: VecDeque<Log>,
    subscription: Option<LogSubscription>,
    state: IteratorState,
    error: Option<BindingError>,
    close_tx: Arc<watch::Sender<bool>>,
    close_rx: watch::Receiver<bool>,
    _event: PhantomData<fn() -> E>,
}

impl<E: SolEvent> EventIterator<E> {
    fn new(buffered: VecDeque<Log>, subscription: Option<LogSubscription>) -> Self {
        let (close_tx, close_rx) = watch::channel(false);
        Self {
            buffered,
            subscription,
            state: IteratorState::Open,
            error: None,
            close_tx: Arc::new(close_tx),
            close_rx,
            _event: PhantomData,
        }
    }

    /// Iterate over a finite set of already fetched logs.
    pub fn from_logs(logs: Vec<Log>) -> Self {
        Self::new(logs.into(), None)
    }

    /// Iterate over a live log stream.
    ///
    /// Each stream item is a batch of logs (one poll of a log filter). A pump
    /// task forwards the logs to this iterator; the stream ending is reported
    /// as a transport failure, since a live subscription never ends by itself.
    ///
    /// Must be called within a tokio runtime.
    pub fn subscribe<S>(stream: S) -> Self
    where
        S: Stream<Item = Vec<Log>> + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let task = tokio::spawn(pump_logs(stream, tx));
        Self::new(VecDeque::new(), Some(LogSubscription { rx, task }))
    }

    pub const fn state(&self) -> IteratorState {
        self.state
    }

    /// The error that stopped the iterator, if any.
    pub const fn error(&self) -> Option<&BindingError> {
        self.error.as_ref()
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle(self.close_tx.clone())
    }

    /// Stop iterating and release the subscription. Idempotent.
    pub fn close(&mut self) {
        self.close_tx.send_replace(true);
        self.shutdown();
    }

    /// Next decoded event.
    ///
    /// Returns `None` once the iterator is exhausted, closed or failed. On a
    /// live subscription this waits until a log arrives or the iterator is
    /// closed; it never times out on its own.
    pub async fn next(&mut self) -> Option<DecodedLog<E>> {
        if self.state != IteratorState::Open {
            return None;
        }
        if *self.close_rx.borrow() {
            self.shutdown();
            return None;
        }

        if let Some(log) = self.buffered.pop_front() {
            return self.decode(log);
        }

        let Some(subscription) = self.subscription.as_mut() else {
            self.state = IteratorState::Closed;
            return None;
        };

        let received = tokio::select! {
            biased;
            _ = wait_closed(&mut self.close_rx) => None,
            received = subscription.rx.recv() => Some(received),
        };
        let Some(received) = received else {
            self.shutdown();
            return None;
        };

        match received {
            Some(Ok(log)) => self.decode(log),
            Some(Err(err)) => {
                self.fail(err);
                None
            }
            None => {
                self.fail(BindingError::transport_msg("log subscription dropped"));
                None
            }
        }
    }

    /// Drain the iterator, returning every event or the error that stopped it.
    ///
    /// Only meaningful for finite (historical) iterators; on a live
    /// subscription this waits until the iterator is closed or fails.
    pub async fn collect(mut self) -> Result<Vec<DecodedLog<E>>, BindingError> {
        let mut events = Vec::new();
        while let Some(event) = self.next().await {
            events.push(event);
        }
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(events),
        }
    }

    /// Adapt into a `Stream` of decoded events.
    pub fn into_stream(self) -> impl Stream<Item = DecodedLog<E>> {
        futures::stream::unfold(self, |mut iter| async move {
            iter.next().await.map(|event| (event, iter))
        })
    }

    fn decode(&mut self, log: Log) -> Option<DecodedLog<E>> {
        match E::decode_log_data(&log.inner.data) {
            Ok(event) => Some(DecodedLog { event, log }),
            Err(err) => {
                warn!(
                    event = E::SIGNATURE,
                    topic0 = ?log.topic0(),
                    block = ?log.block_number,
                    "Failed to decode log, stopping iterator"
                );
                self.fail(err.into());
                None
            }
        }
    }

    fn fail(&mut self, err: BindingError) {
        self.error = Some(err);
        self.state = IteratorState::Failed;
        self.release();
    }

    fn shutdown(&mut self) {
        if self.state == IteratorState::Open {
            self.state = IteratorState::Closed;
        }
        self.release();
    }

    fn release(&mut self) {
        self.buffered.clear();
        if self.subscription.take().is_some() {
            debug!(event = E::SIGNATURE, "Released log subscription");
        }
    }
}

async fn wait_closed(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender gone: nobody can close any more.
            std::future::pending::<()>().await;
        }
    }
}

async fn pump_logs<S>(mut stream: S, tx: mpsc::Sender<Result<Log, BindingError>>)
where
    S: Stream<Item = Vec<Log>> + Send + Unpin + 'static,
{
    while let Some(batch) = stream.next().await {
        for log in batch {
            if tx.send(Ok(log)).await.is_err() {
                debug!("Log consumer dropped, stopping pump");
                return;
            }
        }
    }

    warn!("Log subscription ended");
    let _ = tx.send(Err(BindingError::transport_msg("log subscription ended"))).await;
}
