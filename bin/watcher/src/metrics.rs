//! Prometheus metrics for the watcher.
//!
//! All metrics are aggregated in the [`Metrics`] struct.

use metrics::{counter, describe_counter, describe_gauge, gauge};

/// Aggregated metrics for the watcher.
///
/// Metric descriptions are registered with the global registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        describe_counter!(
            "watcher_delayed_messages_total",
            "Delayed messages observed since start"
        );
        describe_counter!(
            "watcher_batches_total",
            "Sequencer batches observed since start, by data location"
        );
        describe_gauge!(
            "watcher_delayed_message_count",
            "Last observed delayed inbox message count"
        );
        describe_gauge!(
            "watcher_batch_count",
            "Last observed sequencer inbox batch count"
        );
        describe_gauge!(
            "watcher_last_event_block",
            "Parent chain block of the last observed event, by event"
        );
        describe_counter!(
            "watcher_verifications_total",
            "Accumulator verifications, by kind and outcome"
        );
        describe_counter!(
            "watcher_iterator_failures_total",
            "Event iterators stopped by an error, by event"
        );
    }

    /// Record a delayed message seen by `watch`.
    pub fn record_delayed_message(&self, index: u64, block: u64) {
        counter!("watcher_delayed_messages_total").increment(1);
        gauge!("watcher_delayed_message_count").set((index + 1) as f64);
        gauge!("watcher_last_event_block", "event" => "MessageDelivered").set(block as f64);
    }

    /// Record a sequencer batch seen by `watch`.
    pub fn record_batch(&self, sequence_number: u64, block: u64, location: &str) {
        counter!("watcher_batches_total", "location" => location.to_string()).increment(1);
        gauge!("watcher_batch_count").set((sequence_number + 1) as f64);
        gauge!("watcher_last_event_block", "event" => "SequencerBatchDelivered").set(block as f64);
    }

    pub fn set_counts(&self, delayed_messages: u64, batches: u64) {
        gauge!("watcher_delayed_message_count").set(delayed_messages as f64);
        gauge!("watcher_batch_count").set(batches as f64);
    }

    pub fn record_verification(&self, kind: &str, success: bool) {
        let outcome = if success { "ok" } else { "failed" };
        counter!("watcher_verifications_total", "kind" => kind.to_string(), "outcome" => outcome)
            .increment(1);
    }

    pub fn record_iterator_failure(&self, event: &str) {
        counter!("watcher_iterator_failures_total", "event" => event.to_string()).increment(1);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
