use std::sync::Arc;

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

pub const CACHE_HIT: &str = "hit";
pub const CACHE_MISS: &str = "miss";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Exchange metrics
    pub token_requests: IntCounterVec,
    pub token_failures: IntCounterVec,
    pub exchange_duration: HistogramVec,

    // Cache metrics
    pub cache_lookups: IntCounterVec,
    pub cache_writes: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Arc<Self>> {
        let registry = Registry::new_custom(Some("oauthagent".into()), None)?;

        let metrics = Arc::new(Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token acquisitions by grant type"), &["grant_type"])?,
            token_failures: IntCounterVec::new(Opts::new("token_failures_total", "Failed acquisitions by reason"), &["grant_type", "reason"])?,
            exchange_duration: HistogramVec::new(
                HistogramOpts::new("token_exchange_duration_seconds", "Provider exchange duration seconds")
                    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
                &["grant_type"],
            )?,

            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Token cache lookups by result"), &["result"])?,
            cache_writes: IntCounter::new("cache_writes_total", "Tokens written to the cache")?,

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone()))?;
        reg.register(Box::new(metrics.token_failures.clone()))?;
        reg.register(Box::new(metrics.exchange_duration.clone()))?;
        reg.register(Box::new(metrics.cache_lookups.clone()))?;
        reg.register(Box::new(metrics.cache_writes.clone()))?;

        Ok(metrics)
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_registered_counters() {
        let metrics = Metrics::new().unwrap();
        metrics.token_requests.with_label_values(&["client_credentials"]).inc();
        metrics.cache_lookups.with_label_values(&[CACHE_MISS]).inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("oauthagent_token_requests_total{grant_type=\"client_credentials\"} 1"));
        assert!(text.contains("oauthagent_cache_lookups_total{result=\"miss\"} 1"));
    }
}
