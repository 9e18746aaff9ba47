use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    plan_requests_total: AtomicU64,
    variants_total: AtomicU64,
    items_planned_total: AtomicU64,
    geocode_failures_total: AtomicU64,
    narrative_fallback_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub plan_requests_total: u64,
    pub variants_total: u64,
    pub items_planned_total: u64,
    pub geocode_failures_total: u64,
    pub narrative_fallback_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_plan_request(&self) {
        self.plan_requests_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("travelbot_plan_requests_total").increment(1);
    }

    pub fn add_variant(&self, items: usize) {
        self.variants_total.fetch_add(1, Ordering::Relaxed);
        self.items_planned_total
            .fetch_add(items as u64, Ordering::Relaxed);
        metrics::counter!("travelbot_variants_total").increment(1);
        metrics::counter!("travelbot_items_planned_total").increment(items as u64);
    }

    pub fn inc_geocode_failure(&self) {
        self.geocode_failures_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("travelbot_geocode_failures_total").increment(1);
    }

    pub fn inc_narrative_fallback(&self) {
        self.narrative_fallback_total.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("travelbot_narrative_fallback_total").increment(1);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
        metrics::histogram!("travelbot_plan_latency_seconds").record(duration.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.plan_requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            plan_requests_total: requests,
            variants_total: self.variants_total.load(Ordering::Relaxed),
            items_planned_total: self.items_planned_total.load(Ordering::Relaxed),
            geocode_failures_total: self.geocode_failures_total.load(Ordering::Relaxed),
            narrative_fallback_total: self.narrative_fallback_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,travelbot_agents=info,travelbot_enrichment=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
