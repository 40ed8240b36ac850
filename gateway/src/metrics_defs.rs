//! Metrics definitions for the content gateway.

use shared::metrics_defs::{MetricDef, MetricType};

pub const CACHE_HIT: MetricDef = MetricDef {
    name: "gateway.cache.hit",
    metric_type: MetricType::Counter,
    description: "Requests answered from an endpoint's response cache",
};

pub const CACHE_MISS: MetricDef = MetricDef {
    name: "gateway.cache.miss",
    metric_type: MetricType::Counter,
    description: "Requests that had to go to the upstream",
};

pub const UPSTREAM_ERROR: MetricDef = MetricDef {
    name: "gateway.upstream.error",
    metric_type: MetricType::Counter,
    description: "Upstream fetches that failed (timeout, transport, non-2xx, decode)",
};

pub const FALLBACK_SERVED: MetricDef = MetricDef {
    name: "gateway.fallback.served",
    metric_type: MetricType::Counter,
    description: "Responses answered with a static fallback payload",
};

pub const CONTACT_DELIVERED: MetricDef = MetricDef {
    name: "gateway.contact.delivered",
    metric_type: MetricType::Counter,
    description: "Contact submissions accepted by an upstream candidate",
};

pub const CONTACT_FAILED: MetricDef = MetricDef {
    name: "gateway.contact.failed",
    metric_type: MetricType::Counter,
    description: "Contact submissions rejected by every upstream candidate",
};

pub const ALL_METRICS: &[MetricDef] = &[
    CACHE_HIT,
    CACHE_MISS,
    UPSTREAM_ERROR,
    FALLBACK_SERVED,
    CONTACT_DELIVERED,
    CONTACT_FAILED,
];
