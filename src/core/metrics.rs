use std::net::{Ipv4Addr, SocketAddr};

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::core::config::Settings;
use crate::db::schema::Entity;

/// Installs the Prometheus recorder with its own scrape listener.
pub fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled {
        return Ok(());
    }

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.telemetry().prometheus_port));
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

pub(crate) fn record_write(entity: Entity, action: &'static str) {
    metrics::counter!(
        "store_writes_total",
        "entity" => entity.name(),
        "action" => action
    )
    .increment(1);
}

pub(crate) fn record_delete_blocked(entity: Entity, dependent: Entity) {
    metrics::counter!(
        "store_delete_blocked_total",
        "entity" => entity.name(),
        "dependent" => dependent.name()
    )
    .increment(1);
}
