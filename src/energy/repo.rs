use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{EnergyConsumption, EnergyGeneration};

/// Read-only access to the energy tables.
#[async_trait]
pub trait EnergyStore: Send + Sync {
    async fn list_generation(&self) -> anyhow::Result<Vec<EnergyGeneration>>;
    async fn list_consumption(&self) -> anyhow::Result<Vec<EnergyConsumption>>;
}

#[derive(Clone)]
pub struct PgEnergyStore {
    db: PgPool,
}

impl PgEnergyStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EnergyStore for PgEnergyStore {
    async fn list_generation(&self) -> anyhow::Result<Vec<EnergyGeneration>> {
        let rows = sqlx::query_as::<_, EnergyGeneration>(
            r#"
            SELECT id, timestamp, energy_kwh, source, location, system_id
            FROM energy_generation
            ORDER BY timestamp ASC, system_id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list energy_generation")?;
        Ok(rows)
    }

    async fn list_consumption(&self) -> anyhow::Result<Vec<EnergyConsumption>> {
        let rows = sqlx::query_as::<_, EnergyConsumption>(
            r#"
            SELECT id, timestamp, energy_kwh, location, sector, consumer_id, price, total
            FROM energy_consumption
            ORDER BY timestamp ASC, consumer_id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list energy_consumption")?;
        Ok(rows)
    }
}
