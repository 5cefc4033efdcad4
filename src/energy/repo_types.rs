use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Daily output of one generation system.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EnergyGeneration {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub energy_kwh: f64,
    pub source: String,   // wind, solar, biomass
    pub location: String, // country
    pub system_id: String,
}

/// Daily usage and billing of one consumer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EnergyConsumption {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub energy_kwh: f64,
    pub location: String, // city
    pub sector: String,   // residential, commercial, industrial
    pub consumer_id: String,
    pub price: f64, // per kWh
    pub total: f64,
}
