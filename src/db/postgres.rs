//! Postgres-backed store.

use crate::config;
use crate::db::store::StrategyStore;
use crate::errors::{EngineError, Result};
use crate::models::strategy::{Strategy, StrategyConfig};
use crate::models::trade::{Trade, TradeStatus};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls, Row};

pub struct PostgresStore {
    client: Mutex<Client>,
}

impl PostgresStore {
    pub async fn new() -> Result<Self> {
        Self::connect(&config::get_database_url()).await
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "store connection error");
            }
        });

        let store = Self {
            client: Mutex::new(client),
        };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        let client = self.client.lock().await;
        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS strategies (
                    id BIGSERIAL PRIMARY KEY,
                    owner_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    config_json TEXT NOT NULL,
                    is_active BOOLEAN NOT NULL DEFAULT TRUE,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL
                );
                CREATE TABLE IF NOT EXISTS trades (
                    id BIGSERIAL PRIMARY KEY,
                    owner_id TEXT NOT NULL,
                    signature TEXT NOT NULL,
                    strategy_type TEXT NOT NULL,
                    direction TEXT NOT NULL,
                    input_token TEXT NOT NULL,
                    output_token TEXT NOT NULL,
                    input_amount DOUBLE PRECISION NOT NULL,
                    output_amount DOUBLE PRECISION NOT NULL,
                    price DOUBLE PRECISION NOT NULL,
                    status TEXT NOT NULL,
                    executed_at TIMESTAMPTZ NOT NULL
                );
                CREATE INDEX IF NOT EXISTS trades_owner_time
                    ON trades (owner_id, executed_at);",
            )
            .await?;
        Ok(())
    }

    fn strategy_from_row(row: &Row) -> Result<Strategy> {
        let config_json: String = row.get(4);
        let config: StrategyConfig = serde_json::from_str(&config_json)
            .map_err(|e| EngineError::Store(format!("bad strategy config: {}", e)))?;

        Ok(Strategy {
            id: Some(row.get(0)),
            owner_id: row.get(1),
            name: row.get(2),
            description: row.get(3),
            config,
            is_active: row.get(5),
            created_at: row.get(6),
            updated_at: row.get(7),
        })
    }

    fn trade_from_row(row: &Row) -> Trade {
        let direction: String = row.get(4);
        Trade {
            id: Some(row.get(0)),
            owner_id: row.get(1),
            signature: row.get(2),
            strategy_type: row.get(3),
            direction: if direction == "sell" {
                crate::models::strategy::TradeDirection::Sell
            } else {
                crate::models::strategy::TradeDirection::Buy
            },
            input_token: row.get(5),
            output_token: row.get(6),
            input_amount: row.get(7),
            output_amount: row.get(8),
            price: row.get(9),
            status: TradeStatus::Confirmed,
            executed_at: row.get(11),
        }
    }

    fn direction_str(trade: &Trade) -> &'static str {
        match trade.direction {
            crate::models::strategy::TradeDirection::Buy => "buy",
            crate::models::strategy::TradeDirection::Sell => "sell",
        }
    }
}

const STRATEGY_COLUMNS: &str =
    "id, owner_id, name, description, config_json, is_active, created_at, updated_at";
const TRADE_COLUMNS: &str = "id, owner_id, signature, strategy_type, direction, input_token, \
     output_token, input_amount, output_amount, price, status, executed_at";

#[async_trait::async_trait]
impl StrategyStore for PostgresStore {
    async fn active_strategies(&self, owner_id: &str) -> Result<Vec<Strategy>> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM strategies
                     WHERE owner_id = $1 AND is_active
                     ORDER BY created_at",
                    STRATEGY_COLUMNS
                ),
                &[&owner_id],
            )
            .await?;

        rows.iter().map(Self::strategy_from_row).collect()
    }

    async fn owners_with_active_strategies(&self) -> Result<Vec<String>> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                "SELECT DISTINCT owner_id FROM strategies WHERE is_active ORDER BY owner_id",
                &[],
            )
            .await?;
        Ok(rows.iter().map(|r| r.get(0)).collect())
    }

    async fn trades_since(&self, owner_id: &str, cutoff: DateTime<Utc>) -> Result<Vec<Trade>> {
        let client = self.client.lock().await;
        let rows = client
            .query(
                &format!(
                    "SELECT {} FROM trades
                     WHERE owner_id = $1 AND executed_at >= $2
                     ORDER BY executed_at",
                    TRADE_COLUMNS
                ),
                &[&owner_id, &cutoff],
            )
            .await?;
        Ok(rows.iter().map(Self::trade_from_row).collect())
    }

    async fn record_trade(&self, trade: &Trade) -> Result<i64> {
        let client = self.client.lock().await;
        let row = client
            .query_one(
                "INSERT INTO trades (owner_id, signature, strategy_type, direction,
                     input_token, output_token, input_amount, output_amount, price,
                     status, executed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'CONFIRMED', $10)
                 RETURNING id",
                &[
                    &trade.owner_id,
                    &trade.signature,
                    &trade.strategy_type,
                    &Self::direction_str(trade),
                    &trade.input_token,
                    &trade.output_token,
                    &trade.input_amount,
                    &trade.output_amount,
                    &trade.price,
                    &trade.executed_at,
                ],
            )
            .await?;
        Ok(row.get(0))
    }

    async fn record_trade_and_deactivate(&self, trade: &Trade, strategy_id: i64) -> Result<i64> {
        let mut client = self.client.lock().await;
        let tx = client.transaction().await?;

        let row = tx
            .query_one(
                "INSERT INTO trades (owner_id, signature, strategy_type, direction,
                     input_token, output_token, input_amount, output_amount, price,
                     status, executed_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'CONFIRMED', $10)
                 RETURNING id",
                &[
                    &trade.owner_id,
                    &trade.signature,
                    &trade.strategy_type,
                    &Self::direction_str(trade),
                    &trade.input_token,
                    &trade.output_token,
                    &trade.input_amount,
                    &trade.output_amount,
                    &trade.price,
                    &trade.executed_at,
                ],
            )
            .await?;
        let trade_id: i64 = row.get(0);

        let updated = tx
            .execute(
                "UPDATE strategies SET is_active = FALSE, updated_at = $2 WHERE id = $1",
                &[&strategy_id, &Utc::now()],
            )
            .await?;
        if updated == 0 {
            return Err(EngineError::Store(format!(
                "strategy {} not found for deactivation",
                strategy_id
            )));
        }

        tx.commit().await?;
        Ok(trade_id)
    }
}
