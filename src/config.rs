// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;

use crate::{
    db::{InventoryRepository, ItemStore, MemoryStore, OrderStore, OrdersRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService, document_service::DocumentService,
        inventory_service::InventoryService, order_service::OrderService,
        stock_calculator::LowBandPolicy,
    },
};

// Configuração lida do ambiente (.env opcional)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub admin_password_hash: Option<String>,
    pub min_order_total: Decimal,
    pub low_band: LowBandPolicy,
    pub font_dir: PathBuf,
    pub font_family: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 5,
            bind_addr: "0.0.0.0:3000".to_string(),
            jwt_secret: String::new(),
            admin_password_hash: None,
            min_order_total: Decimal::new(300, 0),
            low_band: LowBandPolicy::HalfOfMinimum,
            font_dir: PathBuf::from("./fonts"),
            font_family: "Roboto".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca (o ambiente, em produção).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Settings::default();
        let get = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DATABASE_MAX_CONNECTIONS deve ser um inteiro")?,
            None => defaults.max_connections,
        };

        let min_order_total = match get("MIN_ORDER_TOTAL") {
            Some(v) => v.parse::<Decimal>().context("MIN_ORDER_TOTAL deve ser um decimal")?,
            None => defaults.min_order_total,
        };
        if min_order_total.is_sign_negative() && !min_order_total.is_zero() {
            anyhow::bail!("MIN_ORDER_TOTAL não pode ser negativo");
        }

        let low_band = match get("LOW_STOCK_BAND") {
            Some(v) => v.parse::<LowBandPolicy>().map_err(anyhow::Error::msg)?,
            None => defaults.low_band,
        };

        let admin_password_hash = get("ADMIN_PASSWORD_HASH");
        let jwt_secret = match (get("JWT_SECRET"), &admin_password_hash) {
            (Some(secret), _) => secret,
            (None, Some(_)) => anyhow::bail!("JWT_SECRET deve ser definido quando ADMIN_PASSWORD_HASH existe"),
            (None, None) => defaults.jwt_secret,
        };

        Ok(Self {
            database_url: get("DATABASE_URL"),
            max_connections,
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret,
            admin_password_hash,
            min_order_total,
            low_band,
            font_dir: get("FONT_DIR").map(PathBuf::from).unwrap_or(defaults.font_dir),
            font_family: get("FONT_FAMILY").unwrap_or(defaults.font_family),
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub inventory_service: InventoryService,
    pub order_service: OrderService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
    pub auth_service: AuthService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        match &settings.database_url {
            Some(database_url) => {
                // Conecta ao banco de dados, usando '?' para propagar erros
                let db_pool = PgPoolOptions::new()
                    .max_connections(settings.max_connections)
                    .acquire_timeout(Duration::from_secs(3))
                    .connect(database_url)
                    .await
                    .context("Falha ao conectar ao banco de dados")?;
                tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

                sqlx::migrate!()
                    .run(&db_pool)
                    .await
                    .context("Falha ao rodar as migrações do banco de dados")?;
                tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

                let items = Arc::new(InventoryRepository::new(db_pool.clone()));
                let orders = Arc::new(OrdersRepository::new(db_pool));
                Ok(Self::from_stores(items, orders, settings))
            }
            None => {
                tracing::warn!("DATABASE_URL ausente: usando store em memória (dados se perdem ao reiniciar)");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::from_stores(store.clone(), store, settings))
            }
        }
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_stores(
        items: Arc<dyn ItemStore>,
        orders: Arc<dyn OrderStore>,
        settings: &Settings,
    ) -> Self {
        let inventory_service = InventoryService::new(items, settings.low_band);
        let order_service = OrderService::new(orders, inventory_service.clone(), settings.min_order_total);
        let dashboard_service = DashboardService::new(inventory_service.clone(), order_service.clone());
        let document_service = DocumentService::new(settings.font_dir.clone(), settings.font_family.clone());
        let auth_service = AuthService::new(settings.admin_password_hash.clone(), settings.jwt_secret.clone());

        Self {
            inventory_service,
            order_service,
            dashboard_service,
            document_service,
            auth_service,
        }
    }
}
