//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{ConfigError, EngineConfig},
    database::{self, Db},
    domain::{
        lifecycle::{LifecycleService, PgLifecycleService},
        pricing::{CatalogPricingService, PricingService},
        products::{PgProductsService, ProductsService},
        promotions::{PgPromotionsService, PromotionsService},
        usage::{PgUsageService, UsageService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub promotions: Arc<dyn PromotionsService>,
    pub pricing: Arc<dyn PricingService>,
    pub usage: Arc<dyn UsageService>,
    pub lifecycle: Arc<dyn LifecycleService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine settings are invalid or establishing
    /// a database connection fails.
    pub async fn from_database_url(url: &str, engine: &EngineConfig) -> Result<Self, AppInitError> {
        let currency = engine.currency()?;
        let usage_settings = engine.usage_settings()?;

        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let products: Arc<dyn ProductsService> = Arc::new(PgProductsService::new(db.clone()));
        let promotions: Arc<dyn PromotionsService> =
            Arc::new(PgPromotionsService::new(db.clone(), currency));

        Ok(Self {
            pricing: Arc::new(CatalogPricingService::new(
                Arc::clone(&products),
                Arc::clone(&promotions),
                currency,
            )),
            usage: Arc::new(PgUsageService::new(
                db.clone(),
                Arc::clone(&products),
                Arc::clone(&promotions),
                usage_settings,
            )),
            lifecycle: Arc::new(PgLifecycleService::new(db, currency)),
            products,
            promotions,
        })
    }
}
