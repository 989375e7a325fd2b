use crate::api::GoalsApi;
use crate::config::Config;
use crate::locale::AppLocale;
use crate::query::QueryClient;
use crate::summary::DayOrder;
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GoalsApi>,
    pub queries: Arc<QueryClient>,
    pub locale: AppLocale,
    pub day_order: DayOrder,
    pub render_timeout: Duration,
}

impl AppState {
    pub fn new(api: Arc<dyn GoalsApi>, config: &Config) -> Self {
        Self {
            api,
            queries: Arc::new(QueryClient::new(config.stale_time)),
            locale: config.locale,
            day_order: config.day_order,
            render_timeout: config.render_timeout,
        }
    }
}
