//! Stats service - aggregate figures computed by the backend

use std::sync::Arc;

use crate::adapters::http::ApiClient;
use crate::domain::result::Result;
use crate::domain::{ClientStats, GlobalStats};

#[derive(Clone)]
pub struct StatsService {
    api: Arc<ApiClient>,
}

impl StatsService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn global(&self) -> Result<GlobalStats> {
        self.api.get("/stats/global").await
    }

    pub async fn client(&self, client_id: i64) -> Result<ClientStats> {
        self.api.get(&format!("/stats/client/{}", client_id)).await
    }
}
