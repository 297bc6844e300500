//! Dashboard service - a client's accounts and figures in one round trip

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Account, ClientStats};

use super::{AccountService, StatsService};

/// Everything the client home screen shows
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub accounts: Vec<Account>,
    pub stats: ClientStats,
    /// Sum of the fetched account balances
    pub total_balance: Decimal,
}

impl ClientDashboard {
    pub fn active_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| a.is_active())
    }
}

#[derive(Clone)]
pub struct DashboardService {
    accounts: AccountService,
    stats: StatsService,
}

impl DashboardService {
    pub fn new(accounts: AccountService, stats: StatsService) -> Self {
        Self { accounts, stats }
    }

    /// Fetch accounts and statistics concurrently; either failure fails the whole
    pub async fn load(&self, client_id: i64) -> Result<ClientDashboard> {
        let (accounts, stats) = tokio::try_join!(
            self.accounts.list(Some(client_id)),
            self.stats.client(client_id),
        )?;

        let total_balance = accounts.iter().map(|a| a.balance).sum::<Decimal>();

        Ok(ClientDashboard {
            accounts,
            stats,
            total_balance,
        })
    }
}
