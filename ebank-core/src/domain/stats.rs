//! Aggregate statistics returned by `/stats`

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::wire;

/// Bank-wide figures for the back-office dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    #[serde(rename = "totalClients")]
    pub total_clients: u64,
    #[serde(rename = "totalComptes")]
    pub total_accounts: u64,
    #[serde(rename = "totalComptesCourants")]
    pub total_current_accounts: u64,
    #[serde(rename = "totalComptesEpargne")]
    pub total_savings_accounts: u64,
    #[serde(rename = "soldeTotalMAD", with = "wire::amount")]
    pub total_balance_mad: Decimal,
    #[serde(rename = "nombreOperationsAujourdhui")]
    pub operations_today: u64,
    #[serde(rename = "montantOperationsAujourdhui", with = "wire::amount")]
    pub operations_amount_today: Decimal,
    #[serde(rename = "dateGeneration", with = "wire::datetime")]
    pub generated_at: NaiveDateTime,
}

/// Per-client figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientStats {
    #[serde(rename = "clientId")]
    pub client_id: i64,
    #[serde(rename = "nombreComptes")]
    pub account_count: u32,
    #[serde(rename = "soldeTotalMAD", with = "wire::amount")]
    pub total_balance_mad: Decimal,
    #[serde(rename = "nombreOperationsMois")]
    pub operations_this_month: u64,
    #[serde(rename = "montantDepotsMois", with = "wire::amount")]
    pub deposits_this_month: Decimal,
    #[serde(rename = "montantRetraitsMois", with = "wire::amount")]
    pub withdrawals_this_month: Decimal,
    #[serde(
        rename = "dernierOperation",
        default,
        with = "wire::datetime_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_operation_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_stats_wire_format() {
        let stats: GlobalStats = serde_json::from_str(
            r#"{
                "totalClients": 120,
                "totalComptes": 210,
                "totalComptesCourants": 150,
                "totalComptesEpargne": 60,
                "soldeTotalMAD": 4520000.75,
                "nombreOperationsAujourdhui": 37,
                "montantOperationsAujourdhui": 81250,
                "dateGeneration": "2024-06-01T08:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(stats.total_accounts, 210);
        assert_eq!(stats.total_balance_mad, Decimal::new(452000075, 2));
    }

    #[test]
    fn test_client_stats_without_operations() {
        let stats: ClientStats = serde_json::from_str(
            r#"{
                "clientId": 3,
                "nombreComptes": 2,
                "soldeTotalMAD": 0,
                "nombreOperationsMois": 0,
                "montantDepotsMois": 0,
                "montantRetraitsMois": 0
            }"#,
        )
        .unwrap();
        assert_eq!(stats.last_operation_at, None);
        assert_eq!(stats.total_balance_mad, Decimal::ZERO);
    }
}
