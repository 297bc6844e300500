//! Stats and dashboard commands

use anyhow::{bail, Result};
use colored::Colorize;
use ebank_core::{Capability, ClientStats, EbankContext, UserRole};

use super::{get_context, require};
use crate::commands::accounts::print_accounts;
use crate::output;

/// Bank-wide statistics, or one client's with `--client`
pub async fn run(client: Option<i64>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, &[Capability::ManageClients])?;

    if let Some(client_id) = client {
        let stats = ctx.stats_service.client(client_id).await?;
        if json {
            return output::print_json(&stats);
        }
        print_client_stats(&stats);
        return Ok(());
    }

    let pb = output::spinner("Calcul des statistiques...");
    let result = ctx.stats_service.global().await;
    pb.finish_and_clear();
    let stats = result?;

    if json {
        return output::print_json(&stats);
    }

    println!("{}", "Statistiques globales".bold());
    println!();
    let mut table = output::create_table();
    table.add_row(vec!["Clients".to_string(), stats.total_clients.to_string()]);
    table.add_row(vec!["Comptes".to_string(), stats.total_accounts.to_string()]);
    table.add_row(vec![
        "  courants".to_string(),
        stats.total_current_accounts.to_string(),
    ]);
    table.add_row(vec![
        "  épargne".to_string(),
        stats.total_savings_accounts.to_string(),
    ]);
    table.add_row(vec!["Encours total".to_string(), output::format_mad(stats.total_balance_mad)]);
    table.add_row(vec![
        "Opérations du jour".to_string(),
        stats.operations_today.to_string(),
    ]);
    table.add_row(vec![
        "Volume du jour".to_string(),
        output::format_mad(stats.operations_amount_today),
    ]);
    println!("{}", table);
    println!(
        "{}",
        format!("Généré le {}", stats.generated_at.format("%d/%m/%Y %H:%M")).dimmed()
    );
    Ok(())
}

/// Home screen: accounts and monthly figures of one client
pub async fn dashboard(client: Option<i64>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let user = require(&ctx, &[Capability::Dashboard])?;

    let client_id = match (user.role, client) {
        (UserRole::Client, _) => own_client_id(&ctx).await?,
        (_, Some(id)) => id,
        (_, None) => bail!("Précisez le client avec --client <ID>"),
    };

    let pb = output::spinner("Chargement du tableau de bord...");
    let result = ctx.dashboard_service.load(client_id).await;
    pb.finish_and_clear();
    let dashboard = result?;

    if json {
        return output::print_json(&dashboard);
    }

    println!("{} {}", "Bonjour".bold(), user.display_name().bold());
    println!(
        "Solde total: {}",
        output::format_mad(dashboard.total_balance).green().bold()
    );
    println!();
    print_accounts(&dashboard.accounts, false);
    println!();
    print_client_stats(&dashboard.stats);
    Ok(())
}

/// A client user's own client record, found through their accounts
async fn own_client_id(ctx: &EbankContext) -> Result<i64> {
    let accounts = ctx.account_service.list(None).await?;
    match accounts.iter().find_map(|a| a.client_id) {
        Some(id) => Ok(id),
        None => bail!("Aucun compte rattaché à votre profil"),
    }
}

fn print_client_stats(stats: &ClientStats) {
    let mut table = output::create_table();
    table.add_row(vec!["Comptes".to_string(), stats.account_count.to_string()]);
    table.add_row(vec!["Solde total".to_string(), output::format_mad(stats.total_balance_mad)]);
    table.add_row(vec![
        "Opérations ce mois".to_string(),
        stats.operations_this_month.to_string(),
    ]);
    table.add_row(vec![
        "Dépôts ce mois".to_string(),
        output::format_mad(stats.deposits_this_month),
    ]);
    table.add_row(vec![
        "Retraits ce mois".to_string(),
        output::format_mad(stats.withdrawals_this_month),
    ]);
    if let Some(last) = stats.last_operation_at {
        table.add_row(vec![
            "Dernière opération".to_string(),
            last.format("%d/%m/%Y %H:%M").to_string(),
        ]);
    }
    println!("{}", table);
}
