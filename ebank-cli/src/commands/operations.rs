//! Operation commands - deposits, withdrawals, transfers, history and documents

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use colored::Colorize;
use dialoguer::Confirm;
use ebank_core::domain::requests::{
    DepositRequest, ExportFormat, HistoryQuery, TransferRequest, WithdrawalRequest,
};
use ebank_core::domain::validation::parse_amount;
use ebank_core::domain::mask_account_number;
use ebank_core::{Capability, Operation, OperationType};

use super::{get_context, parse_date, parse_date_opt, require};
use crate::output;

/// Clients move their own money, staff act at the counter
const MOVE_MONEY: &[Capability] = &[Capability::Deposit, Capability::Operations];
const TRANSFER: &[Capability] = &[Capability::Transfer, Capability::Operations];
const READ_HISTORY: &[Capability] = &[Capability::History, Capability::Operations];

pub async fn deposit(
    account_id: i64,
    amount: &str,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, MOVE_MONEY)?;

    let request = DepositRequest::new(account_id, parse_amount(amount)?, description)?;
    let update = ctx.operation_service.deposit(request).await?;

    if json {
        return output::print_json(&update);
    }
    output::success(update.message.as_deref().unwrap_or("Dépôt effectué"));
    println!(
        "Opération #{}  nouveau solde: {}",
        update.operation_id,
        output::format_mad(update.new_balance).bold()
    );
    Ok(())
}

pub async fn withdraw(
    account_id: i64,
    amount: &str,
    description: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, MOVE_MONEY)?;

    let request = WithdrawalRequest::new(account_id, parse_amount(amount)?, description)?;
    let update = match ctx.operation_service.withdraw(request).await {
        Ok(update) => update,
        Err(e) => {
            if let Some(api) = e.api_error().filter(|a| a.is_insufficient_funds()) {
                if let (Some(current), Some(requested)) = (api.current_balance, api.requested_amount) {
                    output::warning(&format!(
                        "Solde disponible: {} / demandé: {}",
                        output::format_mad(current),
                        output::format_mad(requested)
                    ));
                }
            }
            return Err(e.into());
        }
    };

    if json {
        return output::print_json(&update);
    }
    output::success(update.message.as_deref().unwrap_or("Retrait effectué"));
    println!(
        "Opération #{}  nouveau solde: {}",
        update.operation_id,
        output::format_mad(update.new_balance).bold()
    );
    Ok(())
}

pub async fn transfer(
    from: i64,
    to: &str,
    amount: &str,
    description: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, TRANSFER)?;

    let request = TransferRequest::new(from, to.trim(), parse_amount(amount)?, description)?;

    if !yes {
        println!(
            "\nVirement de {} du compte #{} vers {}",
            output::format_mad(request.amount()).bold(),
            request.source_account_id(),
            mask_account_number(request.destination_number())
        );
        if !Confirm::new()
            .with_prompt("Confirmer le virement ?")
            .default(false)
            .interact()?
        {
            println!("{}", "Annulé".dimmed());
            return Ok(());
        }
    }

    let pb = output::spinner("Virement en cours...");
    let result = ctx.operation_service.transfer(request).await;
    pb.finish_and_clear();
    let receipt = result?;

    if json {
        return output::print_json(&receipt);
    }
    output::success(receipt.message.as_deref().unwrap_or("Virement effectué"));
    println!(
        "Opération #{}  solde source: {}  solde destination: {}",
        receipt.operation_id,
        output::format_mad(receipt.new_source_balance).bold(),
        output::format_mad(receipt.new_destination_balance)
    );
    Ok(())
}

pub struct HistoryArgs {
    pub account_id: i64,
    pub from: Option<String>,
    pub to: Option<String>,
    pub kind: Option<String>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub json: bool,
}

pub async fn history(args: HistoryArgs) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, READ_HISTORY)?;

    let kind = args
        .kind
        .as_deref()
        .map(|k| k.parse::<OperationType>().map_err(|e| anyhow!(e)))
        .transpose()?;
    let query = HistoryQuery {
        date_from: parse_date_opt(args.from.as_deref())?,
        date_to: parse_date_opt(args.to.as_deref())?,
        kind,
        page: args.page,
        size: args.size,
    };

    let page = ctx.operation_service.history(args.account_id, &query).await?;

    if args.json {
        return output::print_json(&page);
    }
    if page.content.is_empty() {
        output::info("Aucune opération sur cette période");
        return Ok(());
    }

    print_operations(&page.content, args.account_id);
    println!(
        "{}",
        format!(
            "Page {}/{} ({} opérations)",
            page.current_page + 1,
            page.total_pages.max(1),
            page.total_elements
        )
        .dimmed()
    );
    if page.has_next() {
        println!(
            "{}",
            format!("Page suivante: --page {}", page.current_page + 1).dimmed()
        );
    }
    Ok(())
}

pub async fn show(operation_id: i64, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, READ_HISTORY)?;

    let op = ctx.operation_service.get(operation_id).await?;
    if json {
        return output::print_json(&op);
    }

    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), op.id.to_string()]);
    table.add_row(vec!["Type".to_string(), op.kind.label().to_string()]);
    table.add_row(vec!["Montant".to_string(), output::format_mad(op.amount)]);
    table.add_row(vec!["Date".to_string(), op.date.format("%d/%m/%Y %H:%M").to_string()]);
    if let Some(source) = &op.source_account {
        table.add_row(vec!["Compte source".to_string(), mask_account_number(source)]);
    }
    if let Some(dest) = &op.destination_account {
        table.add_row(vec!["Compte destination".to_string(), mask_account_number(dest)]);
    }
    if let Some(before) = op.balance_before {
        table.add_row(vec!["Solde avant".to_string(), output::format_mad(before)]);
    }
    if let Some(after) = op.balance_after {
        table.add_row(vec!["Solde après".to_string(), output::format_mad(after)]);
    }
    if let Some(status) = &op.status {
        table.add_row(vec!["Statut".to_string(), status.clone()]);
    }
    if let Some(description) = &op.description {
        table.add_row(vec!["Description".to_string(), description.clone()]);
    }
    println!("{}", table);
    Ok(())
}

pub async fn statement(account_id: i64, from: &str, to: &str, output_path: Option<PathBuf>) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, READ_HISTORY)?;

    let (from, to) = (parse_date(from)?, parse_date(to)?);
    let pb = output::spinner("Génération du relevé...");
    let result = ctx.operation_service.statement(account_id, from, to).await;
    pb.finish_and_clear();
    let bytes = result?;

    let path = output_path.unwrap_or_else(|| {
        PathBuf::from(format!(
            "releve_{}_{}_{}.pdf",
            account_id,
            from.format("%Y%m%d"),
            to.format("%Y%m%d")
        ))
    });
    output::write_file(&path, &bytes)
}

pub async fn export(
    account_id: i64,
    format: &str,
    from: Option<String>,
    to: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, READ_HISTORY)?;

    let format: ExportFormat = format.parse().map_err(|e: String| anyhow!(e))?;
    let from = parse_date_opt(from.as_deref())?;
    let to = parse_date_opt(to.as_deref())?;

    let pb = output::spinner("Export en cours...");
    let result = ctx.operation_service.export(account_id, format, from, to).await;
    pb.finish_and_clear();
    let bytes = result?;

    let path = output_path.unwrap_or_else(|| {
        PathBuf::from(format!("operations_{}.{}", account_id, format.extension()))
    });
    output::write_file(&path, &bytes)
}

fn print_operations(operations: &[Operation], account_id: i64) {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Date", "Type", "Montant", "Solde après", "Description"]);

    for op in operations {
        table.add_row(vec![
            op.id.to_string(),
            op.date.format("%d/%m/%Y %H:%M").to_string(),
            op.kind.label().to_string(),
            output::signed_mad(op.signed_amount_for(account_id)),
            op.balance_after.map(output::format_mad).unwrap_or_default(),
            op.description.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}
