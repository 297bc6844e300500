//! Accounts command - list, inspect and administer bank accounts

use anyhow::{anyhow, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use ebank_core::domain::requests::CreateAccountRequest;
use ebank_core::{Account, AccountStatus, AccountType, Capability, EbankContext, UserRole};
use rust_decimal::Decimal;

use super::{get_context, require};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List accounts
    List {
        /// Only accounts of this client (staff)
        #[arg(long)]
        client: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one account
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Fetch the live balance of an account
    Balance {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Open an account for a client (staff)
    Create {
        /// Client ID
        #[arg(long)]
        client: i64,
        /// COURANT or EPARGNE
        #[arg(long = "type", default_value = "COURANT")]
        account_type: String,
        /// Initial balance
        #[arg(long)]
        initial: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Change an account's status (staff)
    Status {
        id: i64,
        /// ACTIF, BLOQUE or FERME
        status: String,
    },
    /// Delete an account (staff)
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

/// Clients read their own accounts, staff manage everyone's
const READ_ACCESS: &[Capability] = &[Capability::MyAccounts, Capability::ManageAccounts];

pub async fn run(command: AccountCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        AccountCommands::List { client, json } => list(&ctx, client, json).await,
        AccountCommands::Show { id, json } => {
            require(&ctx, READ_ACCESS)?;
            let account = ctx.account_service.get(id).await?;
            if json {
                return output::print_json(&account);
            }
            print_account(&account);
            Ok(())
        }
        AccountCommands::Balance { id, json } => {
            require(&ctx, READ_ACCESS)?;
            let balance = ctx.account_service.balance(id).await?;
            if json {
                return output::print_json(&balance);
            }
            println!(
                "{}  {}",
                ebank_core::domain::mask_account_number(&balance.number),
                output::format_mad(balance.balance).bold()
            );
            println!(
                "{}",
                format!("au {}", balance.checked_at.format("%d/%m/%Y %H:%M")).dimmed()
            );
            Ok(())
        }
        AccountCommands::Create {
            client,
            account_type,
            initial,
            json,
        } => {
            require(&ctx, &[Capability::ManageAccounts])?;
            let account_type: AccountType = account_type.parse().map_err(|e: String| anyhow!(e))?;
            let initial = initial.as_deref().map(parse_initial).transpose()?;
            let request = CreateAccountRequest::new(client, account_type, initial)?;

            let created = ctx.account_service.create(request).await?;
            if json {
                return output::print_json(&created);
            }
            output::success(created.message.as_deref().unwrap_or("Compte créé"));
            print_account(&created.record);
            Ok(())
        }
        AccountCommands::Status { id, status } => {
            require(&ctx, &[Capability::ManageAccounts])?;
            let status: AccountStatus = status.parse().map_err(|e: String| anyhow!(e))?;
            let response = ctx.account_service.update_status(id, status).await?;
            output::success(&format!(
                "{} (statut: {})",
                response.message,
                response.new_status.as_str()
            ));
            Ok(())
        }
        AccountCommands::Delete { id, force } => {
            require(&ctx, &[Capability::ManageAccounts])?;
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Supprimer le compte {} ?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Annulé".dimmed());
                return Ok(());
            }
            let response = ctx.account_service.delete(id).await?;
            output::success(&response.message);
            Ok(())
        }
    }
}

/// Zero is a legal opening balance; the sign is checked by the request
fn parse_initial(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| anyhow!("Solde initial invalide: {}", raw))
}

async fn list(ctx: &EbankContext, client: Option<i64>, json: bool) -> Result<()> {
    let user = require(ctx, READ_ACCESS)?;
    // Clients are scoped by their token; the filter is a staff tool
    let client = if user.role == UserRole::Client { None } else { client };

    let pb = output::spinner("Chargement des comptes...");
    let result = ctx.account_service.list(client).await;
    pb.finish_and_clear();
    let accounts = result?;

    if json {
        return output::print_json(&accounts);
    }
    if accounts.is_empty() {
        output::info("Aucun compte");
        return Ok(());
    }
    print_accounts(&accounts, user.role != UserRole::Client);
    Ok(())
}

pub fn print_accounts(accounts: &[Account], with_owner: bool) {
    let mut table = output::create_table();
    let mut header = vec!["ID", "Numéro", "Type", "Solde", "Statut"];
    if with_owner {
        header.push("Client");
    }
    table.set_header(header);

    for account in accounts {
        let mut row = vec![
            account.id.to_string(),
            account.masked_number(),
            account.account_type.as_str().to_string(),
            output::format_mad(account.balance),
            status_label(account.status),
        ];
        if with_owner {
            row.push(account.client_name.clone().unwrap_or_default());
        }
        table.add_row(row);
    }
    println!("{}", table);
}

fn print_account(account: &Account) {
    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), account.id.to_string()]);
    table.add_row(vec!["Numéro".to_string(), account.number.clone()]);
    table.add_row(vec!["Type".to_string(), account.account_type.as_str().to_string()]);
    table.add_row(vec!["Solde".to_string(), output::format_mad(account.balance)]);
    table.add_row(vec!["Statut".to_string(), status_label(account.status)]);
    table.add_row(vec![
        "Ouvert le".to_string(),
        account.created_at.format("%d/%m/%Y").to_string(),
    ]);
    if let Some(owner) = &account.client_name {
        table.add_row(vec!["Client".to_string(), owner.clone()]);
    }
    println!("{}", table);
}

fn status_label(status: AccountStatus) -> String {
    match status {
        AccountStatus::Active => status.as_str().green().to_string(),
        AccountStatus::Blocked => status.as_str().yellow().to_string(),
        AccountStatus::Closed => status.as_str().red().to_string(),
    }
}
