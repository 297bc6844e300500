//! Clients command - back-office client management

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input, Password};
use ebank_core::domain::requests::{
    ClientUpdate, CreateClientRequest, NewClient, UpdateClientRequest,
};
use ebank_core::{Capability, Client};

use super::{get_context, parse_date_opt, require};
use crate::commands::accounts::print_accounts;
use crate::output;

#[derive(Subcommand)]
pub enum ClientCommands {
    /// List all clients
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show a client and their accounts
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Search clients by name, email or CIN
    Search {
        query: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a client (prompts for missing fields)
    Create {
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        prenom: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        telephone: Option<String>,
        #[arg(long)]
        adresse: Option<String>,
        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        date_naissance: Option<String>,
        #[arg(long)]
        cin: Option<String>,
        /// Portal username
        #[arg(long)]
        username: Option<String>,
    },
    /// Update some fields of a client
    Update {
        id: i64,
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        prenom: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        telephone: Option<String>,
        #[arg(long)]
        adresse: Option<String>,
    },
    /// Delete a client
    Delete {
        id: i64,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub async fn run(command: ClientCommands) -> Result<()> {
    let ctx = get_context()?;
    require(&ctx, &[Capability::ManageClients])?;

    match command {
        ClientCommands::List { json } => {
            let pb = output::spinner("Chargement des clients...");
            let result = ctx.client_service.list().await;
            pb.finish_and_clear();
            let clients = result?;
            if json {
                return output::print_json(&clients);
            }
            print_clients(&clients);
        }
        ClientCommands::Show { id, json } => {
            let client = ctx.client_service.get(id).await?;
            if json {
                return output::print_json(&client);
            }
            print_client(&client);
            if !client.accounts.is_empty() {
                println!("\n{}", "Comptes".bold());
                print_accounts(&client.accounts, false);
            }
        }
        ClientCommands::Search { query, json } => {
            let clients = ctx.client_service.search(&query).await?;
            if json {
                return output::print_json(&clients);
            }
            if clients.is_empty() {
                output::info(&format!("Aucun client ne correspond à '{}'", query));
            } else {
                print_clients(&clients);
            }
        }
        ClientCommands::Create {
            nom,
            prenom,
            email,
            telephone,
            adresse,
            date_naissance,
            cin,
            username,
        } => {
            let new_client = NewClient {
                last_name: prompt_if_missing(nom, "Nom")?,
                first_name: prompt_if_missing(prenom, "Prénom")?,
                email: prompt_if_missing(email, "Email")?,
                phone: prompt_if_missing(telephone, "Téléphone")?,
                address: adresse,
                birth_date: parse_date_opt(date_naissance.as_deref())?,
                national_id: cin,
                username: prompt_if_missing(username, "Identifiant du portail")?,
                password: Password::new()
                    .with_prompt("Mot de passe initial")
                    .with_confirmation("Confirmez le mot de passe", "Les mots de passe ne correspondent pas")
                    .interact()?,
            };
            let request = CreateClientRequest::new(new_client)?;

            let created = ctx.client_service.create(request).await?;
            output::success(created.message.as_deref().unwrap_or("Client créé"));
            print_client(&created.record);
        }
        ClientCommands::Update {
            id,
            nom,
            prenom,
            email,
            telephone,
            adresse,
        } => {
            let request = UpdateClientRequest::new(ClientUpdate {
                last_name: nom,
                first_name: prenom,
                email,
                phone: telephone,
                address: adresse,
            })?;

            let updated = ctx.client_service.update(id, request).await?;
            output::success(updated.message.as_deref().unwrap_or("Client mis à jour"));
            print_client(&updated.record);
        }
        ClientCommands::Delete { id, force } => {
            if !force {
                let client = ctx.client_service.get(id).await?;
                println!(
                    "\n{}",
                    format!("Le client {} sera supprimé.", client.full_name()).yellow()
                );
                if !Confirm::new()
                    .with_prompt("Êtes-vous sûr ?")
                    .default(false)
                    .interact()?
                {
                    println!("{}", "Annulé".dimmed());
                    return Ok(());
                }
            }
            let response = ctx.client_service.delete(id).await?;
            output::success(&response.message);
        }
    }
    Ok(())
}

fn print_clients(clients: &[Client]) {
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Nom", "Email", "Téléphone", "CIN", "Comptes"]);
    for client in clients {
        table.add_row(vec![
            client.id.to_string(),
            client.full_name(),
            client.email.clone(),
            client.phone.clone(),
            client.national_id.clone().unwrap_or_default(),
            client
                .account_count
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}

fn print_client(client: &Client) {
    let mut table = output::create_table();
    table.add_row(vec!["ID".to_string(), client.id.to_string()]);
    table.add_row(vec!["Nom".to_string(), client.full_name()]);
    table.add_row(vec!["Email".to_string(), client.email.clone()]);
    table.add_row(vec!["Téléphone".to_string(), client.phone.clone()]);
    if let Some(address) = &client.address {
        table.add_row(vec!["Adresse".to_string(), address.clone()]);
    }
    if let Some(birth) = client.birth_date {
        table.add_row(vec!["Naissance".to_string(), birth.format("%d/%m/%Y").to_string()]);
    }
    if let Some(cin) = &client.national_id {
        table.add_row(vec!["CIN".to_string(), cin.clone()]);
    }
    table.add_row(vec![
        "Client depuis".to_string(),
        client.created_at.format("%d/%m/%Y").to_string(),
    ]);
    println!("{}", table);
}
