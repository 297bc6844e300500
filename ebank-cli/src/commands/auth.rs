//! Auth commands - login, logout, whoami, register and password change

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use ebank_core::domain::capabilities_for;
use ebank_core::domain::requests::{ChangePasswordRequest, LoginRequest, RegisterRequest, Registration};
use ebank_core::ports::SessionReader;

use super::get_context;
use crate::output;

pub async fn login(username: Option<String>) -> Result<()> {
    let ctx = get_context()?;

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Nom d'utilisateur").interact_text()?,
    };
    let password = Password::new().with_prompt("Mot de passe").interact()?;
    let request = LoginRequest::new(username, password)?;

    let pb = output::spinner("Connexion...");
    let result = ctx.auth_service.login(request).await;
    pb.finish_and_clear();
    let user = result?;

    output::success(&format!(
        "Connecté en tant que {} ({})",
        user.display_name(),
        user.role
    ));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    if !ctx.session.is_authenticated() {
        output::info("Aucune session active");
        return Ok(());
    }
    ctx.auth_service.logout()?;
    output::success("Déconnecté");
    Ok(())
}

pub async fn whoami(check: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let Some(user) = ctx.session.user() else {
        if json {
            println!("null");
        } else {
            output::info("Non connecté");
        }
        return Ok(());
    };

    let valid = if check {
        Some(ctx.auth_service.validate_token().await)
    } else {
        None
    };

    if json {
        let payload = serde_json::json!({ "user": user, "tokenValid": valid });
        return output::print_json(&payload);
    }

    let mut table = output::create_table();
    table.add_row(vec!["Utilisateur", user.username.as_str()]);
    table.add_row(vec!["Nom".to_string(), user.display_name()]);
    table.add_row(vec!["Rôle", user.role.as_str()]);
    if let Some(email) = &user.email {
        table.add_row(vec!["Email", email.as_str()]);
    }
    println!("{}", table);

    let menu: Vec<_> = capabilities_for(user.role).iter().map(|c| c.label()).collect();
    println!("{} {}", "Accès:".bold(), menu.join(", "));

    match valid {
        Some(true) => output::success("Jeton valide"),
        Some(false) => output::warning("Jeton refusé par le serveur, reconnectez-vous"),
        None => {}
    }
    Ok(())
}

pub async fn register() -> Result<()> {
    let ctx = get_context()?;

    let form = Registration {
        username: Input::new().with_prompt("Nom d'utilisateur").interact_text()?,
        password: Password::new()
            .with_prompt("Mot de passe")
            .with_confirmation("Confirmez le mot de passe", "Les mots de passe ne correspondent pas")
            .interact()?,
        email: Input::new().with_prompt("Email").interact_text()?,
        last_name: Input::new().with_prompt("Nom").interact_text()?,
        first_name: Input::new().with_prompt("Prénom").interact_text()?,
        phone: Input::new().with_prompt("Téléphone (06/07...)").interact_text()?,
    };
    let request = RegisterRequest::new(form)?;

    let response = ctx.auth_service.register(request).await?;
    output::success(&response.message);
    println!("{}", "Vous pouvez maintenant lancer `ebank login`.".dimmed());
    Ok(())
}

pub async fn change_password() -> Result<()> {
    let ctx = get_context()?;
    super::require(&ctx, &[ebank_core::Capability::Settings])?;

    let old = Password::new().with_prompt("Mot de passe actuel").interact()?;
    let new = Password::new()
        .with_prompt("Nouveau mot de passe")
        .with_confirmation("Confirmez le mot de passe", "Les mots de passe ne correspondent pas")
        .interact()?;
    let request = ChangePasswordRequest::new(old, new)?;

    ctx.auth_service.change_password(request).await?;
    output::success("Mot de passe modifié");
    Ok(())
}

pub async fn refresh() -> Result<()> {
    let ctx = get_context()?;
    let session = ctx.auth_service.refresh().await?;
    output::success(&format!("Session renouvelée pour {}", session.user.username));
    Ok(())
}
