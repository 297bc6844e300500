//! Role-based access to portal capabilities
//!
//! A single static table decides which roles may use which screen or
//! command; callers ask [`is_authorized`] instead of matching on roles.

use serde::Serialize;

use super::user::UserRole;

/// A navigable capability of the portal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Dashboard,
    MyAccounts,
    Transfer,
    Deposit,
    History,
    ManageClients,
    ManageAccounts,
    Operations,
    Settings,
}

const ALL_ROLES: &[UserRole] = &[UserRole::Client, UserRole::Admin, UserRole::Agent];
const CLIENT_ONLY: &[UserRole] = &[UserRole::Client];
const STAFF: &[UserRole] = &[UserRole::Admin, UserRole::Agent];

/// Capability -> permitted roles, in navigation order
const PERMISSIONS: &[(Capability, &[UserRole])] = &[
    (Capability::Dashboard, ALL_ROLES),
    (Capability::MyAccounts, CLIENT_ONLY),
    (Capability::Transfer, CLIENT_ONLY),
    (Capability::Deposit, CLIENT_ONLY),
    (Capability::History, CLIENT_ONLY),
    (Capability::ManageClients, STAFF),
    (Capability::ManageAccounts, STAFF),
    (Capability::Operations, STAFF),
    (Capability::Settings, ALL_ROLES),
];

impl Capability {
    pub fn label(&self) -> &'static str {
        match self {
            Capability::Dashboard => "Tableau de bord",
            Capability::MyAccounts => "Mes Comptes",
            Capability::Transfer => "Virement",
            Capability::Deposit => "Dépôt",
            Capability::History => "Historique",
            Capability::ManageClients => "Gestion Clients",
            Capability::ManageAccounts => "Gestion Comptes",
            Capability::Operations => "Opérations",
            Capability::Settings => "Paramètres",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Capability::Dashboard => "/dashboard",
            Capability::MyAccounts => "/comptes",
            Capability::Transfer => "/virement",
            Capability::Deposit => "/depot",
            Capability::History => "/historique",
            Capability::ManageClients => "/admin/clients",
            Capability::ManageAccounts => "/admin/comptes",
            Capability::Operations => "/admin/operations",
            Capability::Settings => "/parametres",
        }
    }

    /// Roles allowed to use this capability
    pub fn roles(&self) -> &'static [UserRole] {
        PERMISSIONS
            .iter()
            .find(|(cap, _)| cap == self)
            .map(|(_, roles)| *roles)
            .unwrap_or(&[])
    }
}

/// Whether `role` may use `capability`
pub fn is_authorized(role: UserRole, capability: Capability) -> bool {
    capability.roles().contains(&role)
}

/// Every capability available to `role`, in navigation order
pub fn capabilities_for(role: UserRole) -> Vec<Capability> {
    PERMISSIONS
        .iter()
        .filter(|(_, roles)| roles.contains(&role))
        .map(|(cap, _)| *cap)
        .collect()
}
