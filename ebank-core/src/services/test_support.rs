//! Shared fixtures for service tests

use std::sync::Arc;

use serde_json::{json, Value as JsonValue};

use crate::adapters::http::ApiClient;
use crate::adapters::mock_backend::MockBackend;
use crate::adapters::storage::MemorySessionStorage;
use crate::domain::responses::AuthResponse;
use crate::domain::{User, UserRole};
use crate::ports::SessionReader;

use super::SessionStore;

/// An anonymous session store and a client pointed at `server`
pub fn anonymous_api(server: &MockBackend) -> (Arc<ApiClient>, Arc<SessionStore>) {
    let session = Arc::new(SessionStore::anonymous(Arc::new(MemorySessionStorage::new())));
    let reader: Arc<dyn SessionReader> = session.clone();
    let api = ApiClient::new(&server.base_url(), reader).unwrap();
    (Arc::new(api), session)
}

/// Same as [`anonymous_api`], already logged in with `role`
pub fn logged_in_api(server: &MockBackend, role: UserRole) -> (Arc<ApiClient>, Arc<SessionStore>) {
    let (api, session) = anonymous_api(server);
    session
        .login(AuthResponse {
            token: "test-token".to_string(),
            user: User::new(3, "karim", role),
        })
        .unwrap();
    (api, session)
}

pub fn account_json(id: i64, numero: &str, solde: f64) -> JsonValue {
    json!({
        "id": id,
        "numero": numero,
        "type": "COURANT",
        "solde": solde,
        "dateCreation": "2024-01-10T09:00:00",
        "statut": "ACTIF",
        "clientId": 3,
        "clientNom": "Karim Idrissi"
    })
}

pub fn client_json(id: i64, nom: &str, prenom: &str) -> JsonValue {
    json!({
        "id": id,
        "nom": nom,
        "prenom": prenom,
        "email": format!("{}@ebank.ma", prenom.to_lowercase()),
        "telephone": "0612345678",
        "dateCreation": "2023-11-02T14:30:00",
        "nombreComptes": 2
    })
}

pub fn client_stats_json(client_id: i64) -> JsonValue {
    json!({
        "clientId": client_id,
        "nombreComptes": 2,
        "soldeTotalMAD": 30500.75,
        "nombreOperationsMois": 12,
        "montantDepotsMois": 8000,
        "montantRetraitsMois": 2500.5,
        "dernierOperation": "2024-06-03T18:12:44"
    })
}
