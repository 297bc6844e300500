//! Client service - back-office client records

use std::sync::Arc;

use tracing::info;

use crate::adapters::http::{path_with_query, ApiClient};
use crate::domain::requests::{CreateClientRequest, UpdateClientRequest};
use crate::domain::responses::{MessageResponse, WithMessage};
use crate::domain::result::Result;
use crate::domain::validation::validate_required;
use crate::domain::Client;

#[derive(Clone)]
pub struct ClientService {
    api: Arc<ApiClient>,
}

impl ClientService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Client>> {
        self.api.get("/clients").await
    }

    pub async fn get(&self, client_id: i64) -> Result<Client> {
        self.api.get(&format!("/clients/{}", client_id)).await
    }

    /// Free-text search over names, email and CIN
    pub async fn search(&self, query: &str) -> Result<Vec<Client>> {
        validate_required("q", query)?;
        let path = path_with_query("/clients/search", &[("q", query.trim().to_string())]);
        self.api.get(&path).await
    }

    pub async fn create(&self, request: CreateClientRequest) -> Result<WithMessage<Client>> {
        let created: WithMessage<Client> = self.api.post("/clients", Some(&request)).await?;
        info!(client_id = created.record.id, "client created");
        Ok(created)
    }

    pub async fn update(
        &self,
        client_id: i64,
        request: UpdateClientRequest,
    ) -> Result<WithMessage<Client>> {
        let updated: WithMessage<Client> = self
            .api
            .put(&format!("/clients/{}", client_id), Some(&request))
            .await?;
        info!(client_id, "client updated");
        Ok(updated)
    }

    pub async fn delete(&self, client_id: i64) -> Result<MessageResponse> {
        let response: MessageResponse = self.api.delete(&format!("/clients/{}", client_id)).await?;
        info!(client_id, "client deleted");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_backend::{MockBackend, MockRoute};
    use crate::domain::requests::{ClientUpdate, NewClient};
    use crate::domain::result::Error;
    use crate::domain::UserRole;
    use crate::services::test_support::{client_json, logged_in_api};
    use serde_json::json;

    #[tokio::test]
    async fn test_list_and_get() {
        let server = MockBackend::start(vec![
            MockRoute::json(
                "GET",
                "/clients",
                200,
                json!([client_json(1, "Alami", "Sara"), client_json(2, "Bennani", "Youssef")]),
            ),
            MockRoute::json("GET", "/clients/2", 200, client_json(2, "Bennani", "Youssef")),
        ])
        .unwrap();
        let (api, _session) = logged_in_api(&server, UserRole::Agent);
        let service = ClientService::new(api);

        let clients = service.list().await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].full_name(), "Sara Alami");

        let client = service.get(2).await.unwrap();
        assert_eq!(client.account_count, Some(2));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let server = MockBackend::start(vec![MockRoute::json(
            "GET",
            "/clients/search",
            200,
            json!([client_json(1, "El Amrani", "Hind")]),
        )])
        .unwrap();
        let (api, _session) = logged_in_api(&server, UserRole::Agent);
        let service = ClientService::new(api);

        let found = service.search(" El Amrani ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            server.requests()[0].query_param("q").as_deref(),
            Some("El Amrani")
        );

        let err = service.search("   ").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_create_client() {
        let mut created = client_json(9, "Chraibi", "Amine");
        created["message"] = json!("Client créé avec succès");
        let server = MockBackend::start(vec![MockRoute::json("POST", "/clients", 201, created)]).unwrap();
        let (api, _session) = logged_in_api(&server, UserRole::Admin);

        let request = CreateClientRequest::new(NewClient {
            last_name: "Chraibi".into(),
            first_name: "Amine".into(),
            email: "amine@ebank.ma".into(),
            phone: "0698765432".into(),
            national_id: Some("BK123456".into()),
            username: "amine".into(),
            password: "changeme".into(),
            ..Default::default()
        })
        .unwrap();
        let created = ClientService::new(api).create(request).await.unwrap();

        assert_eq!(created.record.id, 9);
        let body = server.requests()[0].json();
        assert_eq!(body["cin"], "BK123456");
        assert_eq!(body["username"], "amine");
        assert!(body.get("adresse").is_none());
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let server = MockBackend::start(vec![MockRoute::json(
            "PUT",
            "/clients/4",
            200,
            client_json(4, "Alami", "Sara"),
        )])
        .unwrap();
        let (api, _session) = logged_in_api(&server, UserRole::Agent);

        let request = UpdateClientRequest::new(ClientUpdate {
            phone: Some("0700000000".into()),
            ..Default::default()
        })
        .unwrap();
        let updated = ClientService::new(api).update(4, request).await.unwrap();

        assert_eq!(updated.message, None);
        assert_eq!(server.requests()[0].json(), json!({"telephone": "0700000000"}));
    }

    #[tokio::test]
    async fn test_delete_conflict_surfaces_backend_message() {
        let server = MockBackend::start(vec![MockRoute::json(
            "DELETE",
            "/clients/4",
            409,
            json!({"message": "Impossible de supprimer un client ayant des comptes actifs"}),
        )])
        .unwrap();
        let (api, _session) = logged_in_api(&server, UserRole::Admin);

        let err = ClientService::new(api).delete(4).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Impossible de supprimer un client ayant des comptes actifs"
        );
    }
}
