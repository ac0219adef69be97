//! Company setup facade: companies, environments and the master-data
//! dropdowns most forms need.

use serde_json::Value;

use meridian_core::{CallArgs, ContextOverrides, Endpoint, Pagination};

use crate::client::ApiClient;
use crate::error::ClientResult;

pub struct CompanyApi<'a> {
    client: &'a ApiClient,
    context: ContextOverrides,
}

impl<'a> CompanyApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        CompanyApi {
            client,
            context: ContextOverrides::none(),
        }
    }

    pub fn with_context(mut self, context: ContextOverrides) -> Self {
        self.context = context;
        self
    }

    async fn call(&self, endpoint: Endpoint) -> ClientResult<Value> {
        self.client
            .execute(endpoint, CallArgs::new().context(self.context.clone()))
            .await
    }

    async fn page(&self, endpoint: Endpoint, page: Pagination) -> ClientResult<Value> {
        let args = CallArgs::new().context(self.context.clone()).page(page);
        self.client.execute(endpoint, args).await
    }

    /// Companies the user can switch to.
    pub async fn companies(&self) -> ClientResult<Value> {
        self.call(Endpoint::CompanyList).await
    }

    /// Environments of the current (or overridden) company.
    pub async fn environments(&self) -> ClientResult<Value> {
        self.call(Endpoint::EnvironmentList).await
    }

    pub async fn details(&self) -> ClientResult<Value> {
        self.call(Endpoint::CompanyDetails).await
    }

    pub async fn departments(&self) -> ClientResult<Value> {
        self.call(Endpoint::DepartmentList).await
    }

    pub async fn designations(&self) -> ClientResult<Value> {
        self.call(Endpoint::DesignationList).await
    }

    pub async fn employees(&self, page: Pagination) -> ClientResult<Value> {
        self.page(Endpoint::EmployeeList, page).await
    }

    pub async fn customers(&self, page: Pagination) -> ClientResult<Value> {
        self.page(Endpoint::CustomerList, page).await
    }

    pub async fn vendors(&self, page: Pagination) -> ClientResult<Value> {
        self.page(Endpoint::VendorList, page).await
    }

    pub async fn items(&self, page: Pagination) -> ClientResult<Value> {
        self.page(Endpoint::ItemList, page).await
    }

    pub async fn currencies(&self) -> ClientResult<Value> {
        self.call(Endpoint::CurrencyList).await
    }

    pub async fn taxes(&self) -> ClientResult<Value> {
        self.call(Endpoint::TaxList).await
    }

    pub async fn payment_terms(&self) -> ClientResult<Value> {
        self.call(Endpoint::PaymentTermList).await
    }

    pub async fn projects(&self) -> ClientResult<Value> {
        self.call(Endpoint::ProjectList).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use meridian_core::StorageKey;
    use meridian_store::MemoryStorage;
    use serde_json::json;

    #[tokio::test]
    async fn test_company_list_needs_only_user() {
        let transport = RecordingTransport::new();
        let client = ApiClient::builder()
            .with_storage(MemoryStorage::with_values([(StorageKey::Uuid, "u1")]))
            .with_transport(transport.clone())
            .build()
            .unwrap();
        transport
            .push_json(json!({"Data": [{"CompanyUUID": "c1"}]}))
            .await;

        let companies = client.company().companies().await.unwrap();
        assert_eq!(companies, json!([{"CompanyUUID": "c1"}]));
        assert_eq!(
            transport.last_request().await.unwrap().query_keys(),
            vec!["UserUUID"]
        );

        let err = client.company().environments().await.unwrap_err();
        assert_eq!(err.to_string(), "cmpUuid is required");
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_environments_for_explicit_company() {
        let transport = RecordingTransport::new();
        let client = ApiClient::builder()
            .with_storage(MemoryStorage::with_values([(StorageKey::Uuid, "u1")]))
            .with_transport(transport.clone())
            .build()
            .unwrap();

        client
            .company()
            .with_context(ContextOverrides::none().with_cmp_uuid("c7"))
            .environments()
            .await
            .unwrap();
        let request = transport.last_request().await.unwrap();
        assert_eq!(request.query_value("CMPUUID"), Some("c7"));
        assert_eq!(request.query_value("UserUUID"), Some("u1"));
    }
}
