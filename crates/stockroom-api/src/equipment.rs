// Equipment resource
//
// CRUD over `/equipment`. Every call carries the stored bearer token.
// Filtering happens server-side through the list query; sorting and
// pagination are left to the caller.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    CreateEquipmentRequest, EquipmentQuery, EquipmentResponse, UpdateEquipmentRequest,
};

impl ApiClient {
    /// List equipment matching `query`.
    ///
    /// `GET /equipment?search=&types=A,B&department=&isOperational=`
    pub async fn list_equipment(
        &self,
        query: &EquipmentQuery,
    ) -> Result<Vec<EquipmentResponse>, Error> {
        let url = self.api_url("equipment")?;
        self.get(url, &query.to_pairs()).await
    }

    /// Fetch a single record.
    ///
    /// `GET /equipment/{id}`
    pub async fn get_equipment(&self, id: &str) -> Result<EquipmentResponse, Error> {
        let url = self.api_url(&format!("equipment/{id}"))?;
        self.get(url, &[]).await
    }

    /// Create a record; the backend assigns id and timestamps.
    ///
    /// `POST /equipment`
    pub async fn create_equipment(
        &self,
        body: &CreateEquipmentRequest,
    ) -> Result<EquipmentResponse, Error> {
        let url = self.api_url("equipment")?;
        debug!(name = %body.name, code = %body.code, "creating equipment");
        self.post(url, body).await
    }

    /// Apply a partial update.
    ///
    /// `PUT /equipment/{id}`
    pub async fn update_equipment(
        &self,
        id: &str,
        body: &UpdateEquipmentRequest,
    ) -> Result<EquipmentResponse, Error> {
        let url = self.api_url(&format!("equipment/{id}"))?;
        debug!(id, "updating equipment");
        self.put(url, body).await
    }

    /// Delete a record.
    ///
    /// `DELETE /equipment/{id}`
    pub async fn delete_equipment(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("equipment/{id}"))?;
        debug!(id, "deleting equipment");
        self.delete(url).await
    }
}
