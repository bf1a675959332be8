use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body of an image upload: the hosted service's identifier for the asset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub public_id: String,
}
