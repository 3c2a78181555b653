//! Delivery details captured in the second checkout step

use serde::{Deserialize, Serialize};

/// Where and to whom the order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryInfo {
    pub full_name: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
}

impl DeliveryInfo {
    pub fn new(
        full_name: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            address: address.into(),
            city: city.into(),
            zip_code: zip_code.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}
