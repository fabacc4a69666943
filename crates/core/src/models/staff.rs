use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub total_rating: i64,
    pub num_reviews: i64,
    pub service_ids: Vec<Uuid>,
}

impl Staff {
    /// Average review score, `None` until the first review arrives.
    pub fn rating(&self) -> Option<f64> {
        if self.num_reviews == 0 {
            None
        } else {
            Some(self.total_rating as f64 / self.num_reviews as f64)
        }
    }

    pub fn offers(&self, service_id: Uuid) -> bool {
        self.service_ids.contains(&service_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStaffRequest {
    pub name: String,
    #[serde(default)]
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStaffServicesRequest {
    pub service_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffResponse {
    pub id: Uuid,
    pub name: String,
    pub rating: Option<f64>,
    pub num_reviews: i64,
    pub service_ids: Vec<Uuid>,
}

impl From<Staff> for StaffResponse {
    fn from(staff: Staff) -> Self {
        let rating = staff.rating();
        Self {
            id: staff.id,
            name: staff.name,
            rating,
            num_reviews: staff.num_reviews,
            service_ids: staff.service_ids,
        }
    }
}
