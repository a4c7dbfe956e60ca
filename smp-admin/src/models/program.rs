//! Program model (unit-owned event records with photos)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference to one stored photo
///
/// `key` is the storage identifier handed back by the photo store and is
/// what deletion uses; `url` is the public serving path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub key: String,
    pub url: String,
}

/// Program (event) record owned by exactly one unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    /// Ordered photo references; count drives the program's point value
    pub photos: Vec<PhotoRef>,
    /// Member who authored the program, if known
    pub created_by: Option<Uuid>,
}

impl Program {
    pub fn new(
        unit_id: Uuid,
        name: String,
        description: String,
        date: NaiveDate,
        photos: Vec<PhotoRef>,
        created_by: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_id,
            name,
            description,
            date,
            photos,
            created_by,
        }
    }

    pub fn photo_count(&self) -> usize {
        self.photos.len()
    }
}
