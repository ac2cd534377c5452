//! Treatment (guidance) category model

use chrono::{DateTime, Utc};
use clinic_core::traits::{Document, DocumentId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Treatment category; blog posts are filed under one
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    #[serde(rename = "_id", alias = "id")]
    pub id: DocumentId,
    pub title: String,
    pub sub_title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Treatment {
    pub fn new(title: String, sub_title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            sub_title,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Treatment {
    const COLLECTION: &'static str = "treatments";
    const TYPE_NAME: &'static str = "Treatment";

    fn id(&self) -> DocumentId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTreatment {
    pub title: Option<String>,
    pub sub_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
}
