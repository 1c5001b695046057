//! Entity types for the domain collections.
//!
//! Entities never hold references to one another; relationships are
//! expressed as foreign-key `EntityId` fields so every collection can be
//! serialized on its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Immutable identifier of an entity within its collection.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an existing identifier (e.g. one supplied by a seed).
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier. Identifiers are never reused.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Timestamp(millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// A uniquely identified record stored in a list collection.
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    /// Wire name of the collection this entity lives in.
    const COLLECTION: &'static str;

    fn id(&self) -> &EntityId;
}

// --- Asset rental ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AssetStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
    Retired,
}

/// Label attached to an asset image by the annotation service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageAnnotation {
    pub label: String,
    pub confidence: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub monthly_price: f64,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub provider_id: Option<EntityId>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub annotations: Vec<ImageAnnotation>,
}

impl Asset {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, monthly_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            monthly_price,
            status: AssetStatus::Available,
            provider_id: None,
            image_url: None,
            annotations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
}

// --- Knowledge base ---

/// Result of the document analysis service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeDocument {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub uploaded_at: Timestamp,
    #[serde(default)]
    pub analysis: Option<DocumentAnalysis>,
}

// --- Opportunities ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OpportunityStage {
    #[default]
    Lead,
    Qualified,
    Proposal,
    Won,
    Lost,
}

/// Proposal text produced by the proposal generation service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub body: String,
    pub generated_at: Timestamp,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub stage: OpportunityStage,
    #[serde(default)]
    pub proposal: Option<Proposal>,
}

// --- Staff and investors ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadershipMember {
    pub id: EntityId,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCategory {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// --- Student records ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub enrolled_at: Timestamp,
}

// --- Shopping cart ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: EntityId,
    pub product_id: EntityId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

// --- Settings (singleton) ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessSettings {
    pub company_name: String,
    pub currency: String,
    pub tax_rate: f64,
    pub locale: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            currency: "USD".to_string(),
            tax_rate: 0.0,
            locale: "en-US".to_string(),
        }
    }
}

// --- Cost settings and pricing ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRate {
    pub id: EntityId,
    pub label: String,
    pub hourly_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRow {
    pub id: EntityId,
    pub tier: String,
    pub monthly_price: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

// --- Point of sale ---

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosProduct {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = EntityId::generate();
        let b = EntityId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_asset_camel_case_wire_shape() {
        let asset: Asset = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "name": "Drill",
            "monthlyPrice": 50,
            "status": "Available"
        }))
        .unwrap();

        assert_eq!(asset.id.as_str(), "a1");
        assert_eq!(asset.monthly_price, 50.0);
        assert!(asset.annotations.is_empty());
    }

    #[test]
    fn test_cart_line_total() {
        let item = CartItem {
            id: "c1".into(),
            product_id: "p1".into(),
            name: "Coffee".into(),
            unit_price: 2.5,
            quantity: 4,
        };
        assert_eq!(item.line_total(), 10.0);
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: BusinessSettings =
            serde_json::from_value(serde_json::json!({ "companyName": "Acme" })).unwrap();
        assert_eq!(settings.company_name, "Acme");
        assert_eq!(settings.currency, "USD");
    }
}
