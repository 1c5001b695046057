//! The application snapshot and its named collections.

use crate::error::{Result, StoreError};
use crate::state::operations::first_duplicate;
use crate::types::{
    AgentCategory, Asset, CartItem, CostRate, Entity, EntityId, KnowledgeDocument, LeadershipMember,
    Opportunity, PosProduct, PricingRow, Provider, BusinessSettings, Student,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named, independently addressable slice of [`AppState`].
///
/// Every collection lives behind its own `Arc`, so a snapshot can be
/// rebuilt with one slot replaced while all others keep their identity.
pub trait Collection: Send + Sync + 'static {
    type Value: ?Sized + Send + Sync + 'static;

    /// Wire name of the collection (seed key).
    const NAME: &'static str;

    fn slot(state: &AppState) -> &Arc<Self::Value>;

    fn slot_mut(state: &mut AppState) -> &mut Arc<Self::Value>;
}

/// Complete application snapshot.
///
/// Cloning is shallow: only the per-collection `Arc`s are copied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AppState {
    assets: Arc<Vec<Asset>>,
    providers: Arc<Vec<Provider>>,
    knowledge_documents: Arc<Vec<KnowledgeDocument>>,
    opportunities: Arc<Vec<Opportunity>>,
    leadership: Arc<Vec<LeadershipMember>>,
    agent_categories: Arc<Vec<AgentCategory>>,
    students: Arc<Vec<Student>>,
    cart: Arc<Vec<CartItem>>,
    settings: Arc<BusinessSettings>,
    cost_rates: Arc<Vec<CostRate>>,
    pricing: Arc<Vec<PricingRow>>,
    pos_products: Arc<Vec<PosProduct>>,
    theme: Arc<str>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            assets: Arc::default(),
            providers: Arc::default(),
            knowledge_documents: Arc::default(),
            opportunities: Arc::default(),
            leadership: Arc::default(),
            agent_categories: Arc::default(),
            students: Arc::default(),
            cart: Arc::default(),
            settings: Arc::default(),
            cost_rates: Arc::default(),
            pricing: Arc::default(),
            pos_products: Arc::default(),
            theme: Arc::from(""),
        }
    }
}

macro_rules! validate_unique_ids {
    ($state:expr, $($marker:ident),+ $(,)?) => {
        $(
            if let Some(id) = first_duplicate($state.get::<$marker>().as_slice()) {
                return Err(StoreError::DuplicateId {
                    collection: $marker::NAME,
                    id: id.clone(),
                });
            }
        )+
    };
}

impl AppState {
    /// Read one collection.
    pub fn get<C: Collection>(&self) -> &Arc<C::Value> {
        C::slot(self)
    }

    /// Build a new snapshot with collection `C` replaced.
    ///
    /// Every other collection keeps its `Arc` identity.
    pub fn with<C: Collection>(&self, value: Arc<C::Value>) -> AppState {
        let mut next = self.clone();
        *C::slot_mut(&mut next) = value;
        next
    }

    /// Check that no list collection carries two entities with one id.
    pub fn validate(&self) -> Result<()> {
        validate_unique_ids!(
            self,
            Assets,
            Providers,
            KnowledgeDocuments,
            Opportunities,
            Leadership,
            AgentCategories,
            Students,
            Cart,
            CostRates,
            Pricing,
            PosProducts,
        );
        Ok(())
    }
}

macro_rules! list_collections {
    ($($(#[$meta:meta])* $marker:ident => $field:ident: $item:ty = $name:literal),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Copy, Debug, Default)]
            pub struct $marker;

            impl Collection for $marker {
                type Value = Vec<$item>;
                const NAME: &'static str = $name;

                fn slot(state: &AppState) -> &Arc<Self::Value> {
                    &state.$field
                }

                fn slot_mut(state: &mut AppState) -> &mut Arc<Self::Value> {
                    &mut state.$field
                }
            }

            impl Entity for $item {
                const COLLECTION: &'static str = $name;

                fn id(&self) -> &EntityId {
                    &self.id
                }
            }
        )+
    };
}

list_collections!(
    /// Rentable assets, newest first.
    Assets => assets: Asset = "assets",
    Providers => providers: Provider = "providers",
    /// Knowledge base documents, with optional analysis results.
    KnowledgeDocuments => knowledge_documents: KnowledgeDocument = "knowledgeDocuments",
    Opportunities => opportunities: Opportunity = "opportunities",
    /// Staff and investor profiles.
    Leadership => leadership: LeadershipMember = "leadership",
    AgentCategories => agent_categories: AgentCategory = "agentCategories",
    Students => students: Student = "students",
    /// Shopping cart line items.
    Cart => cart: CartItem = "cart",
    CostRates => cost_rates: CostRate = "costRates",
    Pricing => pricing: PricingRow = "pricing",
    PosProducts => pos_products: PosProduct = "posProducts",
);

/// Singleton application settings.
#[derive(Clone, Copy, Debug, Default)]
pub struct Settings;

impl Collection for Settings {
    type Value = BusinessSettings;
    const NAME: &'static str = "settings";

    fn slot(state: &AppState) -> &Arc<Self::Value> {
        &state.settings
    }

    fn slot_mut(state: &mut AppState) -> &mut Arc<Self::Value> {
        &mut state.settings
    }
}

/// Theme stylesheet text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Theme;

impl Collection for Theme {
    type Value = str;
    const NAME: &'static str = "theme";

    fn slot(state: &AppState) -> &Arc<Self::Value> {
        &state.theme
    }

    fn slot_mut(state: &mut AppState) -> &mut Arc<Self::Value> {
        &mut state.theme
    }
}

/// Wire names of every collection, in declaration order.
pub const COLLECTION_NAMES: &[&str] = &[
    Assets::NAME,
    Providers::NAME,
    KnowledgeDocuments::NAME,
    Opportunities::NAME,
    Leadership::NAME,
    AgentCategories::NAME,
    Students::NAME,
    Cart::NAME,
    Settings::NAME,
    CostRates::NAME,
    Pricing::NAME,
    PosProducts::NAME,
    Theme::NAME,
];
