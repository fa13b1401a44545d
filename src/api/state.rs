use std::sync::Arc;

use crate::{
    config::{PreferenceSettings, RecommendationSettings},
    db::BookStore,
    services::taxonomy::Taxonomy,
};

/// Shared application state
///
/// Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BookStore>,
    pub taxonomy: Arc<Taxonomy>,
    pub preferences: PreferenceSettings,
    pub recommendations: RecommendationSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn BookStore>, taxonomy: Taxonomy) -> Self {
        Self {
            store,
            taxonomy: Arc::new(taxonomy),
            preferences: PreferenceSettings::default(),
            recommendations: RecommendationSettings::default(),
        }
    }

    pub fn with_settings(
        mut self,
        preferences: PreferenceSettings,
        recommendations: RecommendationSettings,
    ) -> Self {
        self.preferences = preferences;
        self.recommendations = recommendations;
        self
    }
}
