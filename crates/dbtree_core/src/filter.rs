use crate::entity::{ConnectType, Entity};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Search and filter criteria from the resource tree's filter bar.
///
/// Empty allow-lists do not restrict anything.
#[derive(Default)]
pub struct EntityFilter {
    pub name_query: Option<String>,
    pub environment_ids: Vec<i64>,
    pub connect_types: Vec<ConnectType>,
    pub data_source_ids: Vec<i64>,
    matcher: SkimMatcherV2,
}

impl EntityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_query(mut self, query: impl Into<String>) -> Self {
        self.name_query = Some(query.into());
        self
    }

    pub fn with_environments(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.environment_ids = ids.into_iter().collect();
        self
    }

    pub fn with_connect_types(mut self, types: impl IntoIterator<Item = ConnectType>) -> Self {
        self.connect_types = types.into_iter().collect();
        self
    }

    pub fn with_data_sources(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.data_source_ids = ids.into_iter().collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name_query.as_deref().is_none_or(str::is_empty)
            && self.environment_ids.is_empty()
            && self.connect_types.is_empty()
            && self.data_source_ids.is_empty()
    }

    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(query) = self.name_query.as_deref()
            && !query.is_empty()
            && self.matcher.fuzzy_match(&entity.name, query).is_none()
        {
            return false;
        }

        if !self.environment_ids.is_empty()
            && !entity
                .environment
                .as_ref()
                .is_some_and(|env| self.environment_ids.contains(&env.id))
        {
            return false;
        }

        if !self.connect_types.is_empty()
            && !entity
                .connect_type()
                .is_some_and(|t| self.connect_types.contains(&t))
        {
            return false;
        }

        // Logical databases have no physical data source to filter on.
        if !self.data_source_ids.is_empty()
            && !entity.is_logical()
            && !entity
                .data_source
                .as_ref()
                .is_some_and(|ds| self.data_source_ids.contains(&ds.id))
        {
            return false;
        }

        true
    }
}
