use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{CollectionId, LinkType, LinkTypeId};

/// One branch of a [`Query`]: a base collection, optionally joined to other
/// collections through a chain of link types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStem {
    /// The collection the stem starts from
    pub collection_id: CollectionId,
    /// Link types traversed from the base collection, in order
    #[serde(default)]
    pub link_type_ids: Vec<LinkTypeId>,
}

impl QueryStem {
    /// A stem over `collection_id` without joins
    pub fn new(collection_id: impl Into<CollectionId>) -> Self {
        Self {
            collection_id: collection_id.into(),
            link_type_ids: Vec::new(),
        }
    }

    /// Join the stem through `link_type_id`
    pub fn join(mut self, link_type_id: impl Into<LinkTypeId>) -> Self {
        self.link_type_ids.push(link_type_id.into());
        self
    }
}

/// The saved search of a [`crate::View`]. Only its shape matters here: which
/// collections and link types it touches. Filters are evaluated elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Branches of the query
    #[serde(default)]
    pub stems: Vec<QueryStem>,
}

impl Query {
    /// A query made of `stems`
    pub fn new(stems: impl IntoIterator<Item = QueryStem>) -> Self {
        Self {
            stems: stems.into_iter().collect(),
        }
    }

    /// Every link type joined by any stem
    pub fn link_type_ids(&self) -> BTreeSet<LinkTypeId> {
        self.stems
            .iter()
            .flat_map(|stem| stem.link_type_ids.iter().cloned())
            .collect()
    }

    /// Every collection the query reaches: the base collection of each stem
    /// plus both collections of every link type the stems join through.
    ///
    /// Link types missing from `link_types` contribute nothing.
    pub fn collection_ids(&self, link_types: &[LinkType]) -> BTreeSet<CollectionId> {
        let joined = self.link_type_ids();
        let linked = link_types
            .iter()
            .filter(|link_type| joined.contains(&link_type.id))
            .flat_map(|link_type| link_type.collection_ids.iter().cloned());

        self.stems
            .iter()
            .map(|stem| stem.collection_id.clone())
            .chain(linked)
            .collect()
    }
}
