use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::catalog::model::{ComponentCategory, ComponentDescriptor};
use crate::foundation::error::QuizSceneResult;

/// Read access to component descriptors by id.
///
/// Validation and rendering only need lookups, so they take `&dyn ComponentLookup` and work
/// against a live [`CatalogRegistry`], a [`Catalog`] snapshot, or a test double.
pub trait ComponentLookup {
    /// Descriptor registered under `id`.
    fn lookup(&self, id: &str) -> Option<&ComponentDescriptor>;

    /// Whether `id` is registered.
    fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }
}

/// Immutable, cheaply clonable view of catalog contents.
///
/// Cloning shares storage; the registry copies on write, so snapshots never observe later
/// mutations.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    entries: Arc<IndexMap<String, Arc<ComponentDescriptor>>>,
}

impl Catalog {
    /// Descriptor registered under `id`.
    pub fn get(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.entries.get(id).map(Arc::as_ref)
    }

    /// All descriptors in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.entries.values().map(Arc::as_ref)
    }

    /// Descriptors of one category, in insertion order.
    pub fn list_by_category(
        &self,
        category: ComponentCategory,
    ) -> impl Iterator<Item = &ComponentDescriptor> {
        self.list().filter(move |d| d.category == category)
    }

    /// Registered ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entries_mut(&mut self) -> &mut IndexMap<String, Arc<ComponentDescriptor>> {
        Arc::make_mut(&mut self.entries)
    }
}

impl ComponentLookup for Catalog {
    fn lookup(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.get(id)
    }
}

impl FromIterator<ComponentDescriptor> for Catalog {
    fn from_iter<T: IntoIterator<Item = ComponentDescriptor>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|d| (d.id.clone(), Arc::new(d)))
            .collect();
        Self {
            entries: Arc::new(entries),
        }
    }
}

/// A change applied to a [`CatalogRegistry`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEvent {
    /// A descriptor was inserted, or replaced an existing one (`replaced == true`).
    Added {
        /// Descriptor id.
        id: String,
        /// Whether a descriptor with the same id existed before.
        replaced: bool,
    },
    /// An existing descriptor was updated in place.
    Updated {
        /// Descriptor id.
        id: String,
    },
    /// A descriptor was removed.
    Removed {
        /// Descriptor id.
        id: String,
    },
}

impl CatalogEvent {
    /// Id of the affected descriptor.
    pub fn id(&self) -> &str {
        match self {
            Self::Added { id, .. } | Self::Updated { id } | Self::Removed { id } => id,
        }
    }
}

/// Handle returned by [`CatalogRegistry::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Callback invoked after every effective registry mutation.
pub type CatalogListener = Box<dyn FnMut(&CatalogEvent, &Catalog) + Send>;

/// Mutable component registry with synchronous change notification.
///
/// The registry is owned by a single writer (usually an editor session). Every effective
/// mutation calls each listener exactly once, in subscription order, after the change is visible
/// through [`get`](Self::get).
#[derive(Default)]
pub struct CatalogRegistry {
    catalog: Catalog,
    listeners: Vec<(SubscriptionId, CatalogListener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for CatalogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogRegistry")
            .field("components", &self.catalog.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl CatalogRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in components.
    pub fn with_builtin() -> QuizSceneResult<Self> {
        let mut registry = Self::new();
        for descriptor in crate::catalog::builtin::builtin_components()? {
            registry.add(descriptor);
        }
        Ok(registry)
    }

    /// Load every `*.json` descriptor in `dir` (sorted by file name) into the registry.
    ///
    /// Each file is schema-validated; the first invalid file aborts the load, leaving the
    /// components loaded before it in place. Returns the number of loaded descriptors.
    #[tracing::instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> QuizSceneResult<usize> {
        let descriptors = crate::catalog::store::read_component_dir(dir.as_ref())?;
        let n = descriptors.len();
        for descriptor in descriptors {
            self.add(descriptor);
        }
        tracing::debug!(loaded = n, "catalog directory loaded");
        Ok(n)
    }

    /// Descriptor registered under `id`.
    pub fn get(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.catalog.get(id)
    }

    /// All descriptors in insertion order.
    pub fn list(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.catalog.list()
    }

    /// Descriptors of one category, in insertion order.
    pub fn list_by_category(
        &self,
        category: ComponentCategory,
    ) -> impl Iterator<Item = &ComponentDescriptor> {
        self.catalog.list_by_category(category)
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Immutable copy of the current contents for validation or rendering passes.
    pub fn snapshot(&self) -> Catalog {
        self.catalog.clone()
    }

    /// Insert `descriptor`, replacing any descriptor with the same id (which keeps its position).
    pub fn add(&mut self, descriptor: ComponentDescriptor) {
        let id = descriptor.id.clone();
        let replaced = self
            .catalog
            .entries_mut()
            .insert(id.clone(), Arc::new(descriptor))
            .is_some();
        self.emit(CatalogEvent::Added { id, replaced });
    }

    /// Replace an existing descriptor. Returns `false` (and notifies nobody) if the id is absent.
    pub fn update(&mut self, descriptor: ComponentDescriptor) -> bool {
        let Some(slot) = self.catalog.entries_mut().get_mut(&descriptor.id) else {
            return false;
        };
        let id = descriptor.id.clone();
        *slot = Arc::new(descriptor);
        self.emit(CatalogEvent::Updated { id });
        true
    }

    /// Remove a descriptor. Returns it, or `None` (and notifies nobody) if the id is absent.
    pub fn remove(&mut self, id: &str) -> Option<ComponentDescriptor> {
        if !self.catalog.entries.contains_key(id) {
            return None;
        }
        let removed = self.catalog.entries_mut().shift_remove(id)?;
        self.emit(CatalogEvent::Removed { id: id.to_string() });
        Some(Arc::unwrap_or_clone(removed))
    }

    /// Register a listener for subsequent mutations.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&CatalogEvent, &Catalog) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Drop a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: CatalogEvent) {
        tracing::debug!(?event, "catalog changed");
        for (_, listener) in &mut self.listeners {
            listener(&event, &self.catalog);
        }
    }
}

impl ComponentLookup for CatalogRegistry {
    fn lookup(&self, id: &str) -> Option<&ComponentDescriptor> {
        self.get(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/registry.rs"]
mod tests;
