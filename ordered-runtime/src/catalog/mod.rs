mod builder;
mod descriptor;

pub use builder::CatalogBuilder;
pub use descriptor::{GroupAssignment, MethodDescriptor, TimerAssignment};

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::warn;

static GLOBAL_CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Immutable map from owning type to its callback-bearing methods.
///
/// Read-only once built, so it can be shared across registries freely.
#[derive(Default)]
pub struct Catalog {
    by_type: HashMap<TypeId, Vec<MethodDescriptor>>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Build the process-wide catalog, once.
    ///
    /// Later calls keep the first catalog and drop `builder` unused.
    pub fn init_global(builder: CatalogBuilder) -> Arc<Catalog> {
        let mut built = false;
        let catalog = GLOBAL_CATALOG.get_or_init(|| {
            built = true;
            Arc::new(builder.build())
        });
        if !built {
            warn!("Callback catalog already initialised, keeping the existing one");
        }
        catalog.clone()
    }

    /// The process-wide catalog, if `init_global` has run.
    pub fn global() -> Option<Arc<Catalog>> {
        GLOBAL_CATALOG.get().cloned()
    }

    pub fn descriptors_for(&self, type_id: TypeId) -> &[MethodDescriptor] {
        self.by_type.get(&type_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn type_count(&self) -> usize {
        self.by_type.len()
    }

    pub fn method_count(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("types", &self.type_count())
            .field("methods", &self.method_count())
            .finish()
    }
}
