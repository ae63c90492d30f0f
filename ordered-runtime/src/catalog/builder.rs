use ::config::Config;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::descriptor::{GroupAssignment, MethodDescriptor, TimerAssignment};
use super::Catalog;
use crate::behavior::{short_type_name, BehaviorRegistration, TimerSpec};
use crate::config::{resolve_config_value, RegistryConfig};
use crate::error::CatalogError;
use crate::registry::ORDERED_BEHAVIORS;
use crate::time_unit::TimeUnit;

/// Builder for the descriptor catalog
pub struct CatalogBuilder {
    registry_config: RegistryConfig,
    settings: Arc<Config>,
    registrations: Vec<BehaviorRegistration>,
    discover: bool,
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogBuilder {
    /// Create a new catalog builder with default options and empty settings
    pub fn new() -> Self {
        Self {
            registry_config: RegistryConfig::default(),
            settings: Arc::new(Config::default()),
            registrations: Vec::new(),
            discover: false,
        }
    }

    /// Use these options (exclusion keywords in particular)
    pub fn config(mut self, registry_config: &RegistryConfig) -> Self {
        self.registry_config = registry_config.clone();
        self
    }

    /// Settings used to resolve `${..}` placeholders in timer tags
    pub fn settings(mut self, settings: Arc<Config>) -> Self {
        self.settings = settings;
        self
    }

    /// Include every `#[ordered]` impl block linked into the binary
    pub fn discover(mut self) -> Self {
        self.discover = true;
        self
    }

    /// Add a registration by hand
    pub fn register(mut self, registration: BehaviorRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    /// Resolve every registration into descriptors.
    ///
    /// Excluded modules are left out; a registration that fails to resolve is skipped
    /// with a warning and the rest still load. A method seen twice for the same type, e.g.
    /// discovered and also registered by hand, is kept once.
    pub fn build(self) -> Catalog {
        let discovered: Vec<BehaviorRegistration> = if self.discover {
            ORDERED_BEHAVIORS.iter().map(|entry| entry()).collect()
        } else {
            Vec::new()
        };

        let mut by_type: HashMap<TypeId, Vec<MethodDescriptor>> = HashMap::new();
        let mut excluded = 0usize;
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for registration in discovered.into_iter().chain(self.registrations) {
            if self.registry_config.is_excluded(registration.module_path) {
                debug!(
                    type_name = registration.type_name,
                    module_path = registration.module_path,
                    "Excluded behavior type"
                );
                excluded += 1;
                continue;
            }

            match describe(&registration, &self.settings) {
                Ok(descriptors) if descriptors.is_empty() => {}
                Ok(descriptors) => {
                    let known = by_type.entry(registration.type_id).or_default();
                    for descriptor in descriptors {
                        if known
                            .iter()
                            .any(|existing| existing.method_name() == descriptor.method_name())
                        {
                            debug!(
                                type_name = registration.type_name,
                                method = descriptor.method_name(),
                                "Ignoring repeated registration of method"
                            );
                            duplicates += 1;
                            continue;
                        }
                        known.push(descriptor);
                    }
                }
                Err(e) => {
                    warn!(
                        type_name = registration.type_name,
                        error = %e,
                        "Skipping behavior type"
                    );
                    skipped += 1;
                }
            }
        }

        let catalog = Catalog { by_type };
        info!(
            types = catalog.type_count(),
            methods = catalog.method_count(),
            excluded,
            skipped,
            duplicates,
            "Built callback catalog"
        );
        catalog
    }
}

fn describe(
    registration: &BehaviorRegistration,
    settings: &Config,
) -> Result<Vec<MethodDescriptor>, CatalogError> {
    let owner_name = short_type_name(registration.type_name);
    let mut descriptors = Vec::with_capacity(registration.methods.len());

    for method in &registration.methods {
        let qualified = format!("{}::{}", owner_name, method.name);

        let groups = method
            .groups
            .iter()
            .map(|spec| GroupAssignment {
                group: spec.group.to_string(),
                priority: spec.priority,
            })
            .collect();
        let timers = method
            .timers
            .iter()
            .map(|spec| resolve_timer(spec, settings, &qualified))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(descriptor) = MethodDescriptor::new(
            registration.type_id,
            owner_name,
            method.name,
            method.invoke.clone(),
            groups,
            timers,
        ) {
            descriptors.push(descriptor);
        }
    }

    Ok(descriptors)
}

fn resolve_timer(
    spec: &TimerSpec,
    settings: &Config,
    method: &str,
) -> Result<TimerAssignment, CatalogError> {
    let unit_str = resolve(spec.time_unit, settings, method)?;
    let time_unit: TimeUnit = unit_str.parse().map_err(|_| CatalogError::BadTimeUnit {
        method: method.to_string(),
        unit: unit_str.clone(),
    })?;

    Ok(TimerAssignment {
        interval_secs: seconds(spec.interval, "interval", time_unit, settings, method)?,
        start_delay_secs: seconds(spec.start_delay, "start_delay", time_unit, settings, method)?,
    })
}

fn seconds(
    raw: &str,
    field: &'static str,
    time_unit: TimeUnit,
    settings: &Config,
    method: &str,
) -> Result<f64, CatalogError> {
    let resolved = resolve(raw, settings, method)?;
    let secs = time_unit
        .parse_secs(&resolved)
        .ok_or_else(|| CatalogError::BadDuration {
            method: method.to_string(),
            value: resolved.clone(),
        })?;

    if !secs.is_finite() || secs < 0.0 {
        return Err(CatalogError::OutOfRange {
            method: method.to_string(),
            field,
            secs,
        });
    }
    Ok(secs)
}

fn resolve(raw: &str, settings: &Config, method: &str) -> Result<String, CatalogError> {
    resolve_config_value(raw, settings).map_err(|source| CatalogError::Unresolved {
        method: method.to_string(),
        value: raw.to_string(),
        source,
    })
}
