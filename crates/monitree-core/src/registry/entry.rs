use std::sync::Arc;

use crate::mode::Mode;
use crate::registry::Registry;
use crate::value::Value;

/// One named slot inside a registry node.
#[derive(Clone)]
pub(crate) enum Entry {
    Metric { value: Arc<dyn Value>, mode: Mode },
    Registry(Arc<Registry>),
}

impl Entry {
    pub(crate) fn as_registry(&self) -> Option<&Arc<Registry>> {
        match self {
            Entry::Registry(r) => Some(r),
            Entry::Metric { .. } => None,
        }
    }

    pub(crate) fn as_metric(&self) -> Option<&Arc<dyn Value>> {
        match self {
            Entry::Metric { value, .. } => Some(value),
            Entry::Registry(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Entry::Metric { .. } => "metric",
            Entry::Registry(_) => "registry",
        }
    }
}
