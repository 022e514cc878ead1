//! Visibility modes for registered metrics.

use serde::{Deserialize, Serialize};

/// Visibility of a metric under iteration.
///
/// Lookups by name ignore the mode; only [`Registry::visit`](crate::Registry::visit)
/// and friends consult it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Visible only to full traversals.
    #[default]
    Full,
    /// Visible to full and reported traversals.
    Reported,
}

impl Mode {
    /// Whether a metric registered with `self` passes the traversal `filter`.
    pub fn visible_under(self, filter: Mode) -> bool {
        match filter {
            Mode::Full => true,
            Mode::Reported => self == Mode::Reported,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Full => "full",
            Mode::Reported => "reported",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_filter_sees_everything() {
        assert!(Mode::Full.visible_under(Mode::Full));
        assert!(Mode::Reported.visible_under(Mode::Full));
    }

    #[test]
    fn reported_filter_hides_full_only() {
        assert!(!Mode::Full.visible_under(Mode::Reported));
        assert!(Mode::Reported.visible_under(Mode::Reported));
    }
}
