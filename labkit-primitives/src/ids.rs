//! Tool instance identifier.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use uuid::Uuid;

/// Identity of one constructed tool instance.
///
/// Every call to the registry's `create` mints a fresh id, so log lines and
/// exported snapshots from two instances of the same tool stay distinguishable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Mints a new v4 instance id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
