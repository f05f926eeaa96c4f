use chrono::{DateTime, Utc};

/// Identity fields shared by every bank entity.
///
/// Embedded by composition in `Customer`, `Account` and `Loan` rather than
/// through a base-type hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityInfo {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl EntityInfo {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (ID: {})", self.name, self.id)
    }
}
