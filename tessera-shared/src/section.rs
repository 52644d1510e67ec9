use serde::{Deserialize, Serialize};

/// A venue section as seen by the analytics module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionProfile {
    pub section_id: String,
    pub name: String,

    /// Current listed price per seat, in minor currency units
    pub current_price: f64,

    /// Sellable seats in the section
    pub capacity: u32,
}

impl SectionProfile {
    pub fn new(section_id: impl Into<String>, name: impl Into<String>, current_price: f64, capacity: u32) -> Self {
        Self {
            section_id: section_id.into(),
            name: name.into(),
            current_price,
            capacity,
        }
    }
}
