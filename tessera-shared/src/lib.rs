pub mod market;
pub mod section;

pub use market::{MarketConditions, MarketUpdate};
pub use section::SectionProfile;
