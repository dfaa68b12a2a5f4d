pub mod course;
pub mod preferences;

pub use course::{CatalogCourse, ResolvedRecommendation};
pub use preferences::Preferences;
