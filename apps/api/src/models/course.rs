use serde::{Deserialize, Deserializer, Serialize};

/// Id carried by the placeholder course substituted for unresolved recommendations.
pub const PLACEHOLDER_COURSE_ID: &str = "unknown";
pub const PLACEHOLDER_DESCRIPTION: &str = "Course details not available";

/// A course record as held by the catalog service.
///
/// Snapshots are read-only for the recommendation code: they are fetched once per
/// batch and only ever borrowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCourse {
    #[serde(deserialize_with = "deserialize_course_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default, deserialize_with = "deserialize_categories")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
}

impl CatalogCourse {
    /// Synthetic stand-in for a recommendation that matched nothing in the catalog.
    /// The title is kept verbatim so clients can still show what was suggested.
    pub fn placeholder(raw_title: &str) -> Self {
        Self {
            id: PLACEHOLDER_COURSE_ID.to_string(),
            title: raw_title.to_string(),
            description: PLACEHOLDER_DESCRIPTION.to_string(),
            credits: 0,
            categories: Vec::new(),
            avg_rating: Some(0.0),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_COURSE_ID
    }
}

/// The catalog service emits numeric ids; static snapshots tend to use strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_course_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Categories arrive either as bare names or as `{ "name": ... }` objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Name(String),
    Named { name: String },
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<RawCategory>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .map(|c| match c {
            RawCategory::Name(name) | RawCategory::Named { name } => name,
        })
        .collect())
}

/// One recommendation as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRecommendation {
    pub course: CatalogCourse,
    pub reason: String,
}
