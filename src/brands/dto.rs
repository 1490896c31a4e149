use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateBrandRequest {
    pub title: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBrandRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub categories: Option<Vec<String>>,
}
