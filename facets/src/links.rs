use strata_query::Param;
use strata_query::RequestParams;

/// Renders request parameters into client links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    base_url: String,
}

impl LinkBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn link(&self, params: &RequestParams) -> String {
        let query = params.to_query_string();
        if query.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}?{query}", self.base_url)
        }
    }

    /// Link for a narrowed or broadened result set, which starts again
    /// at the first page.
    pub fn filter_link(&self, params: &RequestParams) -> String {
        self.link(&params.without(Param::Start.name()))
    }
}
