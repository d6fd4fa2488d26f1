use crate::data::{decode_request, SearchRequest};
use crate::error::Result;
use std::path::Path;

pub struct RequestLoader;

impl RequestLoader {
    /// Read a JSON search request from disk and validate it
    pub fn load_json(path: &Path) -> Result<SearchRequest> {
        let contents = std::fs::read_to_string(path)?;
        let request = decode_request(&contents)?;
        log::info!(
            "Loaded search request with {} assets from {}",
            request.asset_data.len(),
            path.display()
        );
        Ok(request)
    }
}
