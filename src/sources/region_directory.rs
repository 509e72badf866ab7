use crate::sources::error::FetchError;
use crate::sources::html::first_table;
use crate::sources::http::HttpSource;
use crate::types::region::{RegionDirectory, RegionRecord};
use log::info;

/// Retrieves the region-code reference table.
pub struct RegionDirectoryFetcher {
    http: HttpSource,
    url: String,
}

impl RegionDirectoryFetcher {
    pub fn new(http: HttpSource, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub async fn fetch_region_directory(&self) -> Result<RegionDirectory, FetchError> {
        let body = self.http.get_text(&self.url, &[]).await?;
        let directory = parse_region_directory(&self.url, &body)?;
        info!(
            "Parsed {} regions with columns {:?} from {}",
            directory.len(),
            directory.headers(),
            self.url
        );
        Ok(directory)
    }
}

/// Zips every body row of the first table against its header row.
pub fn parse_region_directory(url: &str, html: &str) -> Result<RegionDirectory, FetchError> {
    let table = first_table(url, html)?;

    let records = table
        .rows
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            if cells.len() != table.headers.len() {
                return Err(FetchError::malformed(
                    url,
                    format!(
                        "row {} has {} cells, header has {}",
                        index + 1,
                        cells.len(),
                        table.headers.len()
                    ),
                ));
            }
            Ok(RegionRecord::new(
                table.headers.iter().cloned().zip(cells).collect(),
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RegionDirectory::new(table.headers, records))
}
