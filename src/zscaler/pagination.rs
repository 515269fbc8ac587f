//! Page through a collection resource.

use super::client::ManagementApi;
use crate::error::{Error, Result};
use serde_json::Value;

/// Fetch every page of `resource` and concatenate the records in received order.
///
/// Stops on an empty page or a page shorter than `page_size`. Any failure aborts
/// the whole fetch, partial results are dropped.
pub async fn fetch_all<A>(api: &A, resource: &str, page_size: u32) -> Result<Vec<Value>>
where
    A: ManagementApi + ?Sized,
{
    let mut records: Vec<Value> = Vec::new();
    let mut page: u32 = 1;

    loop {
        let items = api
            .get_page(resource, page, page_size)
            .await
            .map_err(|e| Error::Fetch {
                resource: resource.to_string(),
                source: Box::new(e),
            })?;
        let count = items.len();
        records.extend(items);
        log::info!(
            "got page#{page:2} record_count=+{count:3} => {total:3} from {resource}",
            total = records.len(),
        );

        if count == 0 || count < page_size as usize {
            break;
        }
        page += 1;
    }

    log::info!("Got {} records from {resource} in {page} page(s)", records.len());
    Ok(records)
}
