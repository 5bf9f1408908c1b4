// Router endpoints
//
// Only the listing is consumed: the package form offers the result as
// a multi-select of routers a Hotspot package may be restricted to.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ListResponse, RouterResponse};

impl ApiClient {
    /// `GET /routers?pageSize=`
    pub async fn list_routers(&self, page_size: u32) -> Result<Vec<RouterResponse>, Error> {
        let resp: ListResponse<RouterResponse> = self
            .get(
                self.url(&["routers"]),
                &[("pageSize", page_size.to_string())],
            )
            .await?;
        Ok(resp.into_vec())
    }
}
