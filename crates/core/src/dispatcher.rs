//! Sends the listing lookup and turns its answer into a bot message.

use std::fmt::Display;

use listing_bot_backend::{LookupRequest, LookupResponse, VendorRecord};

use crate::backend_client::BackendClient;
use crate::message::Message;
use crate::prompts;

/// Vendors of a lookup, split by promotion scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VendorPartition {
    /// Vendors promoted in the requested city only.
    pub standard: Vec<VendorRecord>,
    /// Vendors promoted across all cities.
    pub premium: Vec<VendorRecord>,
}

impl VendorPartition {
    /// Returns `true` if neither partition has a vendor.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.premium.is_empty()
    }
}

/// Splits the vendors of all groups, keeping group order and the order
/// within each group.
pub fn partition(resp: LookupResponse) -> VendorPartition {
    let mut vendors = VendorPartition::default();
    for group in resp.data {
        if group.is_city_select_all {
            vendors.premium.extend(group.listing_id);
        } else {
            vendors.standard.extend(group.listing_id);
        }
    }
    vendors
}

/// Maps the outcome of a lookup to the bot message that reports it.
pub fn result_message<E: Display>(result: Result<LookupResponse, E>) -> Message {
    let resp = match result {
        Ok(resp) => resp,
        Err(err) => {
            error!("lookup failed: {err}");
            return Message::bot(prompts::LOOKUP_FAILED);
        }
    };

    let vendors = partition(resp);
    debug!(
        "lookup found {} standard and {} premium vendors",
        vendors.standard.len(),
        vendors.premium.len()
    );
    if vendors.is_empty() {
        return Message::bot(prompts::NO_LISTING);
    }
    Message::final_result(prompts::LISTINGS_FOUND, vendors.standard, vendors.premium)
}

/// Sends one lookup and returns the message reporting its outcome. Failures
/// are not retried.
pub(crate) async fn dispatch(client: &BackendClient, req: LookupRequest) -> Message {
    result_message(client.lookup(req).await)
}
