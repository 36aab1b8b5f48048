use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::domain::PhoneId;

pub const PHONES_ROOT: &str = "/data/phones";
pub const PHONE_LIST_FILE: &str = "phones.json";

/// `?query=` parameter of the list resource. The server accepts and ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhoneListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

pub fn phone_list_path(query: Option<&str>) -> String {
    let mut path = format!("{PHONES_ROOT}/{PHONE_LIST_FILE}");
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        path.push_str("?query=");
        path.extend(form_urlencoded::byte_serialize(query.as_bytes()));
    }
    path
}

pub fn phone_details_path(id: &PhoneId) -> String {
    format!("{PHONES_ROOT}/{}.json", id.as_str())
}
