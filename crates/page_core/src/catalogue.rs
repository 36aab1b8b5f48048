use shared::{domain::PhoneSummary, protocol::phone_list_path};
use tracing::debug;

use crate::{
    error::{LoadContext, PageError},
    fetcher::{fetch_as, DataFetcher},
};

pub fn filter_phones(phones: Vec<PhoneSummary>, query: Option<&str>) -> Vec<PhoneSummary> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return phones;
    };
    let needle = query.to_lowercase();
    phones
        .into_iter()
        .filter(|phone| phone.name.to_lowercase().contains(&needle))
        .collect()
}

/// Fetches the full list and filters it locally. The query still goes to the server as
/// `?query=`; the server does not filter.
pub async fn load_filtered(
    fetcher: &dyn DataFetcher,
    query: Option<&str>,
) -> Result<Vec<PhoneSummary>, PageError> {
    let path = phone_list_path(query);
    let phones: Vec<PhoneSummary> = fetch_as(fetcher, &path)
        .await
        .map_err(|err| PageError::fetch(LoadContext::Catalogue, err))?;
    let total = phones.len();
    let filtered = filter_phones(phones, query);
    debug!(%path, total, shown = filtered.len(), "catalogue filtered");
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones(names: &[&str]) -> Vec<PhoneSummary> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| PhoneSummary::new(idx.to_string(), *name))
            .collect()
    }

    fn names(phones: &[PhoneSummary]) -> Vec<&str> {
        phones.iter().map(|phone| phone.name.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_list_unchanged() {
        let list = phones(&["Nexus S", "iPhone", "Motorola XOOM"]);
        assert_eq!(filter_phones(list.clone(), None), list);
        assert_eq!(filter_phones(list.clone(), Some("")), list);
    }

    #[test]
    fn matches_name_case_insensitively() {
        let list = phones(&["Nexus S", "iPhone"]);
        assert_eq!(names(&filter_phones(list, Some("nex"))), vec!["Nexus S"]);

        let list = phones(&["Nexus S", "iPhone"]);
        assert_eq!(names(&filter_phones(list, Some("IPHO"))), vec!["iPhone"]);
    }

    #[test]
    fn keeps_relative_order_of_matches() {
        let list = phones(&[
            "Motorola XOOM",
            "Nexus S",
            "MOTOROLA ATRIX",
            "Dell Streak",
            "Motorola DEFY",
        ]);
        let filtered = filter_phones(list, Some("motorola"));
        assert_eq!(
            names(&filtered),
            vec!["Motorola XOOM", "MOTOROLA ATRIX", "Motorola DEFY"]
        );
        let ids: Vec<&str> = filtered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "2", "4"]);
    }

    #[test]
    fn no_match_yields_empty_list() {
        assert!(filter_phones(phones(&["Nexus S"]), Some("pixel")).is_empty());
    }
}
