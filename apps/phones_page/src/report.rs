use page_core::{LoadContext, PageEvent, PageFailure};
use shared::domain::{PhoneRef, ViewState};

pub fn describe_event(event: &PageEvent) -> Option<String> {
    match event {
        PageEvent::PhonesShown { query, count } => Some(match query.as_deref() {
            Some(query) if !query.is_empty() => format!("{count} phones match '{query}'"),
            _ => format!("{count} phones in catalogue"),
        }),
        PageEvent::PhoneShown(PhoneRef::Id(id)) => {
            Some(format!("opening {id}; waiting for details and 'extra'"))
        }
        PageEvent::PhoneShown(PhoneRef::Full(_)) => None,
        PageEvent::ViewChanged(ViewState::Catalogue) => Some("catalogue visible".to_string()),
        PageEvent::ViewChanged(ViewState::Viewer) => Some("viewer visible".to_string()),
        PageEvent::ItemAdded(_) => None,
        PageEvent::NavigationSuperseded { phone_id } => {
            Some(format!("details for {phone_id} arrived too late and were dropped"))
        }
        PageEvent::Failed(failure) => Some(describe_failure(failure)),
    }
}

pub fn describe_failure(failure: &PageFailure) -> String {
    let lower = failure.message().to_ascii_lowercase();
    let hint = if lower.contains("http 404") {
        match failure.context() {
            LoadContext::InitialPhone | LoadContext::Selection => "no such phone",
            LoadContext::Catalogue => "catalogue data missing on server",
        }
    } else if lower.contains("request to")
        || lower.contains("connection")
        || lower.contains("timed out")
        || lower.contains("dns")
    {
        "server unreachable; check --base-url"
    } else if lower.contains("malformed json") {
        "server sent data the page cannot read"
    } else {
        "load failed"
    };
    format!("error: {hint} ({})", failure.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_core::{FetchError, PageError};

    fn failure(context: LoadContext, source: FetchError) -> PageFailure {
        PageFailure::from(&PageError::fetch(context, source))
    }

    #[test]
    fn missing_phone_is_named_as_such() {
        let failure = failure(
            LoadContext::Selection,
            FetchError::Status {
                path: "/data/phones/x.json".into(),
                status: 404,
            },
        );
        assert!(describe_failure(&failure).starts_with("error: no such phone"));
    }

    #[test]
    fn missing_list_points_at_server_data() {
        let failure = failure(
            LoadContext::Catalogue,
            FetchError::Status {
                path: "/data/phones/phones.json".into(),
                status: 404,
            },
        );
        assert!(describe_failure(&failure).contains("catalogue data missing"));
    }

    #[test]
    fn unavailable_source_falls_back_to_generic_hint() {
        let failure = failure(
            LoadContext::Catalogue,
            FetchError::Unavailable {
                path: "/data/phones/phones.json".into(),
                message: "offline".into(),
            },
        );
        assert!(describe_failure(&failure).starts_with("error: load failed"));
    }

    #[test]
    fn filtered_list_mentions_query() {
        let line = describe_event(&PageEvent::PhonesShown {
            query: Some("nex".into()),
            count: 1,
        });
        assert_eq!(line.as_deref(), Some("1 phones match 'nex'"));
        let line = describe_event(&PageEvent::PhonesShown {
            query: Some(String::new()),
            count: 3,
        });
        assert_eq!(line.as_deref(), Some("3 phones in catalogue"));
    }
}
