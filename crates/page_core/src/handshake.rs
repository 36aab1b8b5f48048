use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use shared::{
    domain::{PhoneDetails, PhoneId},
    protocol::phone_details_path,
};

use crate::{
    error::{LoadContext, PageError},
    events::{CatalogueEvent, CatalogueEventKind, EventBus, OnceSignal},
    fetcher::{fetch_as, DataFetcher},
};

pub async fn load_details(
    fetcher: &dyn DataFetcher,
    phone_id: &PhoneId,
    context: LoadContext,
) -> Result<PhoneDetails, PageError> {
    fetch_as(fetcher, &phone_details_path(phone_id))
        .await
        .map_err(|err| PageError::fetch(context, err))
}

pub struct SelectionHandshake {
    phone_id: PhoneId,
    extra_action: OnceSignal<CatalogueEvent>,
    details: BoxFuture<'static, Result<PhoneDetails, PageError>>,
}

impl SelectionHandshake {
    pub fn begin(
        catalogue_events: &Arc<EventBus<CatalogueEvent>>,
        fetcher: Arc<dyn DataFetcher>,
        phone_id: PhoneId,
    ) -> Self {
        let extra_action = catalogue_events.once(CatalogueEventKind::ExtraAction);
        let id = phone_id.clone();
        let details =
            async move { load_details(fetcher.as_ref(), &id, LoadContext::Selection).await }
                .boxed();
        Self {
            phone_id,
            extra_action,
            details,
        }
    }

    pub fn phone_id(&self) -> &PhoneId {
        &self.phone_id
    }

    /// Resolves once the extra action has fired and the details have arrived, in either
    /// order. The first failure wins and the other half is dropped with it.
    pub async fn settle(self) -> Result<PhoneDetails, PageError> {
        let Self {
            phone_id,
            extra_action,
            details,
        } = self;
        let extra_action = async move {
            extra_action
                .await
                .map(drop)
                .map_err(|_| PageError::ExtraActionDropped { phone_id })
        };
        let ((), details) = future::try_join(extra_action, details).await?;
        Ok(details)
    }
}
