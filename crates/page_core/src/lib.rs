use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{CartItem, PhoneId, PhoneRef, ViewState};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

pub mod catalogue;
pub mod components;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod handshake;
pub mod location;

pub use catalogue::filter_phones;
pub use components::{CatalogueView, PageComponents, PhoneViewer, SearchBox, ShoppingCart};
pub use error::{FetchError, LoadContext, PageError, PageFailure};
pub use events::{
    CatalogueEvent, CatalogueEventKind, EventBus, SearchEvent, SearchEventKind,
    SubscriptionHandle, ViewerEvent, ViewerEventKind,
};
pub use fetcher::{DataFetcher, HttpFetcher};
pub use handshake::SelectionHandshake;
pub use location::{phone_id_from_fragment, Location, StaticLocation};

use crate::{catalogue::load_filtered, handshake::load_details};

const PAGE_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ViewChanged(ViewState),
    PhoneShown(PhoneRef),
    PhonesShown { query: Option<String>, count: usize },
    ItemAdded(CartItem),
    /// A selection or deep link settled, successfully or not, after a newer navigation
    /// and was not applied.
    NavigationSuperseded { phone_id: PhoneId },
    Failed(PageFailure),
}

struct PageState {
    view: Option<ViewState>,
    navigation: u64,
}

struct PageWiring {
    phone_selected: SubscriptionHandle,
    back: SubscriptionHandle,
    add: SubscriptionHandle,
    value_changed: SubscriptionHandle,
}

pub struct PhonesPage {
    components: PageComponents,
    fetcher: Arc<dyn DataFetcher>,
    state: Mutex<PageState>,
    wiring: Mutex<Option<PageWiring>>,
    events: broadcast::Sender<PageEvent>,
}

impl PhonesPage {
    /// Subscribes to every component, then resolves the initial view from `location`.
    ///
    /// Must be called from inside a Tokio runtime. The returned receiver observes every
    /// event published from mount onwards.
    pub fn mount(
        components: PageComponents,
        fetcher: Arc<dyn DataFetcher>,
        location: &dyn Location,
    ) -> (Arc<Self>, broadcast::Receiver<PageEvent>) {
        let (events, rx) = broadcast::channel(PAGE_EVENT_CAPACITY);
        let page = Arc::new(Self {
            components,
            fetcher,
            state: Mutex::new(PageState {
                view: None,
                navigation: 0,
            }),
            wiring: Mutex::new(None),
            events,
        });
        page.wire();
        page.resolve_initial_view(location.current_fragment());
        (page, rx)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PageEvent> {
        self.events.subscribe()
    }

    pub fn view_state(&self) -> Option<ViewState> {
        self.lock_state().view
    }

    pub fn show_phone(&self, phone: PhoneRef) {
        debug!(phone_id = %phone.id(), full = phone.details().is_some(), "show phone");
        self.components.catalogue.hide();
        self.components.viewer.show_phone(phone.clone());
        self.components.viewer.show();
        self.set_view(ViewState::Viewer);
        self.publish(PageEvent::PhoneShown(phone));
    }

    pub fn go_back(&self) {
        self.begin_navigation();
        self.show_catalogue();
    }

    pub fn add_to_cart(&self, item: CartItem) {
        self.components.cart.add_item(item.clone());
        self.publish(PageEvent::ItemAdded(item));
    }

    /// Shows a placeholder for `phone_id` right away, then waits for both the catalogue's
    /// extra action and the details fetch before showing the full record.
    pub fn select_phone(self: &Arc<Self>, phone_id: PhoneId) -> JoinHandle<()> {
        let navigation = self.begin_navigation();
        info!(%phone_id, navigation, "phone selected");
        self.show_phone(PhoneRef::Id(phone_id.clone()));

        let handshake = SelectionHandshake::begin(
            self.components.catalogue.events(),
            Arc::clone(&self.fetcher),
            phone_id,
        );
        let page = Arc::clone(self);
        tokio::spawn(async move {
            let phone_id = handshake.phone_id().clone();
            match handshake.settle().await {
                Ok(details) if page.is_current(navigation) => {
                    page.show_phone(PhoneRef::Full(details))
                }
                Err(err) if page.is_current(navigation) => page.fail(&err),
                _ => page.superseded(phone_id),
            }
        })
    }

    /// Fetches the list and hands the locally filtered result to the catalogue. Loads are
    /// not serialized: whichever response lands last is what the catalogue shows.
    pub fn load_phones(self: &Arc<Self>, query: Option<String>) -> JoinHandle<()> {
        info!(query = query.as_deref().unwrap_or(""), "loading phones");
        let page = Arc::clone(self);
        tokio::spawn(async move {
            match load_filtered(page.fetcher.as_ref(), query.as_deref()).await {
                Ok(phones) => {
                    let count = phones.len();
                    page.components.catalogue.show_phones(phones);
                    page.publish(PageEvent::PhonesShown { query, count });
                }
                Err(err) => page.fail(&err),
            }
        })
    }

    fn wire(self: &Arc<Self>) {
        let catalogue = self.components.catalogue.events();
        let viewer = self.components.viewer.events();
        let search = self.components.search.events();

        let page = Arc::downgrade(self);
        let phone_selected = catalogue.subscribe(CatalogueEventKind::PhoneSelected, move |event| {
            if let (Some(page), CatalogueEvent::PhoneSelected(phone_id)) = (page.upgrade(), event)
            {
                page.select_phone(phone_id.clone());
            }
        });

        let page = Arc::downgrade(self);
        let back = viewer.subscribe(ViewerEventKind::Back, move |_| {
            if let Some(page) = page.upgrade() {
                page.go_back();
            }
        });

        let page = Arc::downgrade(self);
        let add = viewer.subscribe(ViewerEventKind::Add, move |event| {
            if let (Some(page), ViewerEvent::Add(item)) = (page.upgrade(), event) {
                page.add_to_cart(item.clone());
            }
        });

        let page = Arc::downgrade(self);
        let value_changed = search.subscribe(SearchEventKind::ValueChanged, move |event| {
            let SearchEvent::ValueChanged(value) = event;
            if let Some(page) = page.upgrade() {
                page.load_phones(Some(value.clone()));
            }
        });

        *self.wiring.lock().unwrap_or_else(PoisonError::into_inner) = Some(PageWiring {
            phone_selected,
            back,
            add,
            value_changed,
        });
    }

    fn resolve_initial_view(self: &Arc<Self>, fragment: Option<String>) {
        let Some(phone_id) = fragment.as_deref().and_then(phone_id_from_fragment) else {
            self.show_catalogue();
            self.load_phones(None);
            return;
        };

        info!(%phone_id, "opening phone from location");
        let navigation = self.begin_navigation();
        let page = Arc::clone(self);
        tokio::spawn(async move {
            let loaded =
                load_details(page.fetcher.as_ref(), &phone_id, LoadContext::InitialPhone).await;
            match loaded {
                Ok(details) if page.is_current(navigation) => {
                    page.show_phone(PhoneRef::Full(details))
                }
                Err(err) if page.is_current(navigation) => page.fail(&err),
                _ => page.superseded(phone_id),
            }
        });
    }

    fn show_catalogue(&self) {
        debug!("show catalogue");
        self.components.viewer.hide();
        self.components.catalogue.show();
        self.set_view(ViewState::Catalogue);
    }

    fn set_view(&self, view: ViewState) {
        let changed = {
            let mut state = self.lock_state();
            let changed = state.view != Some(view);
            state.view = Some(view);
            changed
        };
        if changed {
            self.publish(PageEvent::ViewChanged(view));
        }
    }

    fn begin_navigation(&self) -> u64 {
        let mut state = self.lock_state();
        state.navigation += 1;
        state.navigation
    }

    fn is_current(&self, navigation: u64) -> bool {
        self.lock_state().navigation == navigation
    }

    fn superseded(&self, phone_id: PhoneId) {
        debug!(%phone_id, "navigation superseded; dropping result");
        self.publish(PageEvent::NavigationSuperseded { phone_id });
    }

    fn fail(&self, err: &PageError) {
        warn!(context = %err.context(), error = %err, "page load failed");
        self.publish(PageEvent::Failed(PageFailure::from(err)));
    }

    fn publish(&self, event: PageEvent) {
        let _ = self.events.send(event);
    }

    fn lock_state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PhonesPage {
    fn drop(&mut self) {
        let wiring = self
            .wiring
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(wiring) = wiring {
            self.components
                .catalogue
                .events()
                .unsubscribe(wiring.phone_selected);
            let viewer = self.components.viewer.events();
            viewer.unsubscribe(wiring.back);
            viewer.unsubscribe(wiring.add);
            self.components
                .search
                .events()
                .unsubscribe(wiring.value_changed);
        }
    }
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
