use std::sync::Arc;

use shared::domain::{CartItem, PhoneRef, PhoneSummary};

use crate::events::{CatalogueEvent, EventBus, SearchEvent, ViewerEvent};

pub trait CatalogueView: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn show_phones(&self, phones: Vec<PhoneSummary>);
    fn events(&self) -> &Arc<EventBus<CatalogueEvent>>;
}

pub trait PhoneViewer: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn show_phone(&self, phone: PhoneRef);
    fn events(&self) -> &Arc<EventBus<ViewerEvent>>;
}

pub trait SearchBox: Send + Sync {
    fn events(&self) -> &Arc<EventBus<SearchEvent>>;
}

pub trait ShoppingCart: Send + Sync {
    fn add_item(&self, item: CartItem);
}

/// The components a page is mounted onto.
#[derive(Clone)]
pub struct PageComponents {
    pub catalogue: Arc<dyn CatalogueView>,
    pub viewer: Arc<dyn PhoneViewer>,
    pub search: Arc<dyn SearchBox>,
    pub cart: Arc<dyn ShoppingCart>,
}
