use std::{
    io::Write,
    sync::{Arc, Mutex, PoisonError},
};

use page_core::{
    CatalogueEvent, CatalogueView, EventBus, PageComponents, PhoneViewer, SearchBox,
    SearchEvent, ShoppingCart, ViewerEvent,
};
use serde_json::json;
use shared::domain::{CartItem, PhoneRef, PhoneSummary};

/// Shared output sink for every console component.
pub struct Screen {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Screen {
    pub fn stdout() -> Arc<Self> {
        Self::new(Box::new(std::io::stdout()))
    }

    pub fn new(out: Box<dyn Write + Send>) -> Arc<Self> {
        Arc::new(Self {
            out: Mutex::new(out),
        })
    }

    pub fn line(&self, text: impl AsRef<str>) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{}", text.as_ref());
        let _ = out.flush();
    }
}

pub struct ConsoleCatalogue {
    screen: Arc<Screen>,
    events: Arc<EventBus<CatalogueEvent>>,
    visible: Mutex<bool>,
    phones: Mutex<Vec<PhoneSummary>>,
}

impl ConsoleCatalogue {
    pub fn new(screen: Arc<Screen>) -> Self {
        Self {
            screen,
            events: EventBus::new(),
            visible: Mutex::new(false),
            phones: Mutex::new(Vec::new()),
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn render(&self) {
        if !self.is_visible() {
            return;
        }
        let phones = self.phones.lock().unwrap_or_else(PoisonError::into_inner);
        self.screen.line(format!("== catalogue ({} phones)", phones.len()));
        for phone in phones.iter() {
            self.screen.line(format!("  {:<24} {}", phone.id, phone.name));
        }
    }
}

impl CatalogueView for ConsoleCatalogue {
    fn show(&self) {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.render();
    }

    fn hide(&self) {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }

    fn show_phones(&self, phones: Vec<PhoneSummary>) {
        *self.phones.lock().unwrap_or_else(PoisonError::into_inner) = phones;
        self.render();
    }

    fn events(&self) -> &Arc<EventBus<CatalogueEvent>> {
        &self.events
    }
}

pub struct ConsoleViewer {
    screen: Arc<Screen>,
    events: Arc<EventBus<ViewerEvent>>,
    visible: Mutex<bool>,
    current: Mutex<Option<PhoneRef>>,
}

impl ConsoleViewer {
    pub fn new(screen: Arc<Screen>) -> Self {
        Self {
            screen,
            events: EventBus::new(),
            visible: Mutex::new(false),
            current: Mutex::new(None),
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// What an "add" click would hand to the cart right now.
    pub fn current_item(&self) -> Option<CartItem> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_ref()? {
            PhoneRef::Id(id) => Some(CartItem(json!({ "id": id }))),
            PhoneRef::Full(details) => serde_json::to_value(details).ok().map(CartItem),
        }
    }

    fn render(&self) {
        if !self.is_visible() {
            return;
        }
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match current.as_ref() {
            Some(PhoneRef::Id(id)) => self.screen.line(format!("== viewer: {id} (loading)")),
            Some(PhoneRef::Full(details)) => {
                self.screen.line(format!("== viewer: {}", details.name));
                if !details.description.is_empty() {
                    self.screen.line(format!("  {}", details.description));
                }
                for image in &details.images {
                    self.screen.line(format!("  [image] {image}"));
                }
            }
            None => self.screen.line("== viewer: (empty)"),
        }
    }
}

impl PhoneViewer for ConsoleViewer {
    fn show(&self) {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.render();
    }

    fn hide(&self) {
        *self.visible.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }

    fn show_phone(&self, phone: PhoneRef) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(phone);
    }

    fn events(&self) -> &Arc<EventBus<ViewerEvent>> {
        &self.events
    }
}

#[derive(Default)]
pub struct ConsoleSearch {
    events: Arc<EventBus<SearchEvent>>,
}

impl SearchBox for ConsoleSearch {
    fn events(&self) -> &Arc<EventBus<SearchEvent>> {
        &self.events
    }
}

pub struct ConsoleCart {
    screen: Arc<Screen>,
    items: Mutex<Vec<CartItem>>,
}

impl ConsoleCart {
    pub fn new(screen: Arc<Screen>) -> Self {
        Self {
            screen,
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ShoppingCart for ConsoleCart {
    fn add_item(&self, item: CartItem) {
        let label = item
            .0
            .get("name")
            .or_else(|| item.0.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or("item")
            .to_string();
        let count = {
            let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
            items.push(item);
            items.len()
        };
        self.screen
            .line(format!("cart: added {label} ({count} in cart)"));
    }
}

/// Concrete handles kept by the host so it can raise component events.
pub struct Console {
    pub catalogue: Arc<ConsoleCatalogue>,
    pub viewer: Arc<ConsoleViewer>,
    pub search: Arc<ConsoleSearch>,
    pub cart: Arc<ConsoleCart>,
}

impl Console {
    pub fn new(screen: Arc<Screen>) -> Self {
        Self {
            catalogue: Arc::new(ConsoleCatalogue::new(screen.clone())),
            viewer: Arc::new(ConsoleViewer::new(screen.clone())),
            search: Arc::new(ConsoleSearch::default()),
            cart: Arc::new(ConsoleCart::new(screen)),
        }
    }

    pub fn components(&self) -> PageComponents {
        PageComponents {
            catalogue: self.catalogue.clone(),
            viewer: self.viewer.clone(),
            search: self.search.clone(),
            cart: self.cart.clone(),
        }
    }
}
