//! Collapsible panels and the page events that close them.
//!
//! A panel is either [`Closed`](PanelState::Closed) or
//! [`Open`](PanelState::Open):
//!
//! | event             | Closed | Open   |
//! |-------------------|--------|--------|
//! | `Toggle`          | Open   | Closed |
//! | `OutsideClick`    | Closed | Closed |
//! | `NavigationStart` | Closed | Closed |
//!
//! While mounted, a panel listens on an [`EventHub`] for clicks and
//! navigation. The listener is removed when the [`MountedPanel`] is dropped.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

use crate::locale::{Locale, switch_path};

/// Open/closed state of a panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    #[must_use]
    pub fn is_open(self) -> bool {
        self == Self::Open
    }

    /// CSS modifier class for the panel element.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Closed => "",
            Self::Open => " open",
        }
    }
}

/// Input to the panel state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEvent {
    Toggle,
    OutsideClick,
    NavigationStart,
}

/// Apply one event.
#[must_use]
pub fn transition(state: PanelState, event: PanelEvent) -> PanelState {
    match (state, event) {
        (PanelState::Closed, PanelEvent::Toggle) => PanelState::Open,
        (PanelState::Open, PanelEvent::Toggle)
        | (_, PanelEvent::OutsideClick | PanelEvent::NavigationStart) => PanelState::Closed,
    }
}

/// Identifies a panel on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelId {
    /// Mobile navigation menu behind the hamburger button.
    NavMenu,
    /// Language selector drop-down.
    LanguageMenu,
}

/// Where a click landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the region of a panel.
    Panel(PanelId),
    /// On the control that toggles a panel.
    Toggle(PanelId),
    /// Anywhere else.
    Elsewhere,
}

/// Events delivered to mounted panels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageEvent {
    Click(ClickTarget),
    NavigationStart { to: String },
}

impl PageEvent {
    /// What this page event means for `panel`, if anything.
    #[must_use]
    pub fn for_panel(&self, panel: PanelId) -> Option<PanelEvent> {
        match self {
            Self::Click(ClickTarget::Toggle(target)) if *target == panel => {
                Some(PanelEvent::Toggle)
            }
            Self::Click(ClickTarget::Panel(target)) if *target == panel => None,
            Self::Click(_) => Some(PanelEvent::OutsideClick),
            Self::NavigationStart { .. } => Some(PanelEvent::NavigationStart),
        }
    }
}

type Listener = Arc<dyn Fn(&PageEvent) + Send + Sync>;

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Listener>>,
}

/// Broadcasts page events to subscribed listeners.
#[derive(Clone, Default)]
pub struct EventHub {
    inner: Arc<HubInner>,
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PageEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(listener));
        Subscription {
            hub: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Deliver `event` to every listener in subscription order.
    ///
    /// Listeners run on a snapshot taken before the first call, without the
    /// hub lock held, so they may mount or unmount panels.
    pub fn dispatch(&self, event: &PageEvent) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Keeps a listener registered; unsubscribes on drop.
pub struct Subscription {
    hub: Weak<HubInner>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&self.id);
        }
    }
}

/// A collapsible panel.
///
/// State changes only through [`toggle`](Self::toggle), [`close`](Self::close)
/// and the hub listener installed by [`mount`](Self::mount).
#[derive(Debug)]
pub struct Panel {
    id: PanelId,
    state: Arc<RwLock<PanelState>>,
}

impl Panel {
    #[must_use]
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            state: Arc::new(RwLock::new(PanelState::Closed)),
        }
    }

    #[must_use]
    pub fn id(&self) -> PanelId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn toggle(&self) -> PanelState {
        apply(&self.state, PanelEvent::Toggle)
    }

    pub fn close(&self) -> PanelState {
        apply(&self.state, PanelEvent::OutsideClick)
    }

    /// Start listening for outside clicks and navigation on `hub`.
    #[must_use]
    pub fn mount(self, hub: &EventHub) -> MountedPanel {
        let state = Arc::clone(&self.state);
        let id = self.id;
        let subscription = hub.subscribe(move |event| {
            if let Some(panel_event) = event.for_panel(id) {
                apply(&state, panel_event);
            }
        });
        MountedPanel {
            panel: self,
            _subscription: subscription,
        }
    }
}

fn apply(state: &RwLock<PanelState>, event: PanelEvent) -> PanelState {
    let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
    *guard = transition(*guard, event);
    *guard
}

/// A panel wired to an [`EventHub`].
pub struct MountedPanel {
    panel: Panel,
    _subscription: Subscription,
}

impl std::ops::Deref for MountedPanel {
    type Target = Panel;

    fn deref(&self) -> &Panel {
        &self.panel
    }
}

/// Panels of the top navigation bar.
pub struct TopNavPanels {
    pub nav_menu: MountedPanel,
    pub language_menu: MountedPanel,
}

impl TopNavPanels {
    #[must_use]
    pub fn mount(hub: &EventHub) -> Self {
        Self {
            nav_menu: Panel::new(PanelId::NavMenu).mount(hub),
            language_menu: Panel::new(PanelId::LanguageMenu).mount(hub),
        }
    }

    /// Pick a language from the selector.
    ///
    /// Closes the language menu and returns where to navigate, if anywhere.
    pub fn choose_language(&self, current_path: &str, locale: Locale) -> Option<String> {
        self.language_menu.close();
        switch_path(current_path, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transition_table() {
        use PanelEvent::{NavigationStart, OutsideClick, Toggle};
        use PanelState::{Closed, Open};

        assert_eq!(transition(Closed, Toggle), Open);
        assert_eq!(transition(Open, Toggle), Closed);
        assert_eq!(transition(Closed, OutsideClick), Closed);
        assert_eq!(transition(Open, OutsideClick), Closed);
        assert_eq!(transition(Closed, NavigationStart), Closed);
        assert_eq!(transition(Open, NavigationStart), Closed);
    }

    #[test]
    fn test_initial_state_closed() {
        assert_eq!(Panel::new(PanelId::NavMenu).state(), PanelState::Closed);
    }

    #[test]
    fn test_toggle_then_outside_click() {
        let hub = EventHub::new();
        let panel = Panel::new(PanelId::NavMenu).mount(&hub);

        assert_eq!(panel.toggle(), PanelState::Open);
        hub.dispatch(&PageEvent::Click(ClickTarget::Elsewhere));
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_click_inside_keeps_open() {
        let hub = EventHub::new();
        let panel = Panel::new(PanelId::NavMenu).mount(&hub);

        panel.toggle();
        hub.dispatch(&PageEvent::Click(ClickTarget::Panel(PanelId::NavMenu)));
        assert_eq!(panel.state(), PanelState::Open);
    }

    #[test]
    fn test_click_on_own_toggle_is_toggle() {
        let hub = EventHub::new();
        let panel = Panel::new(PanelId::NavMenu).mount(&hub);

        hub.dispatch(&PageEvent::Click(ClickTarget::Toggle(PanelId::NavMenu)));
        assert_eq!(panel.state(), PanelState::Open);
        hub.dispatch(&PageEvent::Click(ClickTarget::Toggle(PanelId::NavMenu)));
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn test_click_in_other_panel_is_outside() {
        let hub = EventHub::new();
        let panels = TopNavPanels::mount(&hub);

        panels.nav_menu.toggle();
        hub.dispatch(&PageEvent::Click(ClickTarget::Toggle(PanelId::LanguageMenu)));
        assert_eq!(panels.nav_menu.state(), PanelState::Closed);
        assert_eq!(panels.language_menu.state(), PanelState::Open);
    }

    #[test]
    fn test_navigation_closes_from_either_state() {
        let hub = EventHub::new();
        let panels = TopNavPanels::mount(&hub);
        panels.nav_menu.toggle();

        hub.dispatch(&PageEvent::NavigationStart {
            to: "/cache".to_owned(),
        });
        assert_eq!(panels.nav_menu.state(), PanelState::Closed);
        assert_eq!(panels.language_menu.state(), PanelState::Closed);
    }

    #[test]
    fn test_unmount_deregisters() {
        let hub = EventHub::new();
        let panel = Panel::new(PanelId::NavMenu).mount(&hub);
        assert_eq!(hub.listener_count(), 1);

        drop(panel);
        assert_eq!(hub.listener_count(), 0);
        hub.dispatch(&PageEvent::Click(ClickTarget::Elsewhere));
    }

    #[test]
    fn test_unmount_from_listener() {
        let hub = EventHub::new();
        let slot = Arc::new(Mutex::new(Some(Panel::new(PanelId::NavMenu).mount(&hub))));
        let teardown = {
            let slot = Arc::clone(&slot);
            hub.subscribe(move |event| {
                if matches!(event, PageEvent::NavigationStart { .. }) {
                    slot.lock().unwrap().take();
                }
            })
        };
        assert_eq!(hub.listener_count(), 2);

        hub.dispatch(&PageEvent::NavigationStart {
            to: "/faq".to_owned(),
        });
        assert!(slot.lock().unwrap().is_none());
        assert_eq!(hub.listener_count(), 1);

        drop(teardown);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_hub() {
        let hub = EventHub::new();
        let panel = Panel::new(PanelId::LanguageMenu).mount(&hub);
        drop(hub);
        drop(panel);
    }

    #[test]
    fn test_choose_language_closes_menu() {
        let hub = EventHub::new();
        let panels = TopNavPanels::mount(&hub);
        panels.language_menu.toggle();

        let target = panels.choose_language("/", Locale::Ja);
        assert_eq!(target.as_deref(), Some("/ja/introduction"));
        assert_eq!(panels.language_menu.state(), PanelState::Closed);

        panels.language_menu.toggle();
        assert_eq!(panels.choose_language("/ja/faq", Locale::Ja), None);
        assert_eq!(panels.language_menu.state(), PanelState::Closed);
    }

    #[test]
    fn test_state_class() {
        assert_eq!(PanelState::Open.class(), " open");
        assert!(!PanelState::Closed.is_open());
    }
}
