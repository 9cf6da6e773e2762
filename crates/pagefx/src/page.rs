//! The page: one document plus every enhancement installed on it.
//!
//! The host owns the loop. It feeds [`PageEvent`]s into [`Page::dispatch`],
//! calls [`Page::run_frame`] once per animation frame and
//! [`Page::advance`] as time passes, and drains [`Page::take_commands`] for
//! requests it has to carry out itself (scrolling the window).
//!
//! Enhancements whose targets are missing, or that need a capability the
//! environment lacks, are skipped with a `debug` log line. Only a malformed
//! selector in the configuration is reported as an error.

use std::time::Duration;

use log::{debug, trace};
use pagecss::parse_selectors;

use crate::activity::ActivityMonitor;
use crate::alerts::AlertDismisser;
use crate::card_effects::CardEffects;
use crate::config::{Features, PageConfig};
use crate::dom::{Document, NodeId};
use crate::dropdown::DropdownController;
use crate::environment::{Environment, Viewport};
use crate::error::Result;
use crate::events::{FrameTask, PageCommand, PageEvent, TimerTask};
use crate::forms::FormEnhancer;
use crate::frame::AnimationFrames;
use crate::keyboard::KeyboardNavigation;
use crate::lazy_images::LazyImageLoader;
use crate::navbar::{NavbarVisibilityController, ScrollSample};
use crate::reveal::RevealScheduler;
use crate::scroll_top::ScrollTopButton;
use crate::storage::KeyValueStore;
use crate::theme::ThemeManager;
use crate::timer::TimerQueue;
use crate::tooltip::TooltipSynthesizer;

/// Turns a degradation error into `None`, keeping real errors.
fn skip_degraded<T>(what: &str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_degradation() => {
            debug!("{what} disabled: {err}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

pub struct Page {
    document: Document,
    env: Environment,
    config: PageConfig,
    frames: AnimationFrames<FrameTask>,
    timers: TimerQueue<TimerTask>,
    commands: Vec<PageCommand>,
    focused: Option<NodeId>,

    reveal: Option<RevealScheduler>,
    navbar: Option<NavbarVisibilityController>,
    cards: Option<CardEffects>,
    theme: Option<ThemeManager>,
    scroll_top: Option<ScrollTopButton>,
    tooltips: Option<TooltipSynthesizer>,
    alerts: Option<AlertDismisser>,
    forms: Option<FormEnhancer>,
    images: Option<LazyImageLoader>,
    dropdowns: Option<DropdownController>,
    keyboard: Option<KeyboardNavigation>,
    activity: Option<ActivityMonitor>,

    disposed: bool,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("env", &self.env)
            .field("features", &self.config.features)
            .field("now", &self.timers.now())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Installs every enabled enhancement on `document`.
    pub fn new(
        document: Document,
        env: Environment,
        store: Box<dyn KeyValueStore>,
        config: PageConfig,
    ) -> Result<Self> {
        let mut page = Self {
            document,
            env,
            config,
            frames: AnimationFrames::new(),
            timers: TimerQueue::new(),
            commands: Vec::new(),
            focused: None,
            reveal: None,
            navbar: None,
            cards: None,
            theme: None,
            scroll_top: None,
            tooltips: None,
            alerts: None,
            forms: None,
            images: None,
            dropdowns: None,
            keyboard: None,
            activity: None,
            disposed: false,
        };
        page.install(store)?;
        Ok(page)
    }

    fn install(&mut self, store: Box<dyn KeyValueStore>) -> Result<()> {
        let features = self.config.features;
        let document = &mut self.document;

        if features.contains(Features::THEME) {
            let mut theme =
                ThemeManager::load(document, store, self.config.theme_storage_key.clone());
            theme.create_toggle(document);
            self.theme = Some(theme);
        }

        if features.contains(Features::NAVBAR) {
            let selectors = parse_selectors(&self.config.navbar_selector)?;
            let navbar = NavbarVisibilityController::attach(document, &selectors, self.config.navbar);
            if navbar.navbar().is_some() {
                navbar.pin(document);
                self.navbar = Some(navbar);
            }
        }

        if features.contains(Features::REVEAL) {
            let selectors = parse_selectors(&self.config.reveal_selector)?;
            let mut reveal = RevealScheduler::new(self.config.reveal)
                .with_mobile_breakpoint(self.config.mobile_breakpoint);
            if let Some(step) = self.config.reveal_stagger {
                reveal = reveal.with_stagger(step);
            }
            if skip_degraded(
                "reveal on scroll",
                reveal.register_matching(document, &self.env, &selectors),
            )?
            .is_some()
            {
                self.reveal = Some(reveal);
            }
        }

        if features.contains(Features::CARD_EFFECTS) {
            let cards = document.query_all(&parse_selectors(&self.config.card_selector)?);
            if cards.is_empty() {
                debug!("no cards on the page");
            } else {
                let mut effects =
                    CardEffects::new(self.config.ripple_duration, self.config.card_press_duration)?;
                effects.install(cards);
                self.cards = Some(effects);
            }
        }

        if features.contains(Features::SCROLL_TOP) {
            self.scroll_top = Some(ScrollTopButton::create(
                document,
                self.config.scroll_top_offset,
            ));
        }

        if features.contains(Features::TOOLTIPS) {
            let mut tooltips = TooltipSynthesizer::default();
            let targets = document.query_selector_all("[title]")?;
            tooltips.install(document, targets);
            self.tooltips = Some(tooltips);
        }

        if features.contains(Features::ALERTS) {
            let alerts = document.query_all(&parse_selectors(&self.config.alert_selector)?);
            if alerts.is_empty() {
                debug!("no alerts on the page");
            } else {
                let mut dismisser =
                    AlertDismisser::new(self.config.alert_delay, self.config.alert_fade);
                dismisser.install(document, &mut self.timers, alerts);
                self.alerts = Some(dismisser);
            }
        }

        if features.contains(Features::FORMS) {
            let mut forms = FormEnhancer::new(self.config.submit_restore)?;
            let controls = document.query_selector_all(".form-control")?;
            forms.install_controls(document, controls);
            forms.install_buttons(document.query_selector_all(".btn")?);
            forms.install_forms(document.query_selector_all("form")?);
            self.forms = Some(forms);
        }

        if features.contains(Features::LAZY_IMAGES) {
            let images = document.query_selector_all("img[data-src]")?;
            if images.is_empty() {
                debug!("no deferred images on the page");
            } else if let Some(mut loader) =
                skip_degraded("lazy images", LazyImageLoader::new(&self.env))?
            {
                loader.observe(images);
                self.images = Some(loader);
            }
        }

        if features.contains(Features::DROPDOWNS) {
            let dropdowns = DropdownController::new()?;
            if dropdowns.applies_to(document) {
                self.dropdowns = Some(dropdowns);
            }
        }

        if features.contains(Features::KEYBOARD) {
            self.keyboard = Some(KeyboardNavigation::default());
        }

        if features.contains(Features::ACTIVITY) {
            self.activity = Some(ActivityMonitor::new(self.config.idle_after));
        }

        debug!("page ready: {:?}", self.installed());
        Ok(())
    }

    /// The enhancements that were actually installed.
    pub fn installed(&self) -> Features {
        let mut features = Features::empty();
        features.set(Features::REVEAL, self.reveal.is_some());
        features.set(Features::NAVBAR, self.navbar.is_some());
        features.set(Features::CARD_EFFECTS, self.cards.is_some());
        features.set(Features::THEME, self.theme.is_some());
        features.set(Features::SCROLL_TOP, self.scroll_top.is_some());
        features.set(Features::TOOLTIPS, self.tooltips.is_some());
        features.set(Features::ALERTS, self.alerts.is_some());
        features.set(Features::FORMS, self.forms.is_some());
        features.set(Features::LAZY_IMAGES, self.images.is_some());
        features.set(Features::DROPDOWNS, self.dropdowns.is_some());
        features.set(Features::KEYBOARD, self.keyboard.is_some());
        features.set(Features::ACTIVITY, self.activity.is_some());
        features
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Routes one host event to the enhancements that listen for it.
    pub fn dispatch(&mut self, event: PageEvent) {
        if self.disposed {
            return;
        }
        trace!("dispatch {event:?}");

        if event.is_activity() {
            if let Some(activity) = self.activity.as_mut() {
                activity.on_activity(&mut self.document, &mut self.timers);
            }
        }

        match event {
            PageEvent::Scroll { offset } => self.on_scroll(offset),
            PageEvent::Resize { width, height } => {
                self.env.viewport = Viewport::new(width, height).with_scroll(self.env.viewport.scroll_y);
            }
            PageEvent::MouseMove | PageEvent::TouchStart => {}
            PageEvent::KeyDown { key } => {
                if let Some(keyboard) = self.keyboard.as_mut() {
                    keyboard.on_key(&mut self.document, key);
                }
                if let Some(dropdowns) = self.dropdowns.as_ref() {
                    dropdowns.on_key(&mut self.document, self.focused, key);
                }
            }
            PageEvent::Click { target } => self.on_click(target),
            PageEvent::MouseEnter { target, x, y } => {
                if let Some(tooltips) = self.tooltips.as_ref() {
                    tooltips.on_mouse_enter(&mut self.document, target);
                }
                if let Some(cards) = self.cards.as_mut() {
                    cards.on_mouse_enter(&mut self.document, &mut self.timers, target, x, y);
                }
            }
            PageEvent::MouseLeave { target } => {
                if let Some(cards) = self.cards.as_ref() {
                    cards.on_mouse_leave(&mut self.document, target);
                }
                if let Some(tooltips) = self.tooltips.as_ref() {
                    tooltips.on_mouse_leave(&mut self.document, target);
                }
                if let Some(forms) = self.forms.as_ref() {
                    forms.on_release(&mut self.document, target);
                }
            }
            PageEvent::MouseDown { target } => {
                if let Some(forms) = self.forms.as_ref() {
                    forms.on_mouse_down(&mut self.document, target);
                }
            }
            PageEvent::MouseUp { target } => {
                if let Some(forms) = self.forms.as_ref() {
                    forms.on_release(&mut self.document, target);
                }
            }
            PageEvent::Focus { target } => {
                self.focused = Some(target);
                if let Some(forms) = self.forms.as_mut() {
                    forms.on_focus(&mut self.document, target);
                }
            }
            PageEvent::Blur { target } => {
                if self.focused == Some(target) {
                    self.focused = None;
                }
                if let Some(forms) = self.forms.as_mut() {
                    forms.on_blur(&mut self.document, target);
                }
            }
            PageEvent::Input { target, value } => {
                if let Some(forms) = self.forms.as_mut() {
                    forms.on_input(&mut self.document, target, &value);
                }
            }
            PageEvent::Submit { form } => {
                if let Some(forms) = self.forms.as_mut() {
                    forms.on_submit(&mut self.document, &mut self.timers, form);
                }
            }
            PageEvent::Shutdown => self.dispose(),
        }
    }

    fn on_scroll(&mut self, offset: f64) {
        self.env.viewport = self.env.viewport.with_scroll(offset);
        let offset = self.env.viewport.scroll_y;

        if let Some(navbar) = self.navbar.as_mut() {
            navbar.on_raw_scroll(ScrollSample::new(offset, self.timers.now()), &mut self.frames);
        }
        if let Some(button) = self.scroll_top.as_mut() {
            button.on_scroll(&mut self.document, offset);
        }
    }

    fn on_click(&mut self, target: NodeId) {
        if let Some(keyboard) = self.keyboard.as_mut() {
            keyboard.on_click(&mut self.document);
        }
        if let Some(theme) = self.theme.as_mut() {
            theme.on_click(&mut self.document, target);
        }
        if let Some(command) = self
            .scroll_top
            .as_ref()
            .and_then(|button| button.on_click(&self.document, target))
        {
            self.commands.push(command);
        }
        if let Some(alerts) = self.alerts.as_mut() {
            alerts.on_click(&mut self.document, &mut self.timers, target);
        }
        if let Some(cards) = self.cards.as_mut() {
            cards.on_click(&mut self.document, &mut self.timers, target);
        }
        if let Some(dropdowns) = self.dropdowns.as_ref() {
            dropdowns.on_click(&mut self.document, target);
        }
    }

    // =========================================================================
    // Frames and time
    // =========================================================================

    /// Runs one animation frame: deferred work first, then visibility checks.
    /// Returns the number of deferred tasks run.
    pub fn run_frame(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        let tasks = self.frames.begin_frame();
        for task in &tasks {
            match task {
                FrameTask::NavbarUpdate => {
                    if let Some(navbar) = self.navbar.as_mut() {
                        navbar.on_frame(&mut self.document);
                    }
                }
            }
        }
        self.check_visibility();
        tasks.len()
    }

    /// Moves the clock forward, firing due timers in deadline order.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.disposed {
            return;
        }
        let target = self.timers.now() + elapsed;
        loop {
            let step_to = match self.timers.next_deadline() {
                Some(deadline) if deadline <= target => deadline.max(self.timers.now()),
                _ => target,
            };
            let elapsed = step_to - self.timers.now();
            for task in self.timers.advance(elapsed) {
                self.on_timer(task);
            }
            if self.timers.now() >= target {
                break;
            }
        }
        self.check_visibility();
    }

    fn on_timer(&mut self, task: TimerTask) {
        trace!("timer {task:?}");
        match task {
            TimerTask::AlertAutoHide(_) | TimerTask::AlertRemove(_) => {
                if let Some(alerts) = self.alerts.as_mut() {
                    alerts.on_timer(&mut self.document, &mut self.timers, &task);
                }
            }
            TimerTask::RestoreSubmit(_) => {
                if let Some(forms) = self.forms.as_mut() {
                    forms.on_timer(&mut self.document, &task);
                }
            }
            TimerTask::RemoveRipple(_) | TimerTask::ReleaseCardPress(_) => {
                if let Some(cards) = self.cards.as_mut() {
                    cards.on_timer(&mut self.document, &task);
                }
            }
            TimerTask::ActivityExpired => {
                if let Some(activity) = self.activity.as_mut() {
                    activity.on_timer(&mut self.document, &task);
                }
            }
        }
    }

    fn check_visibility(&mut self) {
        let viewport = self.env.viewport;
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.check(&mut self.document, &viewport);
        }
        if let Some(images) = self.images.as_mut() {
            images.check(&mut self.document, &viewport);
        }
    }

    /// Drains the requests the host must act on.
    pub fn take_commands(&mut self) -> Vec<PageCommand> {
        std::mem::take(&mut self.commands)
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stops every enhancement. Later events, frames and timers are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.dispose();
        }
        if let Some(navbar) = self.navbar.as_mut() {
            navbar.dispose();
        }
        if let Some(cards) = self.cards.as_mut() {
            cards.dispose(&mut self.document);
        }
        if let Some(alerts) = self.alerts.as_mut() {
            alerts.dispose();
        }
        if let Some(forms) = self.forms.as_mut() {
            forms.dispose();
        }
        if let Some(images) = self.images.as_mut() {
            images.dispose();
        }
        if let Some(activity) = self.activity.as_mut() {
            activity.dispose();
        }
        self.frames.clear();
        self.timers.clear();
        self.commands.clear();
        self.disposed = true;
        debug!("page disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Time elapsed on the page clock.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.pending()
    }

    pub fn reveal(&self) -> Option<&RevealScheduler> {
        self.reveal.as_ref()
    }

    pub fn navbar(&self) -> Option<&NavbarVisibilityController> {
        self.navbar.as_ref()
    }

    pub fn card_effects(&self) -> Option<&CardEffects> {
        self.cards.as_ref()
    }

    pub fn theme(&self) -> Option<&ThemeManager> {
        self.theme.as_ref()
    }

    pub fn scroll_top(&self) -> Option<&ScrollTopButton> {
        self.scroll_top.as_ref()
    }

    pub fn tooltips(&self) -> Option<&TooltipSynthesizer> {
        self.tooltips.as_ref()
    }

    pub fn alerts(&self) -> Option<&AlertDismisser> {
        self.alerts.as_ref()
    }

    pub fn forms(&self) -> Option<&FormEnhancer> {
        self.forms.as_ref()
    }

    pub fn lazy_images(&self) -> Option<&LazyImageLoader> {
        self.images.as_ref()
    }

    pub fn activity(&self) -> Option<&ActivityMonitor> {
        self.activity.as_ref()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::error::PageFxError;
    use crate::geometry::Rect;
    use crate::storage::MemoryStore;

    fn bare_page(config: PageConfig) -> Page {
        Page::new(
            Document::new(),
            Environment::default(),
            Box::new(MemoryStore::new()),
            config,
        )
        .unwrap()
    }

    #[test]
    fn empty_page_degrades_quietly() {
        let page = bare_page(PageConfig::default());
        let installed = page.installed();
        assert!(!installed.contains(Features::REVEAL));
        assert!(!installed.contains(Features::NAVBAR));
        assert!(!installed.contains(Features::ALERTS));
        assert!(!installed.contains(Features::LAZY_IMAGES));
        assert!(!installed.contains(Features::DROPDOWNS));
        assert!(installed.contains(Features::THEME));
        assert!(installed.contains(Features::SCROLL_TOP));
    }

    #[test]
    fn bad_selector_is_an_error() {
        let err = Page::new(
            Document::new(),
            Environment::default(),
            Box::new(MemoryStore::new()),
            PageConfig::default().with_navbar_selector(".nav >"),
        )
        .unwrap_err();
        assert!(matches!(err, PageFxError::InvalidSelector(_)));
    }

    #[test]
    fn features_can_be_switched_off() {
        let page = bare_page(PageConfig::default().with_features(Features::KEYBOARD));
        assert_eq!(page.installed(), Features::KEYBOARD);
        assert!(page.document().children(page.document().body()).is_empty());
    }

    #[test]
    fn advance_steps_through_deadlines() {
        let mut doc = Document::new();
        let body = doc.body();
        let alert = doc.insert(
            body,
            Element::new("div")
                .with_class("alert")
                .with_rect(Rect::new(0.0, 0.0, 300.0, 60.0)),
        );
        let mut page = Page::new(
            doc,
            Environment::default(),
            Box::new(MemoryStore::new()),
            PageConfig::default().with_features(Features::ALERTS),
        )
        .unwrap();

        // One large step still fires the removal at 5300ms.
        page.advance(Duration::from_millis(5300));
        assert!(!page.document().is_connected(alert));
        assert_eq!(page.now(), Duration::from_millis(5300));
    }

    #[test]
    fn removed_alert_is_no_longer_watched() {
        let mut doc = Document::new();
        let body = doc.body();
        let alert = doc.insert(
            body,
            Element::new("div")
                .with_class("alert")
                .with_rect(Rect::new(0.0, 5000.0, 300.0, 60.0)),
        );
        let mut page = Page::new(
            doc,
            Environment::default(),
            Box::new(MemoryStore::new()),
            PageConfig::default().with_features(Features::ALERTS | Features::REVEAL),
        )
        .unwrap();

        page.run_frame();
        assert_eq!(page.reveal().map(RevealScheduler::observed_count), Some(1));

        page.advance(Duration::from_millis(5300));
        assert!(!page.document().is_connected(alert));
        let reveal = page.reveal().unwrap();
        assert_eq!(reveal.observed_count(), 0);
        assert!(!reveal.is_observing(alert));
        assert!(reveal.watched().is_empty());
    }
}
