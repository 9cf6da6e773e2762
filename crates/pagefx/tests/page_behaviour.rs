//! End-to-end behaviour of a fully enhanced page.

use std::time::Duration;

use pagefx::alerts::CLOSE_CLASS;
use pagefx::card_effects::RIPPLE_CLASS;
use pagefx::keyboard::KEYBOARD_CLASS;
use pagefx::reveal::{PENDING_CLASS, VISIBLE_CLASS};
use pagefx::testing::PageFixture;
use pagefx::{
    Environment, Key, MemoryStore, Mutation, Page, PageCommand, PageEvent, ThemeMode, Viewport,
};

fn scroll_frame(page: &mut Page, offset: f64) {
    page.dispatch(PageEvent::Scroll { offset });
    page.run_frame();
}

fn visible_additions(page: &Page) -> usize {
    page.document()
        .mutations()
        .iter()
        .filter(|m| matches!(m, Mutation::ClassAdded { class, .. } if class == VISIBLE_CLASS))
        .count()
}

// =============================================================================
// Reveal on scroll
// =============================================================================

#[test]
fn cards_reveal_once_as_they_scroll_in() {
    let fixture = PageFixture::landing_page();
    let cards = fixture.cards.clone();
    let alert = fixture.alert;
    let mut page = fixture.into_page().unwrap();

    for card in &cards {
        assert!(page.document().has_class(*card, PENDING_CLASS));
    }

    page.run_frame();
    assert!(page.document().has_class(cards[0], VISIBLE_CLASS));
    assert!(page.document().has_class(alert, VISIBLE_CLASS));
    assert!(!page.document().has_class(cards[1], VISIBLE_CLASS));

    scroll_frame(&mut page, 700.0);
    assert!(page.document().has_class(cards[1], VISIBLE_CLASS));

    scroll_frame(&mut page, 0.0);
    scroll_frame(&mut page, 700.0);
    scroll_frame(&mut page, 1900.0);

    let reveal = page.reveal().unwrap();
    assert_eq!(reveal.promotions(), 5);
    assert_eq!(visible_additions(&page), 5);
    assert_eq!(reveal.observed_count(), 0);
}

#[test]
fn reveals_cascade_by_sibling_position() {
    let fixture = PageFixture::landing_page();
    let cards = fixture.cards.clone();
    let alert = fixture.alert;
    let mut page = fixture.into_page().unwrap();

    page.run_frame();
    scroll_frame(&mut page, 700.0);
    // The alert comes first in <main>, then the cards.
    assert_eq!(page.document().style(alert, "animation-delay"), Some("0ms"));
    assert_eq!(page.document().style(cards[0], "animation-delay"), Some("100ms"));
    assert_eq!(page.document().style(cards[1], "animation-delay"), Some("200ms"));
    assert_eq!(page.document().style(cards[3], "animation-delay"), None);
}

#[test]
fn stagger_can_be_turned_off() {
    let fixture = PageFixture::landing_page();
    let card = fixture.cards[0];
    let config = fixture.config.clone().with_reveal_stagger(None);
    let mut page = fixture.with_config(config).into_page().unwrap();
    page.run_frame();
    assert!(page.document().has_class(card, VISIBLE_CLASS));
    assert_eq!(page.document().style(card, "animation-delay"), None);
}

#[test]
fn reduced_motion_leaves_content_static() {
    let fixture = PageFixture::landing_page()
        .with_environment(Environment::default().with_reduced_motion(true));
    let cards = fixture.cards.clone();
    let mut page = fixture.into_page().unwrap();

    for offset in [0.0, 700.0, 1400.0, 2000.0] {
        scroll_frame(&mut page, offset);
    }

    for card in cards {
        assert!(!page.document().has_class(card, PENDING_CLASS));
        assert!(!page.document().has_class(card, VISIBLE_CLASS));
    }
    assert_eq!(page.reveal().map_or(0, |r| r.observed_count()), 0);
    assert_eq!(page.reveal().map_or(0, |r| r.promotions()), 0);
}

#[test]
fn mobile_viewport_leaves_content_static() {
    let fixture = PageFixture::landing_page()
        .with_environment(Environment::new(Viewport::new(375.0, 667.0)));
    let cards = fixture.cards.clone();
    let mut page = fixture.into_page().unwrap();
    page.run_frame();
    assert!(cards.iter().all(|c| !page.document().has_class(*c, PENDING_CLASS)));
}

#[test]
fn missing_intersection_support_skips_reveal() {
    let fixture = PageFixture::landing_page()
        .with_environment(Environment::default().with_intersection_support(false));
    let page = fixture.into_page().unwrap();
    assert!(page.reveal().is_none());
    assert!(page.lazy_images().is_none());
}

// =============================================================================
// Navbar
// =============================================================================

#[test]
fn navbar_follows_scroll_direction() {
    let fixture = PageFixture::landing_page();
    let navbar = fixture.navbar;
    let mut page = fixture.into_page().unwrap();

    let expected = [
        (0.0, false, "translateY(0)"),
        (60.0, true, "translateY(0)"),
        (120.0, true, "translateY(-100%)"),
        (90.0, true, "translateY(0)"),
    ];
    for (offset, elevated, transform) in expected {
        scroll_frame(&mut page, offset);
        assert_eq!(page.document().has_class(navbar, "scrolled"), elevated, "offset {offset}");
        assert_eq!(page.document().style(navbar, "transform"), Some(transform), "offset {offset}");
    }
}

#[test]
fn navbar_is_pinned_with_body_padding() {
    let fixture = PageFixture::landing_page();
    let navbar = fixture.navbar;
    let page = fixture.into_page().unwrap();
    let doc = page.document();
    assert_eq!(doc.style(navbar, "position"), Some("fixed"));
    assert_eq!(doc.style(navbar, "z-index"), Some("1030"));
    assert_eq!(doc.style(doc.body(), "padding-top"), Some("72px"));
}

#[test]
fn scroll_bursts_coalesce_into_one_frame() {
    let mut page = PageFixture::landing_page().into_page().unwrap();
    for offset in [10.0, 40.0, 80.0, 130.0, 170.0] {
        page.dispatch(PageEvent::Scroll { offset });
    }
    assert_eq!(page.pending_frames(), 1);
    assert_eq!(page.run_frame(), 1);

    let navbar = page.navbar().unwrap();
    assert_eq!(navbar.computations(), 1);
    assert!(navbar.state().hidden);
    assert!(navbar.state().elevated);
}

#[test]
fn no_navbar_means_no_navbar_work() {
    let mut page = Page::new(
        pagefx::Document::new(),
        Environment::default(),
        Box::new(MemoryStore::new()),
        Default::default(),
    )
    .unwrap();
    page.dispatch(PageEvent::Scroll { offset: 500.0 });
    assert_eq!(page.pending_frames(), 0);
    assert!(page.navbar().is_none());
}

// =============================================================================
// Disposal
// =============================================================================

#[test]
fn disposed_page_ignores_everything() {
    let fixture = PageFixture::landing_page();
    let toggle = fixture.dropdown_toggle;
    let mut page = fixture.into_page().unwrap();
    page.run_frame();
    page.dispose();
    page.document_mut().take_mutations();

    scroll_frame(&mut page, 1500.0);
    page.dispatch(PageEvent::Click { target: toggle });
    page.dispatch(PageEvent::KeyDown { key: Key::Tab });
    page.advance(Duration::from_secs(60));

    assert!(page.is_disposed());
    assert!(page.document().mutations().is_empty());
    assert!(page.take_commands().is_empty());
}

// =============================================================================
// Theme, scroll-to-top, tooltips
// =============================================================================

#[test]
fn theme_toggle_flips_and_restores() {
    let page_doc_theme = |page: &Page| {
        let doc = page.document();
        doc.attribute(doc.document_element(), "data-theme").map(str::to_string)
    };

    let mut page = PageFixture::landing_page().into_page().unwrap();
    assert_eq!(page_doc_theme(&page).as_deref(), Some("light"));
    let toggle = page.theme().and_then(|t| t.toggle_button()).unwrap();
    page.dispatch(PageEvent::Click { target: toggle });
    assert_eq!(page.theme().unwrap().mode(), ThemeMode::Dark);
    assert_eq!(page_doc_theme(&page).as_deref(), Some("dark"));

    let page = PageFixture::landing_page()
        .with_store(MemoryStore::new().with_entry("luxury-theme", "dark"))
        .into_page()
        .unwrap();
    assert_eq!(page_doc_theme(&page).as_deref(), Some("dark"));
}

#[test]
fn scroll_top_button_appears_and_requests_scroll() {
    let mut page = PageFixture::landing_page().into_page().unwrap();
    let button = page.scroll_top().unwrap().button();
    assert_eq!(page.document().style(button, "visibility"), Some("hidden"));

    page.dispatch(PageEvent::Scroll { offset: 400.0 });
    assert_eq!(page.document().style(button, "visibility"), Some("visible"));

    page.dispatch(PageEvent::Click { target: button });
    assert_eq!(
        page.take_commands(),
        vec![PageCommand::ScrollTo {
            top: 0.0,
            smooth: true
        }]
    );
    assert!(page.take_commands().is_empty());
}

#[test]
fn titles_become_custom_tooltips() {
    let fixture = PageFixture::landing_page();
    let link = fixture.titled_link;
    let mut page = fixture.into_page().unwrap();
    assert_eq!(page.document().attribute(link, "title"), None);

    let tip = page.tooltips().and_then(|t| t.tip_for(link)).unwrap();
    page.dispatch(PageEvent::MouseEnter { target: link, x: 1120.0, y: 30.0 });
    assert_eq!(page.document().style(tip, "opacity"), Some("1"));
    page.dispatch(PageEvent::MouseLeave { target: link });
    assert_eq!(page.document().style(tip, "opacity"), Some("0"));
}

// =============================================================================
// Cards
// =============================================================================

#[test]
fn card_hover_ripples_and_tilts_image() {
    let fixture = PageFixture::landing_page();
    let card = fixture.cards[0];
    let image = fixture.card_image;
    let mut page = fixture.into_page().unwrap();

    page.dispatch(PageEvent::MouseEnter {
        target: card,
        x: 240.0,
        y: 350.0,
    });
    assert_eq!(
        page.document().style(image, "transform"),
        Some("scale(1.05) rotate(1deg)")
    );
    let ripple = page
        .document()
        .children(card)
        .iter()
        .copied()
        .find(|c| page.document().has_class(*c, RIPPLE_CLASS))
        .unwrap();

    page.advance(Duration::from_millis(600));
    assert!(!page.document().is_connected(ripple));
    assert_eq!(page.card_effects().unwrap().active_ripples(), 0);

    page.dispatch(PageEvent::MouseLeave { target: card });
    assert_eq!(
        page.document().style(image, "transform"),
        Some("scale(1) rotate(0deg)")
    );
}

#[test]
fn card_click_presses_briefly() {
    let fixture = PageFixture::landing_page();
    let card = fixture.cards[0];
    let image = fixture.card_image;
    let mut page = fixture.into_page().unwrap();

    page.dispatch(PageEvent::Click { target: image });
    assert_eq!(page.document().style(card, "transform"), Some("scale(0.98)"));
    page.advance(Duration::from_millis(150));
    assert_eq!(page.document().style(card, "transform"), Some("scale(1)"));
}

#[test]
fn dispose_takes_down_live_ripples() {
    let fixture = PageFixture::landing_page();
    let card = fixture.cards[1];
    let mut page = fixture.into_page().unwrap();

    page.dispatch(PageEvent::MouseEnter {
        target: card,
        x: 100.0,
        y: 900.0,
    });
    assert_eq!(page.card_effects().unwrap().active_ripples(), 1);
    page.dispose();
    assert!(
        !page
            .document()
            .children(card)
            .iter()
            .any(|c| page.document().has_class(*c, RIPPLE_CLASS))
    );
}

// =============================================================================
// Alerts
// =============================================================================

#[test]
fn alerts_fade_then_disappear() {
    let fixture = PageFixture::landing_page();
    let alert = fixture.alert;
    let mut page = fixture.into_page().unwrap();
    assert!(
        page.document()
            .children(alert)
            .iter()
            .any(|c| page.document().has_class(*c, CLOSE_CLASS))
    );

    page.advance(Duration::from_millis(5000));
    assert_eq!(page.document().style(alert, "opacity"), Some("0"));
    assert!(page.document().is_connected(alert));

    page.advance(Duration::from_millis(300));
    assert!(!page.document().is_connected(alert));
}

#[test]
fn close_button_dismisses_early() {
    let fixture = PageFixture::landing_page();
    let alert = fixture.alert;
    let mut page = fixture.into_page().unwrap();
    let close = page.alerts().and_then(|a| a.close_button(alert)).unwrap();

    page.dispatch(PageEvent::Click { target: close });
    page.advance(Duration::from_millis(300));
    assert!(!page.document().is_connected(alert));
}

// =============================================================================
// Forms
// =============================================================================

#[test]
fn form_controls_validate_and_submit_shows_loading() {
    let fixture = PageFixture::landing_page();
    let (email, phone, form, submit) = (fixture.email, fixture.phone, fixture.form, fixture.submit);
    let mut page = fixture.into_page().unwrap();

    page.dispatch(PageEvent::Focus { target: email });
    let parent = page.document().parent(email).unwrap();
    assert!(page.document().has_class(parent, "form-focused"));

    page.dispatch(PageEvent::Input {
        target: email,
        value: "guest@example".to_string(),
    });
    assert!(page.document().has_class(email, "invalid"));
    page.dispatch(PageEvent::Input {
        target: email,
        value: "guest@example.com".to_string(),
    });
    assert!(page.document().has_class(email, "valid"));
    page.dispatch(PageEvent::Blur { target: email });
    assert!(!page.document().has_class(parent, "form-focused"));

    page.dispatch(PageEvent::Input {
        target: phone,
        value: "055 123 4567".to_string(),
    });
    assert!(page.document().has_class(phone, "valid"));

    page.dispatch(PageEvent::Submit { form });
    assert_eq!(page.document().attribute(submit, "disabled"), Some(""));
    page.advance(Duration::from_millis(5000));
    assert_eq!(page.document().attribute(submit, "disabled"), None);
    assert_eq!(page.document().text(submit), "Send");
}

#[test]
fn buttons_scale_while_pressed() {
    let fixture = PageFixture::landing_page();
    let submit = fixture.submit;
    let mut page = fixture.into_page().unwrap();
    page.dispatch(PageEvent::MouseDown { target: submit });
    assert_eq!(page.document().style(submit, "transform"), Some("scale(0.95)"));
    page.dispatch(PageEvent::MouseLeave { target: submit });
    assert_eq!(page.document().style(submit, "transform"), Some("scale(1)"));
}

// =============================================================================
// Images, dropdowns, keyboard, idle
// =============================================================================

#[test]
fn deferred_image_loads_when_near() {
    let fixture = PageFixture::landing_page();
    let image = fixture.image;
    let mut page = fixture.into_page().unwrap();
    page.run_frame();
    assert_eq!(page.document().attribute(image, "src"), None);

    scroll_frame(&mut page, 2500.0);
    assert_eq!(page.document().attribute(image, "src"), Some("/static/gallery.jpg"));
    assert!(page.document().has_class(image, "loaded"));
}

#[test]
fn dropdown_opens_and_closes_on_outside_click() {
    let fixture = PageFixture::landing_page();
    let (toggle, menu, card) = (fixture.dropdown_toggle, fixture.dropdown_menu, fixture.cards[0]);
    let mut page = fixture.into_page().unwrap();

    page.dispatch(PageEvent::Click { target: toggle });
    assert!(page.document().has_class(menu, "show"));
    page.dispatch(PageEvent::Click { target: card });
    assert!(!page.document().has_class(menu, "show"));

    page.dispatch(PageEvent::Focus { target: toggle });
    page.dispatch(PageEvent::KeyDown { key: Key::Enter });
    assert!(page.document().has_class(menu, "show"));
}

#[test]
fn tab_enables_keyboard_mode_until_click() {
    let fixture = PageFixture::landing_page();
    let card = fixture.cards[0];
    let mut page = fixture.into_page().unwrap();
    let body = page.document().body();

    page.dispatch(PageEvent::KeyDown { key: Key::Tab });
    assert!(page.document().has_class(body, KEYBOARD_CLASS));
    page.dispatch(PageEvent::Click { target: card });
    assert!(!page.document().has_class(body, KEYBOARD_CLASS));
}

#[test]
fn idle_page_gets_inactive_class() {
    let mut page = PageFixture::landing_page().into_page().unwrap();
    let body = page.document().body();

    page.dispatch(PageEvent::MouseMove);
    page.advance(Duration::from_secs(29));
    assert!(!page.document().has_class(body, "inactive"));
    page.advance(Duration::from_secs(1));
    assert!(page.document().has_class(body, "inactive"));

    page.dispatch(PageEvent::TouchStart);
    assert!(!page.document().has_class(body, "inactive"));
}
