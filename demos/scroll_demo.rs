//! Scroll Demo
//!
//! Drives the stock landing page through a scripted session on the async
//! runtime and prints the document mutations as the runtime streams them:
//! - a scroll down the page (reveals, navbar hide, lazy image)
//! - a scroll back up (navbar returns)
//! - a theme toggle and a click on the scroll-to-top button
//!
//! Pass a path as the first argument to also write debug logs there.

use std::time::Duration;

use pagefx::testing::PageFixture;
use pagefx::{Mutation, PageEvent, PageRuntime, Result, init_logger, log};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    if let Some(path) = std::env::args().nth(1) {
        init_logger(path)?;
    }

    let page = PageFixture::landing_page().into_page()?;
    let toggle = page.theme().and_then(|theme| theme.toggle_button());
    let scroll_top = page.scroll_top().map(|button| button.button());

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let (mutation_tx, mut mutation_rx) = mpsc::unbounded_channel::<Vec<Mutation>>();
    let (runtime, events) = PageRuntime::new(page);
    let session = tokio::spawn(
        runtime
            .with_command_sink(command_tx)
            .with_mutation_sink(mutation_tx)
            .run(),
    );

    for offset in (0..=3000).step_by(150).chain((0..=3000).rev().step_by(500)) {
        let _ = events.send(PageEvent::Scroll {
            offset: offset as f64,
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    if let Some(toggle) = toggle {
        let _ = events.send(PageEvent::Click { target: toggle });
    }
    if let Some(button) = scroll_top {
        let _ = events.send(PageEvent::Scroll { offset: 900.0 });
        let _ = events.send(PageEvent::Click { target: button });
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = events.send(PageEvent::Shutdown);

    if let Err(err) = session.await {
        log::warn!("page session failed: {err}");
        return Ok(());
    }

    while let Ok(command) = command_rx.try_recv() {
        println!("host command: {command:?}");
    }
    while let Ok(batch) = mutation_rx.try_recv() {
        println!("-- {} change(s)", batch.len());
        for mutation in &batch {
            print_mutation(mutation);
        }
    }
    Ok(())
}

fn print_mutation(mutation: &Mutation) {
    match mutation {
        Mutation::ClassAdded { node, class } => println!("{node:?} +.{class}"),
        Mutation::ClassRemoved { node, class } => println!("{node:?} -.{class}"),
        Mutation::StyleSet {
            node,
            property,
            value,
        } => println!("{node:?} {property}: {value}"),
        other => println!("{other:?}"),
    }
}
