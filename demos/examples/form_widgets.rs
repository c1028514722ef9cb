// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-place widgets: radio group, tabs, a linear stepper, and sort headers.
//!
//! None of these use overlays; each owns a roving tab stop over its elements.
//!
//! Run:
//! - `cargo run -p trellis_demos --example form_widgets`

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use trellis_dom::{Document, ElementData, ElementId};
use trellis_events::{Key, KeyEvent};
use trellis_widgets::{
    RadioGroup, SortConfig, SortHeaders, Stepper, StepperConfig, Tabs, TabsConfig, WidgetError,
};

/// Lay out a row of focusable elements under `parent`.
fn row(doc: &mut Document, parent: ElementId, y: f64, labels: &[&str]) -> Result<Vec<ElementId>, WidgetError> {
    let mut out = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let x = 20.0 + i as f64 * 130.0;
        let el = doc.create_element(
            ElementData::new("button")
                .focusable()
                .with_label(label)
                .with_bounds(Rect::new(x, y, x + 120.0, y + 32.0)),
        );
        doc.append_child(parent, el)?;
        out.push(el);
    }
    Ok(out)
}

fn main() -> Result<(), WidgetError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .init();

    let mut doc = Document::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let mut now = 0;
    let mut press = |key: Key| {
        now += 50;
        (KeyEvent::new(key), now)
    };

    println!("== Radio group ==");
    let group = doc.create_element(ElementData::new("div"));
    doc.append_child(body, group)?;
    let radios = row(&mut doc, group, 20.0, &["Small", "Medium", "Large"])?;
    let mut size = RadioGroup::new(&mut doc, group, radios, vec!['s', 'm', 'l'])?;
    size.set_disabled(&mut doc, 1, true);
    println!("  click Small -> {:?}", size.click(&mut doc, 0));
    let (event, t) = press(Key::ArrowDown);
    println!("  ArrowDown -> {:?} (Medium is disabled)", size.handle_key(&mut doc, &event, t));
    println!(
        "  tab stop is {:?}",
        size.tab_stop().and_then(|el| doc.label(el))
    );

    println!("\n== Tabs ==");
    let list = doc.create_element(ElementData::new("div"));
    doc.append_child(body, list)?;
    let tab_row = row(&mut doc, list, 80.0, &["General", "Privacy", "Advanced"])?;
    let panels = (0..3)
        .map(|_| {
            let panel = doc.create_element(
                ElementData::new("section").with_bounds(Rect::new(20.0, 120.0, 400.0, 300.0)),
            );
            doc.append_child(body, panel).map(|()| panel)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut tabs = Tabs::new(&mut doc, list, tab_row.clone(), panels, TabsConfig::default())?;
    doc.focus(tab_row[0]);
    for key in [Key::ArrowRight, Key::End, Key::Home] {
        let (event, t) = press(key);
        println!("  {key:?} -> {:?}", tabs.handle_key(&mut doc, &event, t));
    }

    println!("\n== Linear stepper ==");
    let headers = row(&mut doc, body, 320.0, &["Account", "Address", "Review"])?;
    let mut stepper = Stepper::new(
        &mut doc,
        headers,
        StepperConfig {
            linear: true,
            ..StepperConfig::default()
        },
    )?;
    println!("  next before completing -> {:?}", stepper.next(&mut doc));
    stepper.set_completed(&mut doc, 0, true);
    println!("  next after completing  -> {:?}", stepper.next(&mut doc));
    println!("  jump to Review         -> {:?}", stepper.click(&mut doc, 2));

    println!("\n== Sort headers ==");
    let columns = row(&mut doc, body, 380.0, &["Name", "Size", "Modified"])?;
    let mut sort = SortHeaders::new(&mut doc, columns.clone(), SortConfig::default())?;
    for _ in 0..3 {
        let active = sort.click(&mut doc, 1);
        println!(
            "  click Size -> {active:?}, aria-sort={:?}",
            doc.attribute(columns[1], "aria-sort").unwrap_or("")
        );
    }
    Ok(())
}
