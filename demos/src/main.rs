// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted host loop driving the Trellis engine.
//!
//! The host owns the document and the overlay manager. It feeds every event to
//! the manager first, hands each dismissal back to the widget that owns the
//! overlay, and then forwards keys to whichever widget has focus.
//!
//! Run:
//! - `cargo run -p trellis_demos`
//! - `RUST_LOG=trace cargo run -p trellis_demos` to see repositioning and roving moves.

use kurbo::{Point, Rect, Size};
use tracing_subscriber::EnvFilter;
use trellis_combobox::{ComboboxOption, SelectionMode};
use trellis_dom::{Document, ElementData, ElementId};
use trellis_events::{Key, KeyEvent, UiEvent};
use trellis_overlay::{Dismissed, OverlayManager};
use trellis_widgets::{
    Autocomplete, AutocompleteConfig, Menu, MenuConfig, MenuEntry, Modal, ModalConfig, Select,
    SelectConfig, Tooltip, TooltipConfig, WidgetError,
};

/// Milliseconds per simulated frame.
const FRAME: u64 = 16;

struct Host {
    doc: Document,
    overlays: OverlayManager,
    now: u64,
    menu: Menu,
    toppings: Select<&'static str>,
    country: Autocomplete<&'static str>,
    help: Tooltip,
    confirm: Modal,
    delete_button: ElementId,
}

fn button(doc: &mut Document, label: &str, bounds: Rect) -> Result<ElementId, WidgetError> {
    let el = doc.create_element(
        ElementData::new("button")
            .focusable()
            .with_label(label)
            .with_bounds(bounds),
    );
    doc.append_child(doc.body(), el)?;
    Ok(el)
}

fn confirm_dialog(doc: &mut Document, surface: ElementId) -> Result<Vec<ElementId>, WidgetError> {
    doc.set_local_bounds(surface, Rect::new(0.0, 0.0, 320.0, 160.0));
    let mut actions = Vec::new();
    for (label, x) in [("Cancel", 120.0), ("Delete", 220.0)] {
        let el = doc.create_element(
            ElementData::new("button")
                .focusable()
                .with_label(label)
                .with_bounds(Rect::new(x, 110.0, x + 90.0, 146.0)),
        );
        doc.append_child(surface, el)?;
        actions.push(el);
    }
    Ok(actions)
}

impl Host {
    fn new() -> Result<Self, WidgetError> {
        let mut doc = Document::new(Size::new(1024.0, 768.0));
        let menu_button = button(&mut doc, "Edit", Rect::new(20.0, 20.0, 140.0, 56.0))?;
        let select_button = button(&mut doc, "Toppings", Rect::new(160.0, 20.0, 360.0, 56.0))?;
        let input = doc.create_element(
            ElementData::new("input")
                .focusable()
                .with_label("Country")
                .with_bounds(Rect::new(380.0, 20.0, 620.0, 56.0)),
        );
        doc.append_child(doc.body(), input)?;
        let help_button = button(&mut doc, "?", Rect::new(640.0, 20.0, 680.0, 56.0))?;
        let delete_button = button(&mut doc, "Delete file", Rect::new(700.0, 20.0, 820.0, 56.0))?;

        let menu = Menu::new(
            &mut doc,
            menu_button,
            vec![
                MenuEntry::new("Undo"),
                MenuEntry::new("Cut"),
                MenuEntry::new("Copy"),
                MenuEntry::new("Paste").disabled(),
            ],
            MenuConfig::default(),
        )?;
        let toppings = Select::new(
            &mut doc,
            select_button,
            vec![
                ComboboxOption::new("cheese", "Cheese"),
                ComboboxOption::new("olives", "Olives"),
                ComboboxOption::new("anchovies", "Anchovies").disabled(),
                ComboboxOption::new("basil", "Basil"),
            ],
            SelectConfig {
                selection: SelectionMode::Multiple,
                placeholder: "Toppings".into(),
                ..SelectConfig::default()
            },
        )?;
        let country = Autocomplete::new(
            &mut doc,
            input,
            ["Austria", "Germany", "Georgia", "Norway", "Portugal"]
                .into_iter()
                .map(|name| ComboboxOption::new(name, name))
                .collect(),
            AutocompleteConfig::default(),
        )?;
        let help = Tooltip::new(&doc, help_button, "Keyboard shortcuts", TooltipConfig::default())?;
        let confirm = Modal::new(ModalConfig {
            label: Some("Delete file?".into()),
            ..ModalConfig::default()
        });
        Ok(Self {
            doc,
            overlays: OverlayManager::new(),
            now: 0,
            menu,
            toppings,
            country,
            help,
            confirm,
            delete_button,
        })
    }

    fn focused_label(&self) -> &str {
        self.doc.label(self.doc.active_element()).unwrap_or("")
    }

    /// Feed an event to the overlay manager and route what it dismissed.
    fn dispatch(&mut self, event: UiEvent) -> Result<(), WidgetError> {
        let dismissed = self.overlays.handle_event(&mut self.doc, &event);
        for d in &dismissed {
            self.route_dismissal(d)?;
        }
        Ok(())
    }

    fn key(&mut self, key: Key) -> Result<KeyEvent, WidgetError> {
        let event = KeyEvent::new(key);
        let ui = UiEvent::key_down(&self.doc, event);
        self.dispatch(ui)?;
        Ok(event)
    }

    fn click_at(&mut self, x: f64, y: f64) -> Result<(), WidgetError> {
        if let Some(event) = UiEvent::pointer_down_at(&self.doc, Point::new(x, y)) {
            self.dispatch(event)?;
        }
        Ok(())
    }

    /// Advance time by one frame: flush repositioning, then fire due delays.
    fn frame(&mut self) -> Result<(), WidgetError> {
        self.now += FRAME;
        let dismissed = self.overlays.on_animation_frame(&mut self.doc);
        for d in &dismissed {
            self.route_dismissal(d)?;
        }
        if let Some(event) = self.help.poll(&mut self.doc, &mut self.overlays, self.now)? {
            println!("  tooltip: {event:?}");
        }
        Ok(())
    }

    fn route_dismissal(&mut self, d: &Dismissed) -> Result<(), WidgetError> {
        println!("  overlay {} dismissed: {:?}", d.handle, d.reason);
        let doc = &mut self.doc;
        if let Some(event) = self.menu.on_overlay_closed(doc, d) {
            println!("  menu: {event:?}");
        }
        for event in self.toppings.on_overlay_closed(doc, d) {
            println!("  toppings: {event:?}");
        }
        for event in self.country.on_overlay_closed(doc, &mut self.overlays, d)? {
            println!("  country: {event:?}");
        }
        if let Some(event) = self.help.on_overlay_closed(doc, d) {
            println!("  tooltip: {event:?}");
        }
        if self.confirm.on_overlay_closed(doc, d) {
            println!("  dialog closed");
        }
        Ok(())
    }

    fn menu_walkthrough(&mut self) -> Result<(), WidgetError> {
        println!("\n== Menu ==");
        self.doc.focus(self.menu.trigger());
        let open = self.menu.handle_trigger_key(
            &mut self.doc,
            &mut self.overlays,
            &KeyEvent::new(Key::ArrowDown),
        )?;
        println!("  {open:?}, focus on {:?}", self.focused_label());
        for key in [Key::ArrowDown, Key::Enter] {
            let event = self.key(key)?;
            let result = self
                .menu
                .handle_key(&mut self.doc, &mut self.overlays, &event, self.now);
            println!("  {key:?} -> {result:?}, focus on {:?}", self.focused_label());
        }
        Ok(())
    }

    fn select_walkthrough(&mut self) -> Result<(), WidgetError> {
        println!("\n== Multi-select ==");
        self.doc.focus(self.toppings.trigger());
        for key in [Key::ArrowDown, Key::Space, Key::ArrowDown, Key::ArrowDown, Key::Enter] {
            let event = self.key(key)?;
            let events = self
                .toppings
                .handle_key(&mut self.doc, &mut self.overlays, &event, self.now)?;
            println!("  {key:?} -> {events:?}");
            self.frame()?;
        }
        println!("  click outside the panel");
        self.click_at(900.0, 600.0)?;
        println!(
            "  values {:?}, trigger reads {:?}",
            self.toppings.values(),
            self.doc.label(self.toppings.trigger()).unwrap_or("")
        );
        Ok(())
    }

    fn autocomplete_walkthrough(&mut self) -> Result<(), WidgetError> {
        println!("\n== Autocomplete ==");
        let input = self.country.input();
        self.doc.focus(input);
        let events = self.country.focus(&mut self.doc, &mut self.overlays)?;
        println!("  focus -> {events:?}");
        let events = self.country.input_text(&mut self.doc, &mut self.overlays, "ge")?;
        println!("  typed \"ge\" -> {events:?}, rows {:?}", self.country.rendered());
        for key in [Key::ArrowDown, Key::ArrowDown, Key::Enter] {
            let event = self.key(key)?;
            let events = self
                .country
                .handle_key(&mut self.doc, &mut self.overlays, &event)?;
            println!("  {key:?} -> {events:?}");
        }
        println!(
            "  committed {:?}, input value {:?}",
            self.country.value(),
            self.doc.attribute(input, "value").unwrap_or("")
        );
        Ok(())
    }

    fn tooltip_walkthrough(&mut self) -> Result<(), WidgetError> {
        println!("\n== Tooltip ==");
        self.help
            .pointer_enter(&mut self.doc, &mut self.overlays, self.now)?;
        while !self.help.is_visible() {
            self.frame()?;
        }
        println!("  scrolling 20 times in one frame");
        let before = self.overlays.position_updates();
        for step in 1..=20 {
            self.doc
                .set_scroll_offset(kurbo::Vec2::new(0.0, f64::from(step)));
            self.dispatch(UiEvent::Scroll)?;
        }
        self.frame()?;
        println!(
            "  {} recomputation(s), bubble at {:?}",
            self.overlays.position_updates() - before,
            self.help.handle().and_then(|h| self.overlays.position(h))
        );
        self.help
            .pointer_leave(&mut self.doc, &mut self.overlays, self.now)?;
        while self.help.is_visible() {
            self.frame()?;
        }
        self.doc.set_scroll_offset(kurbo::Vec2::ZERO);
        Ok(())
    }

    fn dialog_walkthrough(&mut self) -> Result<(), WidgetError> {
        println!("\n== Dialog ==");
        self.doc.focus(self.delete_button);
        let handle = self
            .confirm
            .open(&mut self.doc, &mut self.overlays, confirm_dialog)?;
        println!(
            "  opened {handle} at {:?}, focus on {:?}",
            self.overlays.position(handle),
            self.focused_label()
        );
        for _ in 0..2 {
            let event = self.key(Key::Tab)?;
            let outcome = self.confirm.handle_key(&mut self.doc, &event);
            println!("  Tab -> {outcome:?}, focus on {:?}", self.focused_label());
        }
        self.key(Key::Escape)?;
        println!(
            "  open: {}, focus back on {:?}",
            self.confirm.is_open(),
            self.focused_label()
        );
        Ok(())
    }
}

fn main() -> Result<(), WidgetError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let mut host = Host::new()?;
    host.menu_walkthrough()?;
    host.select_walkthrough()?;
    host.autocomplete_walkthrough()?;
    host.tooltip_walkthrough()?;
    host.dialog_walkthrough()?;
    println!("\n{} overlays still open", host.overlays.open_count());
    Ok(())
}
