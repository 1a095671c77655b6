//! DOM-backed [`Presentation`]. Expects the page to provide the screens,
//! HUD fields, grid container, level popup and tick sound by id.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, HtmlElement, MouseEvent, Window};

use crate::deck::{Card, GridLayout};
use crate::error::{GameError, Result};
use crate::game::{CardFace, Cue, Presentation, Screen};
use crate::timer::AlertTier;

const FALLBACK_VIEWPORT: (f64, f64) = (800.0, 600.0);

fn element<T: JsCast>(doc: &Document, id: &str) -> Result<T> {
    doc.get_element_by_id(id)
        .ok_or_else(|| GameError::MissingElement(id.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| GameError::Js(format!("#{id} has an unexpected element type")))
}

fn create(doc: &Document, tag: &str) -> Result<HtmlElement> {
    doc.create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| GameError::Js(format!("<{tag}> is not an HtmlElement")))
}

fn set_display(el: &HtmlElement, visible: bool) {
    let value = if visible { "block" } else { "none" };
    el.style().set_property("display", value).ok();
}

pub struct DomPresentation {
    window: Window,
    document: Document,
    body: HtmlElement,
    welcome: HtmlElement,
    container: HtmlElement,
    game_over: HtmlElement,
    level: Element,
    time: Element,
    grid: HtmlElement,
    popup: Element,
    tick_sound: HtmlAudioElement,
    cards: Vec<HtmlElement>,
    // Dropped (and so released) whenever the grid is rebuilt.
    listeners: Vec<Closure<dyn FnMut(MouseEvent)>>,
    cue_rejected: Closure<dyn FnMut(JsValue)>,
}

impl DomPresentation {
    pub fn attach(window: Window) -> Result<Self> {
        let document = window.document().ok_or(GameError::NoDocument)?;
        let body = document.body().ok_or_else(|| GameError::MissingElement("body".into()))?;
        Ok(Self {
            welcome: element(&document, "welcomeScreen")?,
            container: element(&document, "gameContainer")?,
            game_over: element(&document, "gameOverScreen")?,
            level: element(&document, "level")?,
            time: element(&document, "time")?,
            grid: element(&document, "grid")?,
            popup: element(&document, "level-popup")?,
            tick_sound: element(&document, "tickSound")?,
            cards: Vec::new(),
            listeners: Vec::new(),
            cue_rejected: Closure::wrap(Box::new(|reason: JsValue| {
                tracing::debug!(?reason, "tick cue not played");
            }) as Box<dyn FnMut(_)>),
            body,
            document,
            window,
        })
    }

    fn build_card(&mut self, index: usize, card: &Card, layout: &GridLayout) -> Result<HtmlElement> {
        let el = create(&self.document, "div")?;
        el.class_list().add_1("card")?;
        if card.filler {
            el.class_list().add_1("filler")?;
        }
        el.set_attribute("data-emoji", &card.symbol)?;
        let style = el.style();
        style.set_property("width", &format!("{}px", layout.card_px))?;
        style.set_property("height", &format!("{}px", layout.card_px))?;

        let span = create(&self.document, "span")?;
        span.set_text_content(Some(&card.symbol));
        span.style().set_property("font-size", &format!("{}px", layout.glyph_px))?;
        let visibility = if card.filler { "visible" } else { "hidden" };
        span.style().set_property("visibility", visibility)?;
        el.append_child(&span)?;

        if !card.filler {
            let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
                super::activate(index);
            }) as Box<dyn FnMut(_)>);
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            self.listeners.push(closure);
        }
        Ok(el)
    }

    fn try_render(&mut self, layout: &GridLayout, cards: &[Card]) -> Result<()> {
        self.grid.set_inner_html("");
        self.cards.clear();
        self.listeners.clear();

        let track = format!("repeat({}, {}px)", layout.size, layout.card_px);
        let style = self.grid.style();
        style.set_property("grid-template-columns", &track)?;
        style.set_property("grid-template-rows", &track)?;

        for (index, card) in cards.iter().enumerate() {
            let el = self.build_card(index, card, layout)?;
            self.grid.append_child(&el)?;
            self.cards.push(el);
        }
        Ok(())
    }

    fn glyph(el: &HtmlElement) -> Option<HtmlElement> {
        el.query_selector("span").ok().flatten()?.dyn_into().ok()
    }
}

impl Presentation for DomPresentation {
    fn viewport(&self) -> (f64, f64) {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(w), Some(h)) => (w, h),
            _ => FALLBACK_VIEWPORT,
        }
    }

    fn show_screen(&mut self, screen: Screen) {
        set_display(&self.welcome, screen == Screen::Welcome);
        set_display(&self.container, screen == Screen::Game);
        set_display(&self.game_over, screen == Screen::GameOver);
    }

    fn show_level(&mut self, level: u32) {
        self.level.set_text_content(Some(&level.to_string()));
    }

    fn show_time(&mut self, seconds: i32) {
        self.time.set_text_content(Some(&seconds.to_string()));
    }

    fn set_alert(&mut self, tier: AlertTier) {
        let classes = self.container.class_list();
        for class in AlertTier::ALL_CLASSES {
            classes.remove_1(class).ok();
        }
        if let Some(class) = tier.class_name() {
            classes.add_1(class).ok();
        }
    }

    fn set_pulse(&mut self, on: bool) {
        let (time, body) = (self.time.class_list(), self.body.class_list());
        if on {
            time.add_1("pulse").ok();
            body.add_1("pulsing-effect").ok();
        } else {
            time.remove_1("pulse").ok();
            body.remove_1("pulsing-effect").ok();
        }
    }

    fn render_grid(&mut self, layout: &GridLayout, cards: &[Card]) {
        if let Err(err) = self.try_render(layout, cards) {
            tracing::error!(%err, "grid render failed");
        }
    }

    fn set_card_face(&mut self, index: usize, face: CardFace) {
        let Some(el) = self.cards.get(index) else {
            return;
        };
        let classes = el.class_list();
        let visible = match face {
            CardFace::Down => {
                classes.remove_1("flipped").ok();
                false
            }
            CardFace::Up => {
                classes.add_1("flipped").ok();
                true
            }
            CardFace::Matched => {
                classes.add_1("flipped").ok();
                classes.add_1("matched").ok();
                true
            }
        };
        if let Some(span) = Self::glyph(el) {
            let value = if visible { "visible" } else { "hidden" };
            span.style().set_property("visibility", value).ok();
        }
    }

    fn show_level_banner(&mut self, visible: bool) {
        let classes = self.popup.class_list();
        if visible {
            classes.remove_1("hidden").ok();
        } else {
            classes.add_1("hidden").ok();
        }
    }

    fn play_cue(&mut self, cue: Cue) {
        match cue {
            Cue::Tick => {
                self.tick_sound.set_current_time(0.0);
                // Autoplay policies may reject; a missed tick is harmless.
                match self.tick_sound.play() {
                    Ok(promise) => {
                        let _ = promise.catch(&self.cue_rejected);
                    }
                    Err(err) => tracing::debug!(?err, "tick cue not played"),
                }
            }
        }
    }
}
