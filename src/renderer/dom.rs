//! Event-driven DOM updates
//!
//! Horizontal positions stay in percent (CSS `left: N%`) so the page can
//! resize freely; vertical positions and sizes are pixels.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::animation::{SpriteAnimator, object_sprite};
use crate::sim::{GameEvent, RemovalReason};

/// Renders simulation events into the game page
pub struct DomRenderer {
    document: Document,
    container: Element,
    player: HtmlElement,
    score: Option<Element>,
    start_screen: Option<HtmlElement>,
    end_screen: Option<HtmlElement>,
    objects: HashMap<u32, HtmlElement>,
    animator: SpriteAnimator,
}

fn html_by_id(document: &Document, id: &str) -> Option<HtmlElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

impl DomRenderer {
    /// Look up the page elements. Returns None if the page is missing the
    /// game container or the player element.
    pub fn new(document: Document) -> Option<Self> {
        let container = document.get_element_by_id("game-container")?;
        let player = html_by_id(&document, "player")?;
        let score = document.get_element_by_id("score");
        let start_screen = html_by_id(&document, "start-screen");
        let end_screen = html_by_id(&document, "end-screen");

        let renderer = Self {
            document,
            container,
            player,
            score,
            start_screen,
            end_screen,
            objects: HashMap::new(),
            animator: SpriteAnimator::new(),
        };
        renderer.update_player_sprite();
        Some(renderer)
    }

    /// Apply one simulation event
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CountdownTick { n } => {
                self.hide_screens();
                self.set_score_text(&format!("Starting in: {}", n));
            }
            GameEvent::ScoreChanged { score } => {
                self.set_score_text(&format!("Score: {}", score));
            }
            GameEvent::ObjectSpawned { id, x, size, variant } => {
                self.spawn_object(*id, *x, *size, *variant);
            }
            GameEvent::ObjectMoved { id, y, size } => {
                if let Some(el) = self.objects.get(id) {
                    set_style(el, "top", &format!("{}px", y));
                    set_style(el, "width", &format!("{}px", size));
                    set_style(el, "height", &format!("{}px", size));
                }
            }
            GameEvent::ObjectRemoved { id, reason } => {
                if let Some(el) = self.objects.remove(id) {
                    el.remove();
                }
                if *reason == RemovalReason::Collision {
                    log::debug!("Object {} hit the player", id);
                }
            }
            GameEvent::GameOver { score } => {
                if let Some(end) = &self.end_screen {
                    set_style(end, "display", "block");
                }
                log::info!("Final score: {}", score);
            }
            GameEvent::PlayerMoved { position } => {
                set_style(&self.player, "left", &format!("{}%", position));
            }
            GameEvent::PlayerAnimation { state } => {
                self.animator.set_state(*state);
                self.update_player_sprite();
            }
            GameEvent::RunReset => self.clear_objects(),
        }
    }

    /// A run was accepted: clear the overlays and the old score right away
    pub fn begin_run(&self) {
        self.hide_screens();
        self.set_score_text("Score: 0");
    }

    /// Advance sprite animation by wall-clock time
    pub fn update(&mut self, dt_ms: f64) {
        if self.animator.update(dt_ms) {
            self.update_player_sprite();
        }
    }

    fn spawn_object(&mut self, id: u32, x: f32, size: f32, variant: u8) {
        let Some(el) = self
            .document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("Failed to create element for object {}", id);
            return;
        };
        let _ = el.class_list().add_1("falling-object");
        set_style(&el, "width", &format!("{}px", size));
        set_style(&el, "height", &format!("{}px", size));
        set_style(&el, "left", &format!("{}%", x));
        set_style(&el, "top", &format!("{}px", crate::consts::SPAWN_OFFSET_Y));
        set_style(
            &el,
            "background-image",
            &format!("url('{}')", object_sprite(variant)),
        );
        let _ = self.container.append_child(&el);
        self.objects.insert(id, el);
    }

    fn clear_objects(&mut self) {
        for (_, el) in self.objects.drain() {
            el.remove();
        }
    }

    fn hide_screens(&self) {
        for screen in [&self.start_screen, &self.end_screen].into_iter().flatten() {
            set_style(screen, "display", "none");
        }
    }

    fn set_score_text(&self, text: &str) {
        if let Some(score) = &self.score {
            score.set_text_content(Some(text));
        }
    }

    fn update_player_sprite(&self) {
        set_style(
            &self.player,
            "background-image",
            &format!("url(\"{}\")", self.animator.sprite()),
        );
    }
}
