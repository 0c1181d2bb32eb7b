//! Nutrition Hunter entry point
//!
//! In the browser this drives the game against the page DOM. Natively it
//! serves the leaderboard API that the page talks to.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent, TouchEvent,
    };

    use nutrition_hunter::leaderboard::{self, LeaderboardView};
    use nutrition_hunter::platform::{FixedStep, InputState, Intent, diff_ids, food_element_id};
    use nutrition_hunter::sim::{FoodItem, GameEvent, GamePhase, GameState, Snapshot, tick};
    use nutrition_hunter::{ScoringPolicy, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        clock: FixedStep,
        settings: Settings,
        leaderboard: LeaderboardView,
        /// Food ids that currently have an element in `#food-layer`
        rendered_food: Vec<u32>,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
            let tuning = tuning.with_policy(settings.policy);
            Self {
                state: GameState::with_tuning(seed, tuning),
                input: InputState::new(),
                clock: FixedStep::new(),
                settings,
                leaderboard: LeaderboardView::new(),
                rendered_food: Vec::new(),
            }
        }

        /// Run however many ticks this frame owes, collecting their events
        fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
            let ticks = self.clock.advance_to(now_ms);
            let mut events = Vec::new();
            for _ in 0..ticks {
                let input = self.input.take_tick_input();
                tick(&mut self.state, &input);
                events.append(&mut self.state.events);
            }
            events
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn element(document: &Document, id: &str) -> Option<HtmlElement> {
        document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// One element per item; it keeps its fall animation until picked up
    fn spawn_food_element(document: &Document, layer: &web_sys::Element, food: &FoodItem) {
        let Ok(el) = document.create_element("div") else {
            return;
        };
        el.set_id(&food_element_id(food.id));
        el.set_class_name(&format!("food food-{}", food.kind.as_str()));
        let _ = el.set_attribute(
            "style",
            &format!("left:{:.0}px;top:{:.0}px", food.pos.x, food.pos.y),
        );
        let _ = layer.append_child(&el);
    }

    /// Optional `<script id="tuning" type="application/json">` on the page
    fn load_tuning(document: &Document) -> Tuning {
        let json = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        if json.trim().is_empty() {
            return Tuning::default();
        }
        match Tuning::from_json(&json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Ignoring page tuning: {}", e);
                Tuning::default()
            }
        }
    }

    /// Position sprites and update the HUD from a snapshot
    fn render(game: &mut Game, document: &Document) {
        let snap: Snapshot = game.state.snapshot();

        if let Some(hunter) = element(document, "hunter") {
            let style = hunter.style();
            let _ = style.set_property("left", &format!("{:.0}px", snap.hunter.position_x));
            let _ = style.set_property(
                "bottom",
                &format!("{:.0}px", snap.hunter.height_above_ground),
            );
            let _ = style.set_property(
                "transform",
                &format!("scale({:.3})", snap.hunter.display_scale()),
            );
        }
        if let Some(beast) = element(document, "beast") {
            let _ = beast
                .style()
                .set_property("left", &format!("{:.0}px", snap.beast.position_x));
        }

        let ids: Vec<u32> = snap.food.iter().map(|f| f.id).collect();
        let diff = diff_ids(&game.rendered_food, &ids);
        if !diff.is_empty() {
            if let Some(layer) = document.get_element_by_id("food-layer") {
                for id in &diff.removed {
                    if let Some(el) = document.get_element_by_id(&food_element_id(*id)) {
                        el.remove();
                    }
                }
                for food in snap.food.iter().filter(|f| diff.added.contains(&f.id)) {
                    spawn_food_element(document, &layer, food);
                }
            }
            game.rendered_food = ids;
        }

        // HUD
        set_text(document, "#hud-score .hud-value", &snap.round.score.to_string());
        set_text(document, "#hud-lives .hud-value", &snap.round.lives.to_string());
        set_text(
            document,
            "#hud-speed .hud-value",
            &format!("{:.1}", snap.hunter.lateral_speed),
        );
        set_text(document, "#hud-muscle .hud-value", &snap.hunter.muscle.to_string());
        set_text(document, "#hud-weight .hud-value", &snap.hunter.weight.to_string());

        // Overlays
        let phase = snap.round.phase;
        set_visible(document, "instructions", phase == GamePhase::Instructions);
        set_visible(document, "countdown", phase == GamePhase::Countdown);
        set_visible(document, "game-over", phase == GamePhase::GameOver);
        set_visible(
            document,
            "controls-hint",
            phase == GamePhase::Playing && game.settings.show_controls_hint,
        );
        if phase == GamePhase::Countdown {
            let text = match snap.round.countdown_remaining {
                0 => "GO!".to_string(),
                n => n.to_string(),
            };
            set_text(document, "#countdown", &text);
        }
    }

    /// Fill the game-over panel
    fn render_game_over(game: &Game, document: &Document) {
        let Some(summary) = game.state.summary() else {
            return;
        };
        set_text(document, "#final-score", &summary.final_score.to_string());

        if let Some(list) = document.get_element_by_id("categories") {
            let html: String = summary
                .categories_consumed
                .iter()
                .map(|(kind, count)| format!("<li>{}: {}</li>", kind.as_str(), count))
                .collect();
            list.set_inner_html(&html);
        }

        let view = &game.leaderboard;
        if let Some(list) = document.get_element_by_id("leaderboard-list") {
            let html: String = view
                .board
                .entries
                .iter()
                .map(|e| format!("<li><span>{}</span><span>{}</span></li>", escape(&e.name), e.score))
                .collect();
            list.set_inner_html(&html);
        }
        let hint = match view.rank_for(summary.final_score) {
            Some(rank) if !view.submitted => format!("That would place #{}", rank),
            _ => String::new(),
        };
        set_text(document, "#rank-hint", &hint);
        set_text(
            document,
            "#leaderboard-message",
            view.message.as_deref().unwrap_or(if view.loading { "Loading..." } else { "" }),
        );
        set_visible(document, "score-form", !view.submitted);
    }

    fn escape(s: &str) -> String {
        s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
    }

    /// Fetch the board in the background; the game never waits on it
    fn refresh_leaderboard(game: Rc<RefCell<Game>>) {
        let endpoint = {
            let mut g = game.borrow_mut();
            g.leaderboard.begin_fetch();
            g.settings.leaderboard_endpoint.clone()
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = leaderboard::client::fetch_top(&endpoint).await;
            let mut g = game.borrow_mut();
            g.leaderboard.apply_fetch(result);
            if let Some(document) = document() {
                render_game_over(&g, &document);
            }
        });
    }

    fn submit_score(game: Rc<RefCell<Game>>, name: String) {
        let (endpoint, score) = {
            let mut g = game.borrow_mut();
            let Some(summary) = g.state.summary() else {
                return;
            };
            g.settings.remember_name(&name);
            g.settings.save();
            (g.settings.leaderboard_endpoint.clone(), summary.final_score)
        };
        wasm_bindgen_futures::spawn_local(async move {
            let result = leaderboard::client::submit_score(&endpoint, score, &name).await;
            let ok = result.is_ok();
            game.borrow_mut().leaderboard.apply_submit(result);
            if ok {
                refresh_leaderboard(game);
            } else if let Some(document) = document() {
                render_game_over(&game.borrow(), &document);
            }
        });
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Nutrition Hunter starting...");

        let Some(document) = document() else {
            log::error!("No document, cannot start");
            return;
        };

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        if let Some(input) = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&settings.player_name);
        }
        let tuning = load_tuning(&document);
        let game = Rc::new(RefCell::new(Game::new(seed, tuning, settings)));
        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_visibility(&document, game.clone());
        setup_touch_controls(&document, game.clone());
        setup_policy_select(&document, game.clone());
        setup_buttons(&document, game.clone());
        setup_score_form(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Nutrition Hunter running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Leave the keyboard to the name field on the game-over screen
                if g.state.round.phase == GamePhase::GameOver {
                    return;
                }
                if g.input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: nothing stays held
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A hidden tab stops frames; drop held keys and the stale frame time
    fn setup_visibility(document: &Document, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.input.release_all();
            g.clock.reset();
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_policy_select(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(select) = document
            .get_element_by_id("scoring-policy")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        select.set_value(game.borrow().settings.policy.as_str());

        let target = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(policy) = ScoringPolicy::from_str(&target.value()) else {
                return;
            };
            let mut g = game.borrow_mut();
            if g.state.set_scoring_policy(policy) {
                g.settings.policy = policy;
                g.settings.save();
            }
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, intent) in [
            ("touch-left", Intent::Left),
            ("touch-right", Intent::Right),
            ("touch-jump", Intent::Jump),
        ] {
            let Some(button) = document.get_element_by_id(id) else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.press(intent);
                });
                let _ = button
                    .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            for release in ["touchend", "touchcancel"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    game.borrow_mut().input.release(intent);
                });
                let _ = button
                    .add_event_listener_with_callback(release, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.press(Intent::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.press(Intent::Restart);
                g.leaderboard.reset_round();
                log::info!("Restart requested");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_score_form(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(form) = document.get_element_by_id("score-form") else {
            return;
        };
        let input = document
            .get_element_by_id("player-name")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            event.prevent_default();
            let Some(input) = input.as_ref() else {
                return;
            };
            let name = input.value();
            if name.trim().is_empty() {
                return;
            }
            submit_score(game.clone(), name);
        });
        let _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let events = {
            let mut g = game.borrow_mut();
            let events = g.update(time);
            if let Some(document) = document() {
                render(&mut g, &document);
            }
            events
        };

        for event in &events {
            if let GameEvent::GameOver { final_score } = event {
                log::info!("Final score {}", final_score);
                if let Some(document) = document() {
                    render_game_over(&game.borrow(), &document);
                }
                refresh_leaderboard(game.clone());
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use nutrition_hunter::leaderboard::LeaderboardService;
    use nutrition_hunter::leaderboard::server::{self, ServerConfig};

    env_logger::init();
    log::info!("Nutrition Hunter leaderboard starting...");

    let config = ServerConfig::from_env();
    let store = config.open_store().context("opening score store")?;
    let service = LeaderboardService::new(store);

    server::serve(&config, service)
        .await
        .with_context(|| format!("serving on {}", config.addr))?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
