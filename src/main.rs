//! Pumpkin Patch entry point
//!
//! Handles platform-specific initialization and drives the world from
//! browser input and animation frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pumpkin_patch::Tuning;
    use pumpkin_patch::costume;
    use pumpkin_patch::ledger::{CurrencyLedger, Wallet, settle_pickups};
    use pumpkin_patch::sim::{
        Direction, FrameRequest, GameEvent, InputEvent, MovementController, ObstacleKind, World,
    };

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Touch pads and the direction they drive
    const PADS: [(&str, Direction); 4] = [
        ("pad-up", Direction::Up),
        ("pad-down", Direction::Down),
        ("pad-left", Direction::Left),
        ("pad-right", Direction::Right),
    ];

    /// Game instance holding all state
    struct Game {
        world: World,
        controller: MovementController,
        wallet: Wallet,
        outfit: String,
        owned_outfits: Vec<String>,
        /// An animation frame is already requested
        frame_pending: bool,
        document: Document,
    }

    impl Game {
        fn new(world: World, document: Document) -> Self {
            Self {
                world,
                controller: MovementController::new(),
                wallet: Wallet::new(),
                outfit: "default".to_string(),
                owned_outfits: Vec::new(),
                frame_pending: false,
                document,
            }
        }

        fn element(&self, id: &str) -> Option<HtmlElement> {
            self.document.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()
        }

        /// Create obstacle sprites and position the player
        fn build_scene(&self) {
            let Some(world_el) = self.element("world") else {
                log::error!("#world container missing");
                return;
            };
            let base = self.world.field().base_size();

            for (i, obstacle) in self.world.obstacles().iter().enumerate() {
                let Ok(el) = self.document.create_element("div") else {
                    continue;
                };
                let Ok(el) = el.dyn_into::<HtmlElement>() else {
                    continue;
                };
                el.set_id(&format!("obstacle-{}", i));
                let kind = match obstacle.kind {
                    ObstacleKind::Tree => "tree",
                    ObstacleKind::Rock => "rock",
                };
                el.set_class_name(&format!("obstacle {}", kind));
                let size = obstacle.size(base);
                set_box(&el, obstacle.x, obstacle.y, size);
                if obstacle.mirrored {
                    let _ = el.style().set_property("transform", "scaleX(-1)");
                }
                let _ = world_el.append_child(&el);
            }

            self.render_player();
            self.render_camera();
            self.render_outfit();
            self.render_balance();
        }

        fn render_player(&self) {
            if let Some(el) = self.element("player") {
                let pos = self.world.player_position();
                set_box(&el, pos.x, pos.y, self.world.tuning().player_size);
            }
        }

        fn render_camera(&self) {
            if let Some(el) = self.element("world") {
                let offset = self.world.camera_offset();
                let _ = el.style().set_property(
                    "transform",
                    &format!("translate({}px, {}px)", offset.x, offset.y),
                );
            }
        }

        fn render_outfit(&self) {
            if let Some(el) = self.element("player-sprite") {
                let sprite = costume::sprite_for(&self.outfit);
                let flip = if sprite.mirrored { -1.0 } else { 1.0 };
                let style = el.style();
                let _ = style.set_property("background-image", &format!("url({})", sprite.asset));
                let _ = style.set_property(
                    "transform",
                    &format!("scale({}, {})", sprite.scale * flip, sprite.scale),
                );
            }
        }

        fn render_balance(&self) {
            if let Some(el) = self.element("coins") {
                el.set_text_content(Some(&self.wallet.balance().to_string()));
            }
        }

        fn spawn_collectible_element(&self, id: u64, x: f32, y: f32) {
            let Some(world_el) = self.element("world") else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            let Ok(el) = el.dyn_into::<HtmlElement>() else {
                return;
            };
            el.set_id(&format!("collectible-{}", id));
            el.set_class_name("collectible");
            set_box(&el, x, y, self.world.tuning().collectible_size);
            let _ = world_el.append_child(&el);
        }

        /// Push world events out to the DOM and the wallet
        fn flush(&mut self) {
            let events = self.world.drain_events();
            if events.is_empty() {
                return;
            }

            let earned = settle_pickups(&events, &mut self.wallet);
            let mut moved = false;
            for event in &events {
                match event {
                    GameEvent::PlayerMoved { .. } => moved = true,
                    GameEvent::CollectibleSpawned { id, position, .. } => {
                        self.spawn_collectible_element(*id, position.x, position.y);
                    }
                    GameEvent::Pickup { id, .. } => {
                        if let Some(el) = self.element(&format!("collectible-{}", id)) {
                            el.remove();
                        }
                    }
                }
            }

            if moved {
                self.render_player();
                self.render_camera();
            }
            if earned > 0 {
                log::info!("Earned {} coins", earned);
                self.render_balance();
            }
        }
    }

    fn set_box(el: &HtmlElement, x: f32, y: f32, size: f32) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", x));
        let _ = style.set_property("top", &format!("{}px", y));
        let _ = style.set_property("width", &format!("{}px", size));
        let _ = style.set_property("height", &format!("{}px", size));
    }

    fn with_game<T>(f: impl FnOnce(&Rc<RefCell<Game>>) -> T) -> Option<T> {
        GAME.with(|slot| slot.borrow().as_ref().map(f))
    }

    /// Feed one input edge to the controller and start the frame loop if needed
    fn dispatch(game: &Rc<RefCell<Game>>, event: InputEvent) {
        let schedule = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let wants_frame = g.controller.handle(event, &mut g.world);
            g.flush();
            if wants_frame && !g.frame_pending {
                g.frame_pending = true;
                true
            } else {
                false
            }
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pumpkin Patch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let mut world = World::new(Tuning::load(), seed);
        if let Some((w, h)) = viewport_size(&window) {
            world.set_viewport(w, h);
        }

        let game = Rc::new(RefCell::new(Game::new(world, document)));
        game.borrow().build_scene();

        setup_input_handlers(game.clone());
        setup_resize_handler(game.clone());

        GAME.with(|slot| *slot.borrow_mut() = Some(game));

        log::info!("Pumpkin Patch running (seed {})", seed);
    }

    fn viewport_size(window: &web_sys::Window) -> Option<(f32, f32)> {
        let w = window.inner_width().ok()?.as_f64()?;
        let h = window.inner_height().ok()?.as_f64()?;
        Some((w as f32, h as f32))
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard: WASD / arrows
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    event.prevent_default();
                    dispatch(&game, InputEvent::KeyDown(dir));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(dir) = Direction::from_key(&event.key()) {
                    dispatch(&game, InputEvent::KeyUp(dir));
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events will never arrive, drop everything
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                dispatch(&game, InputEvent::ReleaseAll);
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch pads: hold to walk, a short tap steps (handled on release).
        // Mouse clicks nudge directly; touchstart cancels the synthetic click.
        let Some(document) = window.document() else {
            return;
        };
        for (id, dir) in PADS {
            let Some(pad) = document.get_element_by_id(id) else {
                log::warn!("#{} missing, pad disabled", id);
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    dispatch(&game, InputEvent::TouchPress(dir));
                });
                let _ = pad.add_event_listener_with_callback(
                    "touchstart",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }

            for end in ["touchend", "touchcancel"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    dispatch(&game, InputEvent::TouchRelease(dir));
                });
                let _ = pad.add_event_listener_with_callback(end, closure.as_ref().unchecked_ref());
                closure.forget();
            }

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    dispatch(&game, InputEvent::Tap(dir));
                });
                let _ =
                    pad.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize_handler(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some((w, h)) = viewport_size(&window) {
                let mut g = game.borrow_mut();
                g.world.set_viewport(w, h);
                g.render_camera();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
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

    /// One animation frame. Only re-arms itself while something is moving.
    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let again = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            g.frame_pending = false;
            let request = g.controller.frame(&mut g.world, time);
            g.flush();
            if request == FrameRequest::Continue {
                g.frame_pending = true;
                true
            } else {
                false
            }
        };

        if again {
            request_animation_frame(game);
        }
    }

    // === Host-facing API ===

    /// A to-do item was completed
    #[wasm_bindgen]
    pub fn complete_task() {
        with_game(|game| {
            let mut g = game.borrow_mut();
            let multiplier = g.wallet.spawn_multiplier();
            g.world.complete_task(multiplier);
            g.flush();
        });
    }

    /// Current camera offset as `[x, y]` (for weather overlays)
    #[wasm_bindgen]
    pub fn camera_offset() -> Vec<f32> {
        with_game(|game| {
            let offset = game.borrow().world.camera_offset();
            vec![offset.x, offset.y]
        })
        .unwrap_or_else(|| vec![0.0, 0.0])
    }

    /// Could a collectible be dropped at (x, y)?
    #[wasm_bindgen]
    pub fn is_position_safe(x: f32, y: f32) -> bool {
        with_game(|game| {
            let pos = glam::Vec2::new(x, y);
            game.borrow().world.is_collectible_position_safe(pos)
        })
        .unwrap_or(false)
    }

    /// Drop a collectible at (x, y); false if the spot is unsafe
    #[wasm_bindgen]
    pub fn place_collectible(x: f32, y: f32) -> bool {
        with_game(|game| {
            let mut g = game.borrow_mut();
            let placed = g.world.add_collectible(glam::Vec2::new(x, y)).is_some();
            g.flush();
            placed
        })
        .unwrap_or(false)
    }

    /// Player, camera and collectibles as JSON
    #[wasm_bindgen]
    pub fn snapshot() -> String {
        with_game(|game| serde_json::to_string(&game.borrow().world.snapshot()))
            .and_then(Result::ok)
            .unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn set_outfit(key: &str) {
        with_game(|game| {
            let mut g = game.borrow_mut();
            g.outfit = key.to_string();
            g.render_outfit();
        });
    }

    /// Buy (or re-equip) an outfit. False if it isn't for sale or the
    /// wallet is short.
    #[wasm_bindgen]
    pub fn buy_outfit(key: &str) -> bool {
        with_game(|game| {
            let mut g = game.borrow_mut();
            if !g.owned_outfits.iter().any(|k| k == key) {
                let Some(price) = costume::price(key) else {
                    return false;
                };
                if !g.wallet.spend(price) {
                    log::info!("Can't afford {} ({} coins)", key, price);
                    return false;
                }
                g.owned_outfits.push(key.to_string());
                g.render_balance();
            }
            g.outfit = key.to_string();
            g.render_outfit();
            true
        })
        .unwrap_or(false)
    }

    /// Another pumpkin seed planted: doubles future task spawns
    #[wasm_bindgen]
    pub fn add_pumpkin_seed() {
        with_game(|game| {
            let mut g = game.borrow_mut();
            g.wallet.add_pumpkin_seed();
            log::info!("Spawn multiplier now {}", g.wallet.spawn_multiplier());
        });
    }

    #[wasm_bindgen]
    pub fn balance() -> f64 {
        with_game(|game| game.borrow().wallet.balance() as f64).unwrap_or(0.0)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pumpkin Patch (native) starting...");
    log::info!("Native mode runs a headless session - run with `trunk serve` for the web version");

    demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Walk around, finish a task, go collect the pumpkins
#[cfg(not(target_arch = "wasm32"))]
fn demo_session() {
    use pumpkin_patch::Tuning;
    use pumpkin_patch::ledger::{CurrencyLedger, Wallet, settle_pickups};
    use pumpkin_patch::sim::{Direction, FrameRequest, InputEvent, MovementController, World};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut world = World::new(Tuning::load(), 2024);
    let mut controller = MovementController::new();
    let mut wallet = Wallet::new();
    let start = world.player_position();

    // Hold right for two seconds
    controller.handle(InputEvent::KeyDown(Direction::Right), &mut world);
    let mut now = 0.0;
    for _ in 0..120 {
        controller.frame(&mut world, now);
        now += FRAME_MS;
    }
    controller.handle(InputEvent::KeyUp(Direction::Right), &mut world);
    let stopped = controller.frame(&mut world, now) == FrameRequest::Stop;
    let pos = world.player_position();
    println!(
        "Walked from ({:.1}, {:.1}) to ({:.1}, {:.1}), loop stopped: {}",
        start.x, start.y, pos.x, pos.y, stopped
    );

    let ids = world.complete_task(wallet.spawn_multiplier());
    println!("Task completed, {} pumpkin(s) spawned", ids.len());

    // Greedy walk toward each pumpkin using tap nudges
    for id in ids {
        for _ in 0..400 {
            let target = world.collectibles().iter().find(|c| c.id == id);
            let Some(target) = target.map(|c| c.position()) else {
                break;
            };
            let d = target - world.player_position();
            let (primary, secondary) = if d.x.abs() > d.y.abs() {
                (
                    if d.x > 0.0 { Direction::Right } else { Direction::Left },
                    if d.y > 0.0 { Direction::Down } else { Direction::Up },
                )
            } else {
                (
                    if d.y > 0.0 { Direction::Down } else { Direction::Up },
                    if d.x > 0.0 { Direction::Right } else { Direction::Left },
                )
            };
            if !world.nudge(primary).moved() && !world.nudge(secondary).moved() {
                println!("Pumpkin {} is out of reach", id);
                break;
            }
        }
    }

    let earned = settle_pickups(&world.drain_events(), &mut wallet);
    println!("Earned {} coins, balance {}", earned, wallet.balance());
}
