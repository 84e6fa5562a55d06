//! Plinko entry point
//!
//! On the web this mounts the game on the page's canvas and wires the DOM
//! controls. Natively it runs a headless seeded drop and prints where the
//! balls landed.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, Window};

    use plinko::game_loop::{GameLoop, Scheduler, TaskId, whole_ms};
    use plinko::renderer::Canvas2d;
    use plinko::settings::{QualityPreset, Toggle};
    use plinko::sim::GameState;
    use plinko::{BalanceTier, DropSize, Embed, Settings, Tuning, WagerError};

    type Game = GameLoop<WebScheduler>;
    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
    type TimerCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

    enum Task {
        Frame(i32),
        Interval(i32),
    }

    /// `requestAnimationFrame` / `setInterval` backed scheduler
    ///
    /// The callbacks are installed after the game exists, since they need a
    /// handle back to it.
    struct WebScheduler {
        window: Window,
        on_frame: FrameCallback,
        on_timer: TimerCallback,
        next_id: u32,
        tasks: HashMap<TaskId, Task>,
    }

    impl WebScheduler {
        fn new(window: Window) -> Self {
            Self {
                window,
                on_frame: Rc::new(RefCell::new(None)),
                on_timer: Rc::new(RefCell::new(None)),
                next_id: 0,
                tasks: HashMap::new(),
            }
        }

        fn allocate(&mut self) -> TaskId {
            self.next_id += 1;
            TaskId(self.next_id)
        }
    }

    impl Scheduler for WebScheduler {
        fn request_frame(&mut self) -> TaskId {
            let id = self.allocate();
            // At most one frame is pending; earlier ones have already fired
            self.tasks.retain(|_, task| !matches!(task, Task::Frame(_)));
            if let Some(callback) = self.on_frame.borrow().as_ref() {
                match self
                    .window
                    .request_animation_frame(callback.as_ref().unchecked_ref())
                {
                    Ok(handle) => {
                        self.tasks.insert(id, Task::Frame(handle));
                    }
                    Err(e) => log::error!("requestAnimationFrame failed: {e:?}"),
                }
            }
            id
        }

        fn set_interval(&mut self, period_ms: f64) -> TaskId {
            let id = self.allocate();
            if let Some(callback) = self.on_timer.borrow().as_ref() {
                match self.window.set_interval_with_callback_and_timeout_and_arguments_0(
                    callback.as_ref().unchecked_ref(),
                    whole_ms(period_ms),
                ) {
                    Ok(handle) => {
                        self.tasks.insert(id, Task::Interval(handle));
                    }
                    Err(e) => log::error!("setInterval failed: {e:?}"),
                }
            }
            id
        }

        fn cancel(&mut self, task: TaskId) {
            match self.tasks.remove(&task) {
                Some(Task::Frame(handle)) => {
                    let _ = self.window.cancel_animation_frame(handle);
                }
                Some(Task::Interval(handle)) => self.window.clear_interval_with_handle(handle),
                None => {}
            }
        }
    }

    fn missing(what: &str) -> JsValue {
        JsValue::from_str(&format!("missing {what}"))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger already set: {e}").into());
        }

        log::info!("Plinko starting...");

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("plinko")
            .ok_or_else(|| missing("canvas#plinko"))?
            .dyn_into()?;

        let embed_name = canvas
            .get_attribute("data-embed")
            .unwrap_or_else(|| Embed::default().name().to_string());
        let Some(embed) = Embed::from_name(&embed_name) else {
            log::warn!("Unknown embed '{embed_name}', nothing mounted");
            return Ok(());
        };

        let overrides = canvas.get_attribute("data-tuning");
        let tuning = embed.tuning(overrides.as_deref()).unwrap_or_else(|e| {
            log::warn!("Ignoring data-tuning: {e}");
            Tuning::default()
        });

        canvas.set_width(tuning.board_width as u32);
        canvas.set_height(tuning.board_height as u32);
        let mut surface = Canvas2d::new(&canvas).map_err(|e| JsValue::from_str(&e))?;

        let seed = js_sys::Date::now() as u64;
        let scheduler = WebScheduler::new(window.clone());
        let on_frame = scheduler.on_frame.clone();
        let on_timer = scheduler.on_timer.clone();
        let game = Rc::new(RefCell::new(GameLoop::new(
            GameState::with_tuning(tuning, seed),
            Settings::load(),
            scheduler,
        )));
        log::info!("Game initialized with seed: {seed}");

        // Frame chain
        {
            let weak = Rc::downgrade(&game);
            let document = document.clone();
            *on_frame.borrow_mut() = Some(Closure::new(move |now: f64| {
                let Some(game) = weak.upgrade() else {
                    return;
                };
                game.borrow_mut().on_frame(now, &mut surface);
                update_bank(&document, &game.borrow());
            }));
        }

        // Balance readout timer
        {
            let weak = Rc::downgrade(&game);
            let document = document.clone();
            *on_timer.borrow_mut() = Some(Closure::new(move || {
                let Some(game) = weak.upgrade() else {
                    return;
                };
                game.borrow_mut().on_balance_timer();
                update_bank(&document, &game.borrow());
            }));
        }

        setup_controls(&window, &document, &game)?;
        setup_options(&document, &game)?;
        setup_teardown(&window, Rc::downgrade(&game))?;

        write_bet(&document, game.borrow().state.bank.bet());
        update_bank(&document, &game.borrow());
        game.borrow_mut().start();

        log::info!("Plinko running!");
        Ok(())
    }

    fn bet_input(document: &Document) -> Option<HtmlInputElement> {
        document
            .get_element_by_id("bet-amount")
            .and_then(|el| el.dyn_into().ok())
    }

    /// Apply whatever is in the bet box, then read back the clamped value
    fn sync_bet(document: &Document, game: &mut Game) {
        if let Some(input) = bet_input(document) {
            match input.value().trim().parse::<f64>() {
                Ok(amount) => game.set_bet(amount),
                Err(_) => log::warn!("Ignoring bet '{}'", input.value()),
            }
        }
        write_bet(document, game.state.bank.bet());
    }

    fn write_bet(document: &Document, bet: f64) {
        if let Some(input) = bet_input(document) {
            input.set_value(&format!("{bet:.2}"));
        }
    }

    fn update_bank(document: &Document, game: &Game) {
        if let Some(el) = document.get_element_by_id("bank") {
            let shown = game.state.bank.displayed();
            el.set_text_content(Some(&format!("${shown:.2}")));
            el.set_class_name(BalanceTier::of(shown).class());
        }
    }

    fn report(window: &Window, err: &WagerError) {
        log::warn!("{err}");
        let _ = window.alert_with_message(&err.to_string());
    }

    fn on_click(
        document: &Document,
        id: &str,
        mut handler: impl FnMut() + 'static,
    ) -> Result<(), JsValue> {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("Control #{id} not found");
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
        el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_controls(
        window: &Window,
        document: &Document,
        game: &Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        for size in DropSize::ALL {
            let id = size.element_id();
            if let Some(button) = document.get_element_by_id(id) {
                button.set_text_content(Some(size.label()));
            }
            let game = game.clone();
            let window = window.clone();
            let doc = document.clone();
            on_click(document, id, move || {
                let dropped = {
                    let mut g = game.borrow_mut();
                    sync_bet(&doc, &mut g);
                    let dropped = g.drop_balls(size);
                    update_bank(&doc, &g);
                    dropped
                };
                if let Err(e) = dropped {
                    report(&window, &e);
                }
            })?;
        }

        {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, "all-in", move || {
                let mut g = game.borrow_mut();
                g.set_all_in();
                write_bet(&doc, g.state.bank.bet());
            })?;
        }

        {
            let game = game.clone();
            let doc = document.clone();
            on_click(document, "reset", move || {
                let mut g = game.borrow_mut();
                g.reset();
                write_bet(&doc, g.state.bank.bet());
                update_bank(&doc, &g);
            })?;
        }

        if let Some(input) = bet_input(document) {
            let game = game.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                sync_bet(&doc, &mut game.borrow_mut());
            });
            input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Quality selector and display checkboxes; every change is stored
    fn setup_options(document: &Document, game: &Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let settings = game.borrow().settings.clone();

        let select = document
            .get_element_by_id("quality")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());
        if let Some(select) = select {
            select.set_value(settings.quality.key());
            let game = game.clone();
            let doc = document.clone();
            let target = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(quality) = QualityPreset::from_key(&target.value()) else {
                    log::warn!("Unknown quality '{}'", target.value());
                    return;
                };
                let mut g = game.borrow_mut();
                g.settings.set_quality(quality);
                g.settings.save();
                sync_checkboxes(&doc, &g.settings);
            });
            select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for toggle in Toggle::ALL {
            let Some(checkbox) = checkbox(document, toggle) else {
                continue;
            };
            let game = game.clone();
            let target = checkbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.settings.set_toggle(toggle, target.checked());
                g.settings.save();
            });
            checkbox.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        sync_checkboxes(document, &settings);

        Ok(())
    }

    fn checkbox(document: &Document, toggle: Toggle) -> Option<HtmlInputElement> {
        document
            .get_element_by_id(toggle.element_id())
            .and_then(|el| el.dyn_into().ok())
    }

    fn sync_checkboxes(document: &Document, settings: &Settings) {
        for toggle in Toggle::ALL {
            if let Some(checkbox) = checkbox(document, toggle) {
                checkbox.set_checked(settings.toggle(toggle));
            }
        }
    }

    /// Stop the frame chain and balance timer when the page goes away
    fn setup_teardown(window: &Window, game: Weak<RefCell<Game>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(game) = game.upgrade() {
                game.borrow_mut().stop();
            }
        });
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = web::run() {
        log::error!("Failed to start: {e:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use plinko::game_loop::{GameLoop, ManualScheduler};
    use plinko::renderer::{DisplayList, pass::percent_label};
    use plinko::sim::GameState;
    use plinko::{Settings, Tuning};

    const DEFAULT_BALLS: usize = 1000;
    const DEFAULT_SEED: u64 = 42;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 100_000;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Plinko (native) starting...");

    let mut args = std::env::args().skip(1);
    let balls = match args.next().map(|a| a.parse::<usize>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            log::warn!("Bad ball count ({e}), using {DEFAULT_BALLS}");
            DEFAULT_BALLS
        }
        None => DEFAULT_BALLS,
    };
    let seed = match args.next().map(|a| a.parse::<u64>()) {
        Some(Ok(s)) => s,
        Some(Err(e)) => {
            log::warn!("Bad seed ({e}), using {DEFAULT_SEED}");
            DEFAULT_SEED
        }
        None => DEFAULT_SEED,
    };

    let mut tuning = match args.next() {
        Some(path) => {
            let loaded = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
            match loaded {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("Cannot use tuning from {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => Tuning::default(),
    };
    // One unit per ball, and never less than the configured stake
    tuning.initial_stake = tuning.initial_stake.max(balls as f64);

    let state = GameState::with_tuning(tuning, seed);
    let mut game = GameLoop::new(state, Settings::default(), ManualScheduler::new());
    let mut canvas = DisplayList::new();

    game.start();
    if let Err(e) = game.place_bet(1.0, balls) {
        log::error!("{e}");
        std::process::exit(1);
    }

    let mut frames = 0;
    while !game.state.balls.is_empty() && frames < MAX_FRAMES {
        if game.balance_timer_armed() {
            game.on_balance_timer();
        }
        if game.scheduler_mut().take_frame().is_none() {
            break;
        }
        canvas.clear();
        game.on_frame(frames as f64 * FRAME_MS, &mut canvas);
        frames += 1;
    }
    while game.balance_timer_armed() {
        game.on_balance_timer();
    }
    game.stop();

    log::info!("Settled {balls} balls in {frames} frames (seed {seed})");

    let total = game.state.total_settled();
    println!("{:>6} {:>8} {:>7}", "mult", "count", "share");
    for bucket in &game.state.buckets {
        println!(
            "{:>6} {:>8} {:>7}",
            format!("{}x", bucket.multiplier),
            bucket.count,
            percent_label(bucket.count, total)
        );
    }
    println!(
        "bank ${:.2} (started ${:.2})",
        game.state.bank.balance(),
        game.state.bank.initial_stake()
    );
    log::debug!("Last frame drew {} commands", canvas.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
