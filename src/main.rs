//! Cinematica entry point
//!
//! On the web this mounts the simulator onto `#canvas` and wires the HUD
//! controls. Natively it plays a scenario headlessly and prints where every
//! body ends up.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, PointerEvent, WheelEvent};

    use cinematica::error::InputError;
    use cinematica::input::{
        parse_color, parse_decimal, parse_in_range, parse_integer, parse_vec2,
    };
    use cinematica::persistence::{MovilSpec, code_from_query, decode, share_url};
    use cinematica::platform::web::{CanvasSurface, EventListener, local_position};
    use cinematica::renderer::{FrameObserver, render_frame};
    use cinematica::sim::{AbsolutePlane, Intent, MovilEdit, Session, Vec2};
    use cinematica::{Settings, consts::*};

    /// Mirrors simulation state into the HUD
    struct Hud {
        document: Document,
    }

    impl Hud {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }
    }

    impl FrameObserver for Hud {
        fn on_time(&mut self, time_count: f64) {
            self.set_text("#hud-time .hud-value", &format!("{:.2} s", time_count));
        }

        fn on_fps(&mut self, fps: u32) {
            self.set_text("#hud-fps .hud-value", &fps.to_string());
        }

        fn on_plane(&mut self, plane: &AbsolutePlane) {
            self.set_text("#hud-scale .hud-value", &format!("{:.1} px/u", plane.scale()));
        }
    }

    /// Simulator instance holding all state
    struct App {
        session: Session<Vec2>,
        surface: CanvasSurface,
        hud: Hud,
        settings: Settings,
        /// Pending requestAnimationFrame handle
        raf: Option<i32>,
        /// Pointer, wheel and resize listeners; empty while unmounted
        listeners: Vec<EventListener>,
    }

    fn window() -> web_sys::Window {
        web_sys::window().expect("no window")
    }

    fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn input_value(document: &Document, id: &str) -> String {
        input(document, id).map(|el| el.value()).unwrap_or_default()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Show a user-facing message under the controls (`None` clears it)
    fn show_error(document: &Document, message: Option<&str>) {
        if let Some(el) = document.get_element_by_id("input-error") {
            el.set_text_content(message);
        }
        set_hidden(document, "input-error", message.is_none());
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cinematica starting...");

        let window = window();
        let document = window.document().expect("no document");

        set_hidden(&document, "loading", true);

        let surface = match CanvasSurface::from_element_id(&document, "canvas") {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("{}", e);
                set_hidden(&document, "simulator-unavailable", false);
                return;
            }
        };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let mut session = Session::with_settings(&settings, seed);

        let search = window.location().search().unwrap_or_default();
        match code_from_query(&search).map(decode::<Vec2>) {
            Some(Ok(scenario)) => {
                let _ = session.dispatch(Intent::LoadScenario(scenario));
            }
            Some(Err(e)) => {
                log::warn!("Ignoring shared scenario: {}", e);
                show_error(&document, Some("The shared simulation link is invalid."));
                let _ = session.dispatch(Intent::LoadScenario(Default::default()));
            }
            None => {
                let _ = session.dispatch(Intent::LoadScenario(
                    cinematica::persistence::Scenario::demo(),
                ));
            }
        }

        sync_controls(&document, &session, &settings);
        set_hidden(&document, "hud-fps", !settings.show_fps);

        let app = Rc::new(RefCell::new(App {
            session,
            surface,
            hud: Hud {
                document: document.clone(),
            },
            settings,
            raf: None,
            listeners: Vec::new(),
        }));

        log::info!("Session initialized with seed: {}", seed);

        setup_playback_controls(app.clone(), &document);
        setup_display_controls(app.clone(), &document);
        setup_body_editor(app.clone(), &document);
        setup_share_button(app.clone(), &document);
        setup_auto_pause(app.clone(), &document);

        set_hidden(&document, "hud", false);
        mount(&app);

        log::info!("Cinematica running!");
    }

    /// Put the loaded options into the form controls
    fn sync_controls(document: &Document, session: &Session<Vec2>, settings: &Settings) {
        let controls = session.controls();
        if let Some(el) = input(document, "speed-input") {
            el.set_value(&controls.speed.to_string());
        }
        if let Some(el) = input(document, "prediction-toggle") {
            el.set_checked(controls.movement_prediction);
        }
        if let Some(el) = input(document, "vectors-toggle") {
            el.set_checked(session.display().show_vectors);
        }
        if let Some(el) = input(document, "grid-toggle") {
            el.set_checked(settings.show_grid);
        }
        update_play_button(document, controls.playing);
    }

    fn update_play_button(document: &Document, playing: bool) {
        if let Some(el) = document.get_element_by_id("play-btn") {
            el.set_text_content(Some(if playing { "Pause" } else { "Play" }));
        }
    }

    /// Dispatch an intent and keep the frame loop in step with the result
    fn apply(app: &Rc<RefCell<App>>, intent: Intent<Vec2>) {
        let pausing = matches!(intent, Intent::Pause);
        let (result, playing, needs_redraw) = {
            let mut a = app.borrow_mut();
            let result = a.session.dispatch(intent);
            (result, a.session.is_playing(), a.session.needs_redraw())
        };
        let document = app.borrow().hud.document.clone();
        match result {
            Ok(()) => show_error(&document, None),
            Err(e) => {
                log::warn!("{}", e);
                show_error(&document, Some(&e.to_string()));
            }
        }
        update_play_button(&document, playing);

        if pausing || !playing {
            cancel(app);
        }
        if playing || needs_redraw {
            schedule(app);
        }
    }

    /// Report a field that failed validation; no intent is built
    fn reject(app: &Rc<RefCell<App>>, error: InputError) {
        log::debug!("Rejected input: {}", error);
        show_error(&app.borrow().hud.document, Some(&error.to_string()));
    }

    fn schedule(app: &Rc<RefCell<App>>) {
        if app.borrow().raf.is_some() {
            return;
        }
        let next = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame(next, time);
        });
        match window().request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => app.borrow_mut().raf = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn cancel(app: &Rc<RefCell<App>>) {
        if let Some(handle) = app.borrow_mut().raf.take() {
            let _ = window().cancel_animation_frame(handle);
        }
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        let playing = {
            let mut a = app.borrow_mut();
            a.raf = None;
            let measured = a.surface.measure(&window());
            let App {
                session,
                surface,
                hud,
                ..
            } = &mut *a;
            let report = render_frame(session, surface, measured, time, hud);
            if report.failed_updates > 0 {
                log::debug!("{} bodies held their state this frame", report.failed_updates);
            }
            session.is_playing()
        };

        if playing {
            schedule(&app);
        }
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| handler());
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_change(document: &Document, id: &str, mut handler: impl FnMut(HtmlInputElement) + 'static) {
        if let Some(el) = input(document, id) {
            let target = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                handler(target.clone())
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Canvas and window listeners owned by the mounted simulator
    fn attach_surface_listeners(app: &Rc<RefCell<App>>) -> Vec<EventListener> {
        let canvas = app.borrow().surface.canvas().clone();
        let canvas_target: web_sys::EventTarget = canvas.clone().into();
        let window_target: web_sys::EventTarget = window().into();
        let mut listeners = Vec::new();
        let mut listen = |target: &web_sys::EventTarget,
                          event: &'static str,
                          handler: Box<dyn FnMut(web_sys::Event)>| {
            match EventListener::new(target, event, handler) {
                Ok(listener) => listeners.push(listener),
                Err(e) => log::warn!("Could not listen for {}: {:?}", event, e),
            }
        };

        for (event_name, down) in [("pointerdown", true), ("pointermove", false)] {
            let app = app.clone();
            let target = canvas.clone();
            listen(
                &canvas_target,
                event_name,
                Box::new(move |event| {
                    let event: PointerEvent = event.unchecked_into();
                    let at = local_position(&target, event.client_x(), event.client_y());
                    if down {
                        apply(&app, Intent::PointerDown(at));
                    } else if app.borrow().session.is_dragging() {
                        apply(&app, Intent::PointerMove(at));
                    }
                }),
            );
        }

        for event_name in ["pointerup", "pointerleave", "pointercancel"] {
            let app = app.clone();
            listen(
                &canvas_target,
                event_name,
                Box::new(move |_event| apply(&app, Intent::PointerUp)),
            );
        }

        // Wheel zoom
        {
            let app = app.clone();
            listen(
                &canvas_target,
                "wheel",
                Box::new(move |event| {
                    event.prevent_default();
                    let event: WheelEvent = event.unchecked_into();
                    apply(&app, Intent::Wheel(event.delta_y()));
                }),
            );
        }

        // Window resize: the next frame picks up the new size
        {
            let app = app.clone();
            listen(
                &window_target,
                "resize",
                Box::new(move |_event| {
                    app.borrow_mut().session.request_redraw();
                    schedule(&app);
                }),
            );
        }

        listeners
    }

    fn mount(app: &Rc<RefCell<App>>) {
        if !app.borrow().listeners.is_empty() {
            return;
        }
        let listeners = attach_surface_listeners(app);
        app.borrow_mut().listeners = listeners;
        app.borrow_mut().session.request_redraw();
        schedule(app);
    }

    /// Stop the frame loop and detach the surface listeners
    fn unmount(app: &Rc<RefCell<App>>) {
        cancel(app);
        if app.borrow().session.is_playing() {
            let _ = app.borrow_mut().session.dispatch(Intent::Pause);
        }
        let listeners = std::mem::take(&mut app.borrow_mut().listeners);
        drop(listeners);
    }

    fn setup_playback_controls(app: Rc<RefCell<App>>, document: &Document) {
        {
            let app = app.clone();
            on_click(document, "play-btn", move || {
                let intent = if app.borrow().session.is_playing() {
                    Intent::Pause
                } else {
                    Intent::Play
                };
                apply(&app, intent);
            });
        }
        {
            let app = app.clone();
            on_click(document, "reset-btn", move || apply(&app, Intent::Reset));
        }
        {
            let app = app.clone();
            on_change(document, "speed-input", move |el| {
                match parse_in_range("Speed", &el.value(), MIN_SPEED, MAX_SPEED) {
                    Ok(speed) => apply(&app, Intent::SetSpeed(speed)),
                    Err(e) => reject(&app, e),
                }
            });
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on_click(document, "jump-btn", move || {
                match parse_decimal("Time", &input_value(&doc, "jump-input")) {
                    Ok(t) => apply(&app, Intent::JumpTo(t)),
                    Err(e) => reject(&app, e),
                }
            });
        }
        {
            let app = app.clone();
            on_change(document, "prediction-toggle", move |el| {
                let on = el.checked();
                app.borrow_mut().settings.movement_prediction = on;
                app.borrow().settings.save();
                apply(&app, Intent::SetMovementPrediction(on));
            });
        }
    }

    fn setup_display_controls(app: Rc<RefCell<App>>, document: &Document) {
        {
            let app = app.clone();
            on_change(document, "vectors-toggle", move |el| {
                let on = el.checked();
                app.borrow_mut().settings.show_vectors = on;
                app.borrow().settings.save();
                apply(&app, Intent::SetShowVectors(on));
            });
        }
        {
            let app = app.clone();
            on_change(document, "grid-toggle", move |el| {
                let on = el.checked();
                app.borrow_mut().settings.show_grid = on;
                app.borrow().settings.save();
                apply(&app, Intent::SetShowGrid(on));
            });
        }
        on_click(document, "reset-view-btn", move || apply(&app, Intent::ResetView));
    }

    /// Selected body id from the editor
    fn read_body_id(document: &Document) -> Result<u32, InputError> {
        let id = parse_integer("Body", &input_value(document, "body-id"))?;
        u32::try_from(id).map_err(|_| InputError::OutOfRange {
            field: "Body".to_string(),
            min: 0.0,
            max: u32::MAX as f64,
        })
    }

    /// Initial conditions typed into the editor
    fn read_body_form(document: &Document) -> Result<MovilSpec<Vec2>, InputError> {
        let field = |id: &str| input_value(document, id);
        Ok(MovilSpec {
            position: parse_vec2("Position", &field("pos-x"), &field("pos-y"))?,
            velocity: parse_vec2("Velocity", &field("vel-x"), &field("vel-y"))?,
            acceleration: parse_vec2("Acceleration", &field("acc-x"), &field("acc-y"))?,
            color: parse_color("Color", &field("body-color"))?,
        })
    }

    fn setup_body_editor(app: Rc<RefCell<App>>, document: &Document) {
        {
            let app = app.clone();
            on_click(document, "add-body-btn", move || apply(&app, Intent::AddMovil));
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on_click(document, "spawn-body-btn", move || match read_body_form(&doc) {
                Ok(spec) => apply(&app, Intent::SpawnMovil(spec)),
                Err(e) => reject(&app, e),
            });
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on_click(document, "apply-body-btn", move || {
                let form = read_body_id(&doc).and_then(|id| Ok((id, read_body_form(&doc)?)));
                match form {
                    Ok((id, spec)) => {
                        for edit in [
                            MovilEdit::Position(spec.position),
                            MovilEdit::Velocity(spec.velocity),
                            MovilEdit::Acceleration(spec.acceleration),
                            MovilEdit::Color(spec.color),
                        ] {
                            apply(&app, Intent::EditMovil { id, edit });
                        }
                    }
                    Err(e) => reject(&app, e),
                }
            });
        }
        {
            let doc = document.clone();
            on_click(document, "remove-body-btn", move || match read_body_id(&doc) {
                Ok(id) => apply(&app, Intent::RemoveMovil(id)),
                Err(e) => reject(&app, e),
            });
        }
    }

    fn setup_share_button(app: Rc<RefCell<App>>, document: &Document) {
        let doc = document.clone();
        on_click(document, "share-btn", move || {
            let href = window().location().href().unwrap_or_default();
            let base = href.split(['?', '#']).next().unwrap_or_default().to_string();
            let scenario = app.borrow().session.scenario();
            match share_url(&base, &scenario) {
                Ok(url) => {
                    if let Some(el) = input(&doc, "share-output") {
                        el.set_value(&url);
                        el.select();
                    }
                    log::info!("Share link ready ({} bodies)", scenario.movils.len());
                }
                Err(e) => {
                    log::warn!("{}", e);
                    show_error(&doc, Some(&e.to_string()));
                }
            }
        });
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>, document: &Document) {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && app.borrow().session.is_playing()
                {
                    apply(&app, Intent::Pause);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page hide unmounts; pageshow (back/forward cache) mounts again.
        // These two live as long as the page.
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                unmount(&app);
                log::info!("Page hidden, simulator unmounted");
            });
            let _ = window().add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                mount(&app);
            });
            let _ = window().add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use cinematica::error::{InputError, ScenarioError, SessionError};
    use cinematica::input::parse_in_range;
    use cinematica::persistence::{Scenario, decode, encode};
    use cinematica::renderer::{FrameObserver, RecordingSurface, render_frame};
    use cinematica::sim::{Intent, Session, Vec2, Viewport};
    use cinematica::Settings;

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEFAULT_SECONDS: &str = "5";

    #[derive(Debug, thiserror::Error)]
    pub enum RunError {
        #[error(transparent)]
        Input(#[from] InputError),
        #[error(transparent)]
        Scenario(#[from] ScenarioError),
        #[error(transparent)]
        Session(#[from] SessionError),
    }

    /// Logs what the HUD would show
    struct LogObserver;

    impl FrameObserver for LogObserver {
        fn on_fps(&mut self, fps: u32) {
            log::debug!("fps {}", fps);
        }
    }

    /// `cinematica [scenario_code|-] [seconds]`
    pub fn run(args: &[String]) -> Result<(), RunError> {
        let settings = Settings::load();
        let scenario = match args.first().map(String::as_str) {
            Some(code) if code != "-" => decode::<Vec2>(code)?,
            _ => Scenario::demo(),
        };
        let seconds = parse_in_range(
            "seconds",
            args.get(1).map(String::as_str).unwrap_or(DEFAULT_SECONDS),
            0.0,
            3600.0,
        )?;

        let mut session = Session::<Vec2>::with_settings(&settings, 0);
        session.dispatch(Intent::LoadScenario(scenario))?;
        session.dispatch(Intent::Play)?;

        let speed = session.controls().speed;
        let frames = (seconds / speed * 60.0).round() as usize;
        let mut surface = RecordingSurface::new();
        let viewport = Viewport::default();
        let mut failed = 0;
        for i in 0..=frames {
            let report = render_frame(
                &mut session,
                &mut surface,
                viewport,
                i as f64 * FRAME_MS,
                &mut LogObserver,
            );
            failed += report.failed_updates;
        }

        let t = session.ticker().time_count();
        log::info!(
            "Played {} frames, t = {:.3}s, {} draw calls in last frame",
            frames,
            t,
            surface.commands.len()
        );
        if failed > 0 {
            log::warn!("{} body updates were rejected", failed);
        }

        println!("t = {:.3} s", t);
        for movil in session.movils() {
            println!(
                "body {} {}: position {} velocity {}",
                movil.id,
                movil.color,
                movil.position(),
                movil.velocity()
            );
        }
        println!("share code: {}", encode(&session.scenario())?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cinematica (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the interactive version");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = native::run(&args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
