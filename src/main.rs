//! Wind Tunnel entry point
//!
//! On wasm32 this is the browser viewer: a canvas painted from the solver's
//! exported fields once per animation frame, with DOM controls for geometry,
//! viscosity, inlet speed, and the displayed field. On native targets it is
//! a headless demo run used as a smoke test.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod viewer {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::Clamped;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement,
        ImageData,
    };

    use wind_tunnel::colormap;
    use wind_tunnel::consts::*;
    use wind_tunnel::settings::{DisplayField, ViewerSettings};
    use wind_tunnel::sim::{Geometry, Solver};

    /// Viewer instance holding all state
    struct App {
        solver: Solver,
        settings: ViewerSettings,
        context: CanvasRenderingContext2d,
        /// RGBA scratch for one frame, width * height * 4
        pixels: Vec<u8>,
        /// Milliseconds spent inside the solver last frame
        sim_ms: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn new(context: CanvasRenderingContext2d) -> Self {
            let settings = ViewerSettings::load();
            let mut solver = Solver::new(GRID_WIDTH, GRID_HEIGHT);
            solver.set_geometry(settings.geometry);
            solver.set_running(true);
            let pixels = vec![0; GRID_WIDTH * GRID_HEIGHT * 4];
            Self {
                solver,
                settings,
                context,
                pixels,
                sim_ms: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run the solver for one frame's worth of steps
        fn update(&mut self, time: f64) {
            if self.solver.is_running() {
                let start = js_sys::Date::now();
                for _ in 0..self.settings.steps_per_frame {
                    self.solver.step();
                }
                self.sim_ms = js_sys::Date::now() - start;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Paint the selected field into the canvas
        fn render(&mut self) {
            let normalized = match self.settings.field {
                DisplayField::Speed => colormap::normalize(&self.solver.velocity_magnitude()),
                DisplayField::Vorticity => {
                    colormap::normalize_symmetric(&self.solver.vorticity())
                }
                DisplayField::Pressure => colormap::normalize(&self.solver.pressure()),
            };
            let signed = self.settings.field.is_signed();
            let obstacle = self.solver.obstacle();

            for (cell, &t) in normalized.iter().enumerate() {
                let rgb = if obstacle[cell] {
                    [40, 40, 40]
                } else if signed {
                    colormap::diverging(t)
                } else {
                    colormap::sci(t)
                };
                let base = cell * 4;
                self.pixels[base] = rgb[0];
                self.pixels[base + 1] = rgb[1];
                self.pixels[base + 2] = rgb[2];
                self.pixels[base + 3] = 255;
            }

            match ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&self.pixels),
                GRID_WIDTH as u32,
                GRID_HEIGHT as u32,
            ) {
                Ok(image) => {
                    if let Err(e) = self.context.put_image_data(&image, 0.0, 0.0) {
                        log::warn!("put_image_data failed: {e:?}");
                    }
                }
                Err(e) => log::warn!("ImageData creation failed: {e:?}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-fps") {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            if let Some(el) = document.get_element_by_id("hud-inlet") {
                el.set_text_content(Some(&format!("{:.4}", self.solver.inlet_velocity())));
            }
            if let Some(el) = document.get_element_by_id("hud-sim") {
                el.set_text_content(Some(&format!("{:.1} ms", self.sim_ms)));
            }
            if let Some(el) = document.get_element_by_id("hud-status") {
                let status = if self.solver.has_diverged() {
                    "diverged - reset"
                } else if self.solver.is_running() {
                    "running"
                } else {
                    "paused"
                };
                el.set_text_content(Some(status));
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Wind Tunnel starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(GRID_WIDTH as u32);
        canvas.set_height(GRID_HEIGHT as u32);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let app = Rc::new(RefCell::new(App::new(context)));
        log::info!(
            "Solver initialized: {}x{} lattice, geometry '{}'",
            GRID_WIDTH,
            GRID_HEIGHT,
            app.borrow().settings.geometry.as_str()
        );

        sync_controls(&app);
        setup_controls(app.clone());
        request_animation_frame(app);

        log::info!("Wind Tunnel running!");
    }

    /// Push loaded settings into the DOM controls so they agree on startup
    fn sync_controls(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let app = app.borrow();

        if let Some(select) = document
            .get_element_by_id("geometry")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(app.settings.geometry.as_str());
        }
        if let Some(select) = document
            .get_element_by_id("field")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(app.settings.field.as_str());
        }
        if let Some(input) = document
            .get_element_by_id("viscosity")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&app.solver.viscosity().to_string());
        }
        if let Some(input) = document
            .get_element_by_id("velocity")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&app.solver.target_velocity().to_string());
        }
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::warn!("no document, controls disabled");
            return;
        };

        // Geometry selector - triggers a solver reset
        if let Some(select) = document
            .get_element_by_id("geometry")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let app = app.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let geometry = Geometry::from_name(&select_clone.value());
                let mut a = app.borrow_mut();
                a.solver.set_geometry(geometry);
                a.settings.geometry = geometry;
                a.settings.save();
                log::info!("Geometry set to '{}'", geometry.as_str());
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Displayed-field selector
        if let Some(select) = document
            .get_element_by_id("field")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            let app = app.clone();
            let select_clone = select.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(field) = DisplayField::from_str(&select_clone.value()) {
                    let mut a = app.borrow_mut();
                    a.settings.field = field;
                    a.settings.save();
                }
            });
            let _ =
                select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Viscosity slider
        if let Some(input) = document
            .get_element_by_id("viscosity")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Ok(nu) = input_clone.value().parse::<f64>() {
                    if nu > 0.0 {
                        app.borrow_mut().solver.set_viscosity(nu);
                    }
                }
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Inlet speed slider
        if let Some(input) = document
            .get_element_by_id("velocity")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Ok(u0) = input_clone.value().parse::<f64>() {
                    app.borrow_mut().solver.set_velocity(u0.min(MAX_INLET_VELOCITY));
                }
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause / resume button. The running flag is advisory: the solver
        // never checks it, this frame loop does.
        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let running = !a.solver.is_running();
                a.solver.set_running(running);
                log::info!("{}", if running { "Resumed" } else { "Paused" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reset button
        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().solver.reset();
                log::info!("Simulation reset");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    viewer::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use wind_tunnel::consts::*;
    use wind_tunnel::sim::{Geometry, Solver};

    env_logger::init();
    log::info!("Wind Tunnel (native headless demo)");

    let mut solver = Solver::new(GRID_WIDTH, GRID_HEIGHT);
    solver.set_geometry(Geometry::Circle);
    log::info!(
        "{}x{} lattice, viscosity {}, target inlet {}",
        solver.width(),
        solver.height(),
        solver.viscosity(),
        solver.target_velocity()
    );

    let total_steps = 1000;
    for step in 1..=total_steps {
        solver.step();
        if step % 100 == 0 {
            let speed = solver.velocity_magnitude();
            let peak = speed.iter().copied().fold(0.0f64, f64::max);
            let cells = speed.len() as f64;
            let mean_rho: f64 = solver.grid().rho.iter().sum::<f64>() / cells;
            log::info!(
                "step {step:4}: inlet {:.4}, peak speed {:.4}, mean density {:.6}",
                solver.inlet_velocity(),
                peak,
                mean_rho
            );
        }
    }

    if solver.has_diverged() {
        log::error!("Simulation diverged during the demo run");
        std::process::exit(1);
    }
    log::info!("Completed {total_steps} steps");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
