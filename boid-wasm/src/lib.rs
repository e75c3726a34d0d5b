use boid_core::config::clamp_weight;
use boid_core::{Arena, Boid, Rgb, SimConfig, Simulation, Vector2D, Weights};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

const BOID_SIZE: f32 = 8.0;
const FOOD_RADIUS: f64 = 3.0;
const BACKGROUND: &str = "rgb(0, 0, 20)";
// 30/255 opacity, so old frames fade out over a few dozen frames
const TRAIL: &str = "rgba(0, 0, 30, 0.118)";
const FOOD_COLOR: &str = "#ffffff";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

fn css_color(color: Rgb) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

/// Sets the weight behind a named slider. Returns false for an unknown name.
fn set_named_weight(weights: &mut Weights, name: &str, value: f32) -> bool {
    let slot = match name {
        "alignment" => &mut weights.alignment,
        "cohesion" => &mut weights.cohesion,
        "separation" => &mut weights.separation,
        "attraction" => &mut weights.attraction,
        "boundary_avoidance" => &mut weights.boundary_avoidance,
        "current" => &mut weights.current,
        "memory" => &mut weights.memory,
        _ => return false,
    };
    *slot = clamp_weight(value);
    true
}

/// Canvas renderer and control panel around the flocking simulation.
///
/// The weights live here, on the panel side, and are handed to the core
/// every frame.
#[wasm_bindgen]
pub struct BoidSimulation {
    sim: Simulation,
    weights: Weights,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

#[wasm_bindgen]
impl BoidSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: f64,
        height: f64,
        boid_count: usize,
    ) -> Result<BoidSimulation, JsValue> {
        console_log!("Initializing boid simulation with {} boids", boid_count);

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let config = SimConfig {
            boid_count,
            arena: Arena::new(width as f32, height as f32),
            ..SimConfig::default()
        };
        let sim = Simulation::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        context.set_fill_style_str(BACKGROUND);
        context.fill_rect(0.0, 0.0, width, height);

        Ok(BoidSimulation {
            sim,
            weights: Weights::default(),
            canvas,
            context,
        })
    }

    pub fn update(&mut self) {
        let report = self.sim.step(&self.weights);
        if !report.consumed.is_empty() {
            console_log!(
                "Frame {}: {} food eaten, {} left",
                report.frame,
                report.consumed.len(),
                self.sim.food().len()
            );
        }
    }

    pub fn render(&self) -> Result<(), JsValue> {
        let arena = self.sim.arena();

        // Translucent wash instead of a full clear leaves fading trails
        self.context.set_fill_style_str(TRAIL);
        self.context
            .fill_rect(0.0, 0.0, arena.width as f64, arena.height as f64);

        for boid in self.sim.boids() {
            self.draw_boid(boid);
        }

        self.context.set_fill_style_str(FOOD_COLOR);
        for food in self.sim.food().points() {
            self.context.begin_path();
            self.context.arc(
                food.x as f64,
                food.y as f64,
                FOOD_RADIUS,
                0.0,
                std::f64::consts::TAU,
            )?;
            self.context.fill();
        }

        Ok(())
    }

    fn draw_boid(&self, boid: &Boid) {
        let [nose, left, right] = boid.triangle(BOID_SIZE);

        self.context.begin_path();
        self.context.move_to(nose.x as f64, nose.y as f64);
        self.context.line_to(left.x as f64, left.y as f64);
        self.context.line_to(right.x as f64, right.y as f64);
        self.context.close_path();

        self.context.set_fill_style_str(&css_color(boid.color()));
        self.context.fill();
    }

    /// Drops food at an arena point. Points outside the arena are ignored.
    pub fn add_food_at(&mut self, x: f64, y: f64) -> bool {
        let (x, y) = (x as f32, y as f32);
        if !self.sim.arena().contains(x, y) {
            return false;
        }
        self.sim.place_food(Vector2D::new(x, y));
        true
    }

    pub fn handle_mouse_click(&mut self, event: MouseEvent) {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        let x = event.client_x() as f64 - rect.left();
        let y = event.client_y() as f64 - rect.top();
        if self.add_food_at(x, y) {
            console_log!(
                "Added food at ({}, {}). Total food: {}",
                x,
                y,
                self.sim.food().len()
            );
        }
    }

    /// Generic slider binding, `name` is one of the seven weight names
    pub fn set_weight(&mut self, name: &str, value: f64) -> Result<(), JsValue> {
        if set_named_weight(&mut self.weights, name, value as f32) {
            Ok(())
        } else {
            Err(JsValue::from_str(&format!("unknown weight '{}'", name)))
        }
    }

    pub fn set_alignment_weight(&mut self, weight: f64) {
        self.weights.alignment = clamp_weight(weight as f32);
    }

    pub fn set_cohesion_weight(&mut self, weight: f64) {
        self.weights.cohesion = clamp_weight(weight as f32);
    }

    pub fn set_separation_weight(&mut self, weight: f64) {
        self.weights.separation = clamp_weight(weight as f32);
    }

    pub fn set_attraction_weight(&mut self, weight: f64) {
        self.weights.attraction = clamp_weight(weight as f32);
    }

    pub fn set_boundary_avoidance_weight(&mut self, weight: f64) {
        self.weights.boundary_avoidance = clamp_weight(weight as f32);
    }

    pub fn set_current_weight(&mut self, weight: f64) {
        self.weights.current = clamp_weight(weight as f32);
    }

    pub fn set_memory_weight(&mut self, weight: f64) {
        self.weights.memory = clamp_weight(weight as f32);
    }

    pub fn boid_count(&self) -> usize {
        self.sim.boids().len()
    }

    pub fn food_count(&self) -> usize {
        self.sim.food().len()
    }

    pub fn frame(&self) -> u64 {
        self.sim.frame()
    }
}
