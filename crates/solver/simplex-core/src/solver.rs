//! Solver: data ownership and public API.
//!
//! Methods:
//! - new / from_json / parse_json (schema -> built controller graph)
//! - solve (normalize -> TriSpaces -> store values -> accumulate)
//! - clear_values, set_exact_solve, set_enabled, introspection, shape handles
//!
//! Controllers live in one list in solve order: sliders, combos, traversals
//! (dependency order), floaters. A controller only ever reads controllers
//! placed before it.

use crate::accumulate::Accumulator;
use crate::config::SolverConfig;
use crate::controller::{
    Combo, Controller, ControllerKind, ControllerSource, Floater, Slider, SliderTarget,
    StoreContext, Traversal,
};
use crate::error::{ParseError, SolveError};
use crate::ids::{ComboId, ControllerId, FloaterId, ShapeId, SliderId};
use crate::progression::Progression;
use crate::schema::{self, ComboDef, ControlRef, RigDefinition};
use crate::scratch::Scratch;
use crate::shape::{HandleTable, Shape, ShapeHandle};
use crate::trispace::TriSpace;

#[derive(Debug, Default)]
pub struct Simplex {
    // Owned data
    cfg: SolverConfig,
    shapes: Vec<Shape>,
    progressions: Vec<Progression>,
    controllers: Vec<Controller>,
    spaces: Vec<TriSpace>,
    slider_count: usize,

    // Host side
    handles: HandleTable,

    // Per-solve buffers
    scratch: Scratch,

    loaded: bool,
    built: bool,
    parse_error: Option<ParseError>,
}

impl Simplex {
    /// Parse and build from schema text. Failures are recorded on the
    /// returned value; check [`Simplex::has_parse_error`].
    pub fn new(text: &str) -> Self {
        let mut s = Self::default();
        s.parse_json(text);
        s
    }

    /// Same as [`Simplex::new`] but surfaces the parse failure.
    pub fn from_json(text: &str) -> Result<Self, ParseError> {
        let mut s = Self::default();
        s.load(text)?;
        Ok(s)
    }

    /// Replace the current rig with the one in `text`. Returns `false` and
    /// leaves the solver unbuilt when the schema is rejected; the error is
    /// kept in [`Simplex::parse_error`].
    pub fn parse_json(&mut self, text: &str) -> bool {
        match self.load(text) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("rejected rig definition: {err}");
                self.parse_error = Some(err);
                false
            }
        }
    }

    fn load(&mut self, text: &str) -> Result<(), ParseError> {
        self.reset();
        let rig = schema::parse(text)?;
        self.loaded = true;
        self.build(rig);
        Ok(())
    }

    fn reset(&mut self) {
        self.shapes.clear();
        self.progressions.clear();
        self.controllers.clear();
        self.spaces.clear();
        self.slider_count = 0;
        self.handles.clear();
        self.scratch = Scratch::default();
        self.loaded = false;
        self.built = false;
        self.parse_error = None;
    }

    fn build(&mut self, rig: RigDefinition) {
        let RigDefinition {
            shapes,
            progressions,
            sliders,
            combos,
            floaters,
            traversals,
            traversal_order,
            ..
        } = rig;

        self.shapes = shapes
            .into_iter()
            .enumerate()
            .map(|(i, name)| Shape::new(name, ShapeId::from_index(i)))
            .collect();
        self.progressions = progressions;
        self.slider_count = sliders.len();

        let combo_base = sliders.len();
        let traversal_base = combo_base + combos.len();
        // traversal schema index -> position in solve order
        let mut traversal_slot = vec![0usize; traversals.len()];
        for (pos, id) in traversal_order.iter().enumerate() {
            traversal_slot[id.index()] = traversal_base + pos;
        }
        let source = |r: ControlRef, flip: bool| ControllerSource {
            id: ControllerId::from_index(match r {
                ControlRef::Slider(id) => id.index(),
                ControlRef::Combo(id) => combo_base + id.index(),
                ControlRef::Traversal(id) => traversal_slot[id.index()],
            }),
            flip,
        };

        let mut controllers = Vec::with_capacity(
            sliders.len() + combos.len() + traversals.len() + floaters.len(),
        );
        for (i, s) in sliders.into_iter().enumerate() {
            let kind = ControllerKind::Slider(Slider {
                id: SliderId::from_index(i),
            });
            let mut c = Controller::new(s.name, s.prog, kind);
            c.set_enabled(s.enabled);
            controllers.push(c);
        }

        let exclusions = combo_exclusions(&combos);
        for ((i, def), exclusions) in combos.into_iter().enumerate().zip(exclusions) {
            let kind = ControllerKind::Combo(Combo {
                id: ComboId::from_index(i),
                members: def.pairs,
                exclusions,
            });
            let mut c = Controller::new(def.name, def.prog, kind);
            c.set_enabled(def.enabled);
            controllers.push(c);
        }

        for id in &traversal_order {
            let def = &traversals[id.index()];
            let kind = ControllerKind::Traversal(Traversal {
                id: *id,
                progress: source(def.progress, def.progress_flip),
                multiplier: source(def.multiplier, def.multiplier_flip),
            });
            let mut c = Controller::new(def.name.clone(), def.prog, kind);
            c.set_enabled(def.enabled);
            controllers.push(c);
        }

        let mut floater_kinds = Vec::with_capacity(floaters.len());
        for (i, def) in floaters.into_iter().enumerate() {
            let mut members = def.pairs;
            members.sort_by_key(|m| m.slider);
            let floater = Floater {
                id: FloaterId::from_index(i),
                members,
            };
            floater_kinds.push(floater.clone());
            let mut c = Controller::new(def.name, def.prog, ControllerKind::Floater(floater));
            c.set_enabled(def.enabled);
            controllers.push(c);
        }

        self.spaces = TriSpace::build_spaces(&floater_kinds);
        self.scratch = Scratch::new(self.slider_count, floater_kinds.len());
        self.controllers = controllers;
        self.built = true;

        log::debug!(
            "built rig: {} shapes, {} progressions, {} controllers ({} sliders, {} floaters), {} trispaces",
            self.shapes.len(),
            self.progressions.len(),
            self.controllers.len(),
            self.slider_count,
            floater_kinds.len(),
            self.spaces.len()
        );
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    pub fn has_parse_error(&self) -> bool {
        self.parse_error.is_some()
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    /// Solve one input vector (one value per slider, schema order) into one
    /// weight per shape (schema order).
    pub fn solve(&mut self, input: &[f64]) -> Result<Vec<f64>, SolveError> {
        if !self.built {
            return Err(SolveError::NotBuilt);
        }
        if input.len() != self.slider_count {
            return Err(SolveError::DimensionMismatch {
                expected: self.slider_count,
                got: input.len(),
            });
        }

        self.scratch.begin_solve(input);
        for space in &self.spaces {
            for (id, v) in space.resolve(&self.scratch.rectified) {
                self.scratch.floater_values[id.index()] = v;
            }
        }

        let ctx = StoreContext {
            inputs: &self.scratch.rectified,
            floater_values: &self.scratch.floater_values,
            config: &self.cfg,
        };
        for i in 0..self.controllers.len() {
            let (earlier, rest) = self.controllers.split_at_mut(i);
            rest[0].store_value(&ctx, earlier);
        }

        let mut acc = Accumulator::new(self.shapes.len());
        for c in &self.controllers {
            c.solve(&self.progressions, &mut acc);
        }
        Ok(acc.into_vec())
    }

    /// Reset every controller to value 0, multiplier 1.
    pub fn clear_values(&mut self) {
        self.controllers.iter_mut().for_each(Controller::clear_value);
    }

    pub fn config(&self) -> &SolverConfig {
        &self.cfg
    }

    pub fn set_config(&mut self, cfg: SolverConfig) {
        self.cfg = cfg;
    }

    pub fn set_exact_solve(&mut self, exact: bool) {
        self.cfg.exact_solve = exact;
    }

    /// Returns `false` if `id` names no controller.
    pub fn set_enabled(&mut self, id: ControllerId, enabled: bool) -> bool {
        match self.controllers.get_mut(id.index()) {
            Some(c) => {
                c.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Controllers in solve order.
    pub fn controllers(&self) -> &[Controller] {
        &self.controllers
    }

    pub fn controller(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(id.index())
    }

    pub fn controller_id(&self, name: &str) -> Option<ControllerId> {
        self.controllers
            .iter()
            .position(|c| c.name() == name)
            .map(ControllerId::from_index)
    }

    pub fn find_controller(&self, name: &str) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.name() == name)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn progressions(&self) -> &[Progression] {
        &self.progressions
    }

    pub fn spaces(&self) -> &[TriSpace] {
        &self.spaces
    }

    pub fn slider_count(&self) -> usize {
        self.slider_count
    }

    /// Attach a host handle to a shape. Returns the previous handle.
    /// Unknown shapes are ignored.
    pub fn set_shape_handle(&mut self, shape: ShapeId, handle: ShapeHandle) -> Option<ShapeHandle> {
        if shape.index() >= self.shapes.len() {
            return None;
        }
        self.handles.set(shape, handle)
    }

    pub fn shape_handle(&self, shape: ShapeId) -> Option<ShapeHandle> {
        self.handles.get(shape)
    }
}

/// For each combo, the sliders of strictly larger combos that contain every
/// (slider, sign) member of it, minus its own sliders. Deduplicated.
fn combo_exclusions(combos: &[ComboDef]) -> Vec<Vec<SliderTarget>> {
    let contains = |outer: &ComboDef, m: &SliderTarget| {
        outer
            .pairs
            .iter()
            .any(|o| o.slider == m.slider && o.is_negative() == m.is_negative())
    };
    combos
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            let mut out: Vec<SliderTarget> = Vec::new();
            for (j, outer) in combos.iter().enumerate() {
                if i == j || outer.pairs.len() <= inner.pairs.len() {
                    continue;
                }
                if !inner.pairs.iter().all(|m| contains(outer, m)) {
                    continue;
                }
                for o in &outer.pairs {
                    let own = inner.pairs.iter().any(|m| m.slider == o.slider);
                    let seen = out
                        .iter()
                        .any(|x| x.slider == o.slider && x.is_negative() == o.is_negative());
                    if !own && !seen {
                        out.push(*o);
                    }
                }
            }
            out
        })
        .collect()
}
