//! Controllers: the closed set of activation strategies.
//!
//! Every controller shares the same contract: [`Controller::store_value`] derives
//! `value` and `multiplier` from the normalized input, then [`Controller::solve`]
//! pushes `progression(value) * multiplier` into the output accumulator.
//! The variant decides how `value` is derived:
//!
//! | variant   | value                                              | multiplier          |
//! |-----------|----------------------------------------------------|---------------------|
//! | Slider    | its slot of the input vector                       | 1                   |
//! | Combo     | product of member activations (or exact 0/1 match) | 1                   |
//! | Traversal | another controller's value                         | another's value     |
//! | Floater   | resolved by its [`TriSpace`](crate::TriSpace)      | 1                   |

use serde::{Deserialize, Serialize};

use crate::accumulate::Accumulator;
use crate::config::SolverConfig;
use crate::ids::{ComboId, ControllerId, FloaterId, ProgressionId, SliderId, TraversalId};
use crate::numeric::EPS;
use crate::progression::Progression;
use crate::rectify::Rectified;

/// A slider paired with the value it must reach.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliderTarget {
    pub slider: SliderId,
    pub target: f64,
}

impl SliderTarget {
    pub fn new(slider: SliderId, target: f64) -> Self {
        Self { slider, target }
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.target < 0.0
    }

    /// How far the slider has travelled toward the target, in `[0, 1]`.
    /// Zero when the slider sits in the opposite half of its range.
    #[inline]
    pub fn activation(&self, inputs: &Rectified) -> f64 {
        let d = inputs.directional(self.slider.index(), self.is_negative());
        (d / self.target.abs()).min(1.0)
    }

    #[inline]
    fn reached(&self, inputs: &Rectified) -> bool {
        self.activation(inputs) >= 1.0 - EPS
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub id: SliderId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub id: ComboId,
    pub members: Vec<SliderTarget>,
    /// Sliders (with direction) of strictly larger combos containing this one.
    /// In exact mode any of them reaching its target suppresses this combo.
    #[serde(default)]
    pub exclusions: Vec<SliderTarget>,
}

impl Combo {
    fn evaluate(&self, inputs: &Rectified, exact: bool) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        if exact {
            let matched = self.members.iter().all(|m| m.reached(inputs))
                && !self.exclusions.iter().any(|x| x.reached(inputs));
            return if matched { 1.0 } else { 0.0 };
        }
        let mut value = 1.0;
        for m in &self.members {
            let a = m.activation(inputs);
            if a <= 0.0 {
                return 0.0;
            }
            value *= a;
        }
        value
    }
}

/// Where a traversal reads one of its two inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerSource {
    pub id: ControllerId,
    #[serde(default)]
    pub flip: bool,
}

impl ControllerSource {
    fn read(&self, earlier: &[Controller]) -> f64 {
        let v = earlier.get(self.id.index()).map_or(0.0, Controller::value);
        if self.flip {
            -v
        } else {
            v
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Traversal {
    pub id: TraversalId,
    pub progress: ControllerSource,
    pub multiplier: ControllerSource,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Floater {
    pub id: FloaterId,
    /// Location of the floater in slider space, sorted by slider.
    pub members: Vec<SliderTarget>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerKind {
    Slider(Slider),
    Combo(Combo),
    Traversal(Traversal),
    Floater(Floater),
}

impl ControllerKind {
    pub fn label(&self) -> &'static str {
        match self {
            ControllerKind::Slider(_) => "slider",
            ControllerKind::Combo(_) => "combo",
            ControllerKind::Traversal(_) => "traversal",
            ControllerKind::Floater(_) => "floater",
        }
    }
}

/// Everything a controller may read while storing its value.
#[derive(Clone, Copy, Debug)]
pub struct StoreContext<'a> {
    pub inputs: &'a Rectified,
    /// TriSpace results indexed by `FloaterId`.
    pub floater_values: &'a [f64],
    pub config: &'a SolverConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    name: String,
    enabled: bool,
    value: f64,
    multiplier: f64,
    prog: ProgressionId,
    kind: ControllerKind,
}

impl Controller {
    pub fn new(name: impl Into<String>, prog: ProgressionId, kind: ControllerKind) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            value: 0.0,
            multiplier: 1.0,
            prog,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn progression(&self) -> ProgressionId {
        self.prog
    }

    pub fn kind(&self) -> &ControllerKind {
        &self.kind
    }

    pub fn clear_value(&mut self) {
        self.value = 0.0;
        self.multiplier = 1.0;
    }

    /// Derive `value`/`multiplier` for this solve. `earlier` holds the
    /// controllers preceding this one in solve order, already stored.
    pub fn store_value(&mut self, ctx: &StoreContext<'_>, earlier: &[Controller]) {
        self.clear_value();
        if !self.enabled {
            return;
        }
        match &self.kind {
            ControllerKind::Slider(s) => {
                self.value = ctx.inputs.values[s.id.index()];
            }
            ControllerKind::Combo(c) => {
                self.value = c.evaluate(ctx.inputs, ctx.config.exact_solve);
            }
            ControllerKind::Traversal(t) => {
                self.value = t.progress.read(earlier);
                self.multiplier = t.multiplier.read(earlier);
            }
            ControllerKind::Floater(f) => {
                self.value = ctx.floater_values.get(f.id.index()).copied().unwrap_or(0.0);
            }
        }
    }

    /// Add this controller's weighted shapes into `acc`.
    pub fn solve(&self, progressions: &[Progression], acc: &mut Accumulator) {
        if !self.enabled {
            return;
        }
        let Some(prog) = progressions.get(self.prog.index()) else {
            return;
        };
        prog.for_each_weight(self.value, self.multiplier, |shape, w| {
            if let Some(shape) = shape {
                acc.add(shape, w);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ShapeId;
    use crate::interp::Interp;

    fn rectified(raw: &[f64]) -> Rectified {
        let mut r = Rectified::default();
        r.rectify(raw);
        r
    }

    fn combo(members: &[(u32, f64)]) -> Combo {
        Combo {
            id: ComboId(0),
            members: members
                .iter()
                .map(|(s, t)| SliderTarget::new(SliderId(*s), *t))
                .collect(),
            exclusions: Vec::new(),
        }
    }

    #[test]
    fn combo_product_requires_every_member() {
        let c = combo(&[(0, 1.0), (1, 1.0)]);
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0]), false), 1.0);
        assert_eq!(c.evaluate(&rectified(&[1.0, 0.0]), false), 0.0);
        assert_eq!(c.evaluate(&rectified(&[0.5, 0.5]), false), 0.25);
    }

    #[test]
    fn combo_uses_negative_half_for_negative_targets() {
        let c = combo(&[(0, -1.0), (1, 1.0)]);
        assert_eq!(c.evaluate(&rectified(&[-1.0, 1.0]), false), 1.0);
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0]), false), 0.0);
        assert_eq!(c.evaluate(&rectified(&[-0.5, 1.0]), false), 0.5);
    }

    #[test]
    fn exact_combo_is_binary_and_respects_exclusions() {
        let mut c = combo(&[(0, 1.0), (1, 1.0)]);
        c.exclusions.push(SliderTarget::new(SliderId(2), 1.0));
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0, 0.0]), true), 1.0);
        assert_eq!(c.evaluate(&rectified(&[1.0, 0.9, 0.0]), true), 0.0);
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0, 1.0]), true), 0.0);
        // partial exclusion slider does not suppress
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0, 0.5]), true), 1.0);
        // exclusion in the other direction does not suppress
        assert_eq!(c.evaluate(&rectified(&[1.0, 1.0, -1.0]), true), 1.0);
    }

    #[test]
    fn disabled_controller_stores_defaults_and_contributes_nothing() {
        let prog = Progression::new("p", vec![(Some(ShapeId(0)), 1.0)], Interp::Linear).unwrap();
        let mut ctrl = Controller::new(
            "s",
            ProgressionId(0),
            ControllerKind::Slider(Slider { id: SliderId(0) }),
        );
        ctrl.set_enabled(false);
        let inputs = rectified(&[0.8]);
        let cfg = SolverConfig::default();
        let ctx = StoreContext {
            inputs: &inputs,
            floater_values: &[],
            config: &cfg,
        };
        ctrl.store_value(&ctx, &[]);
        assert_eq!(ctrl.value(), 0.0);
        assert_eq!(ctrl.multiplier(), 1.0);
        let mut acc = Accumulator::new(1);
        ctrl.solve(&[prog], &mut acc);
        assert_eq!(acc.into_vec(), vec![0.0]);
    }

    #[test]
    fn traversal_reads_earlier_controllers_with_flips() {
        let inputs = rectified(&[0.6, -0.5]);
        let cfg = SolverConfig::default();
        let ctx = StoreContext {
            inputs: &inputs,
            floater_values: &[],
            config: &cfg,
        };
        let mut earlier = vec![
            Controller::new("a", ProgressionId(0), ControllerKind::Slider(Slider { id: SliderId(0) })),
            Controller::new("b", ProgressionId(0), ControllerKind::Slider(Slider { id: SliderId(1) })),
        ];
        for c in earlier.iter_mut() {
            c.store_value(&ctx, &[]);
        }
        let mut t = Controller::new(
            "t",
            ProgressionId(0),
            ControllerKind::Traversal(Traversal {
                id: TraversalId(0),
                progress: ControllerSource { id: ControllerId(0), flip: false },
                multiplier: ControllerSource { id: ControllerId(1), flip: true },
            }),
        );
        t.store_value(&ctx, &earlier);
        assert_eq!(t.value(), 0.6);
        assert_eq!(t.multiplier(), 0.5);
    }
}
