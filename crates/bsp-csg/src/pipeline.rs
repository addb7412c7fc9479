//! Step-wise execution of boolean recipes.
//!
//! A [`Recipe`] is an ordered list of boolean steps applied to an initially
//! empty solid. Running one step at a time lets an interactive host yield
//! back to its event loop between steps and report progress. Runs are
//! cancelled by supersession only: starting a new run on the same
//! [`BuildTracker`] turns every older run stale, and a stale run neither
//! reports progress nor produces a result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, trace};

use crate::{BooleanOp, Csg, Mesh};

/// One boolean step of a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStep {
    /// Human readable name, used for logging and progress display.
    pub label: String,
    /// How the operand is combined with the solid built so far.
    pub op: BooleanOp,
    /// The solid combined in this step.
    pub operand: Mesh,
}

impl BuildStep {
    /// Creates a step combining `operand` with the solid using `op`.
    pub fn new(label: impl Into<String>, op: BooleanOp, operand: Mesh) -> Self {
        Self {
            label: label.into(),
            op,
            operand,
        }
    }

    /// Creates a step that adds `operand` to the solid.
    pub fn union(label: impl Into<String>, operand: Mesh) -> Self {
        Self::new(label, BooleanOp::Union, operand)
    }

    /// Creates a step that removes `operand` from the solid.
    pub fn subtract(label: impl Into<String>, operand: Mesh) -> Self {
        Self::new(label, BooleanOp::Subtract, operand)
    }
}

/// An ordered sequence of boolean steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    steps: Vec<BuildStep>,
}

impl Recipe {
    /// Creates an empty recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step.
    pub fn push(&mut self, step: BuildStep) {
        self.steps.push(step);
    }

    /// Appends a step, builder style.
    pub fn then(mut self, step: BuildStep) -> Self {
        self.push(step);
        self
    }

    /// Returns the steps in execution order.
    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    /// Returns the number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the recipe has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step to completion without supersession checks.
    pub fn evaluate(&self) -> Csg {
        self.steps.iter().fold(Csg::new(), |solid, step| {
            solid.apply(step.op, &Csg::from(&step.operand))
        })
    }
}

impl FromIterator<BuildStep> for Recipe {
    fn from_iter<I: IntoIterator<Item = BuildStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

/// Progress of a run after a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Number of completed steps.
    pub step: usize,
    /// Total number of steps in the run.
    pub total: usize,
}

impl Progress {
    /// Completed fraction in `[0, 1]`. An empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.step as f64 / self.total as f64
        }
    }

    /// Completed share in whole percent.
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0).round() as u32
    }

    /// Returns true once every step has completed.
    pub fn is_complete(&self) -> bool {
        self.step >= self.total
    }
}

/// Hands out generation numbers to build runs.
///
/// Clones share the same counter, so a tracker can be handed to another
/// thread and still supersede runs started from the original.
#[derive(Debug, Clone, Default)]
pub struct BuildTracker {
    latest: Arc<AtomicU64>,
}

impl BuildTracker {
    /// Creates a tracker with no runs started.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the generation of the most recently started run (0 if none).
    pub fn current(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Starts a new run, superseding every run started before it.
    pub fn start(&self, recipe: Recipe) -> BuildRun {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(
            "starting build generation {generation} with {} steps",
            recipe.len()
        );
        BuildRun {
            generation,
            latest: Arc::clone(&self.latest),
            steps: recipe.steps,
            completed: 0,
            solid: Csg::new(),
        }
    }
}

/// A single, resumable execution of a recipe.
///
/// The run owns its operands and the solid built so far, so nothing is
/// shared with other runs.
#[derive(Debug)]
pub struct BuildRun {
    generation: u64,
    latest: Arc<AtomicU64>,
    steps: Vec<BuildStep>,
    completed: usize,
    solid: Csg,
}

impl BuildRun {
    /// Returns the generation number assigned when the run started.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once a newer run has been started on the same tracker.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }

    /// Returns the number of steps in the run.
    pub fn total(&self) -> usize {
        self.steps.len()
    }

    /// Returns the progress after the steps completed so far.
    pub fn progress(&self) -> Progress {
        Progress {
            step: self.completed,
            total: self.steps.len(),
        }
    }

    /// Label of the step [`step`](Self::step) would execute next.
    pub fn next_label(&self) -> Option<&str> {
        self.steps.get(self.completed).map(|s| s.label.as_str())
    }

    /// Returns true once every step has executed.
    pub fn is_done(&self) -> bool {
        self.completed >= self.steps.len()
    }

    /// The solid built so far.
    pub fn solid(&self) -> &Csg {
        &self.solid
    }

    /// Executes the next step.
    ///
    /// Returns `None` when all steps are done or the run has been
    /// superseded, including when that happened while the step executed.
    pub fn step(&mut self) -> Option<Progress> {
        if !self.is_current() {
            debug!("build generation {} superseded", self.generation);
            return None;
        }
        let step = self.steps.get(self.completed)?;
        trace!(
            "generation {} step {}/{}: {:?} {}",
            self.generation,
            self.completed + 1,
            self.steps.len(),
            step.op,
            step.label
        );
        self.solid = self.solid.apply(step.op, &Csg::from(&step.operand));
        self.completed += 1;

        if !self.is_current() {
            debug!("build generation {} superseded", self.generation);
            return None;
        }
        Some(self.progress())
    }

    /// Executes the remaining steps and returns the resulting mesh.
    ///
    /// Returns `None` if the run has been superseded.
    pub fn finish(mut self) -> Option<Mesh> {
        while self.step().is_some() {}
        self.into_result()
    }

    /// Executes the remaining steps, calling `on_progress` after each one.
    ///
    /// A superseded run stops without further callbacks and returns `None`.
    pub fn run(mut self, mut on_progress: impl FnMut(Progress)) -> Option<Mesh> {
        while let Some(progress) = self.step() {
            on_progress(progress);
        }
        self.into_result()
    }

    fn into_result(self) -> Option<Mesh> {
        if !self.is_current() || !self.is_done() {
            return None;
        }
        let mesh = self.solid.to_mesh();
        info!(
            "build generation {} finished: {} triangles",
            self.generation,
            mesh.triangle_count()
        );
        Some(mesh)
    }
}

impl Iterator for BuildRun {
    type Item = Progress;

    fn next(&mut self) -> Option<Progress> {
        self.step()
    }
}
