//! Iteration control for the Krylov solver.

use log::info;

/// Standard convergence check: an iteration has converged when the defect
/// norm drops below the absolute floor or the relative reduction target,
/// and has failed when the iteration cap is reached first.
#[derive(Debug, Clone)]
pub struct ConvCheck {
    max_steps: usize,
    min_defect: f64,
    reduction: f64,
    verbose: bool,
    step: usize,
    initial_defect: f64,
    current_defect: f64,
    last_defect: f64,
}

impl ConvCheck {
    pub fn new(max_steps: usize, min_defect: f64, reduction: f64, verbose: bool) -> Self {
        Self {
            max_steps,
            min_defect,
            reduction,
            verbose,
            step: 0,
            initial_defect: f64::NAN,
            current_defect: f64::NAN,
            last_defect: f64::NAN,
        }
    }

    /// Begin a solve with the initial defect norm.
    pub fn start(&mut self, defect: f64) {
        self.step = 0;
        self.initial_defect = defect;
        self.current_defect = defect;
        self.last_defect = defect;
        if self.verbose {
            info!("  iter      defect         rate");
            info!("  {:>4}  {:>12.6e}            -", 0, defect);
        }
    }

    /// Record the defect after one iteration.
    pub fn update(&mut self, defect: f64) {
        self.step += 1;
        self.last_defect = self.current_defect;
        self.current_defect = defect;
        if self.verbose {
            let rate = if self.last_defect > 0.0 {
                defect / self.last_defect
            } else {
                0.0
            };
            info!("  {:>4}  {:>12.6e}  {:>10.4}", self.step, defect, rate);
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn defect(&self) -> f64 {
        self.current_defect
    }

    pub fn converged(&self) -> bool {
        if self.current_defect.is_nan() {
            return false;
        }
        if self.current_defect < self.min_defect {
            return true;
        }
        self.initial_defect > 0.0 && self.current_defect / self.initial_defect < self.reduction
    }

    /// Whether the iteration should stop, for either reason.
    pub fn iteration_ended(&self) -> bool {
        self.converged() || self.step >= self.max_steps
    }

    /// Average defect reduction per step so far.
    pub fn avg_rate(&self) -> f64 {
        if self.step == 0 || self.initial_defect <= 0.0 {
            return 0.0;
        }
        (self.current_defect / self.initial_defect).powf(1.0 / self.step as f64)
    }
}
