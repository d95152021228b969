//! Controller and entrant contracts.
//!
//! The simulation only needs two capabilities from the outside world: a
//! controller that maps the three sensor readings of a bird to an output
//! vector, and an entrant that can hand out such a controller and receive a
//! fitness. How controllers are built (evolved network, script, closure) is
//! none of the simulation's business.

/// Decides, once per frame, whether a bird jumps.
///
/// Inputs are `[bird.x - pipe.x, bird.y - pipe.top_height,
/// bird.y - pipe.bottom_top_left]` for the target pipe. Only the first output
/// is read; the bird jumps when it exceeds the configured threshold.
pub trait Controller {
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64>;
}

impl<F> Controller for F
where
    F: FnMut(&[f64]) -> Vec<f64>,
{
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
        self(inputs)
    }
}

/// One participant of a generation: supplies a controller, receives fitness.
pub trait Entrant {
    fn controller(&self) -> Box<dyn Controller>;

    fn set_fitness(&mut self, fitness: f64);

    fn fitness(&self) -> Option<f64>;
}

/// Always answers with the same output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedController {
    pub output: f64,
}

impl Controller for ScriptedController {
    fn activate(&mut self, _inputs: &[f64]) -> Vec<f64> {
        vec![self.output]
    }
}

/// Jumps whenever the bird's top edge is within `margin` pixels of the
/// bottom pipe of the target gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapFollower {
    pub margin: f64,
}

impl Controller for GapFollower {
    fn activate(&mut self, inputs: &[f64]) -> Vec<f64> {
        let below_gap_floor = inputs.get(2).copied().unwrap_or(f64::MIN);
        vec![if below_gap_floor > -self.margin { 1.0 } else { -1.0 }]
    }
}

/// Which scripted behaviour an entrant uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Script {
    Constant(f64),
    FollowGap { margin: f64 },
}

/// Entrant driven by a script instead of a genome.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedEntrant {
    pub script: Script,
    pub fitness: Option<f64>,
}

impl ScriptedEntrant {
    pub fn constant(output: f64) -> Self {
        Self {
            script: Script::Constant(output),
            fitness: None,
        }
    }

    pub fn follow_gap(margin: f64) -> Self {
        Self {
            script: Script::FollowGap { margin },
            fitness: None,
        }
    }
}

impl Entrant for ScriptedEntrant {
    fn controller(&self) -> Box<dyn Controller> {
        match self.script {
            Script::Constant(output) => Box::new(ScriptedController { output }),
            Script::FollowGap { margin } => Box::new(GapFollower { margin }),
        }
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn fitness(&self) -> Option<f64> {
        self.fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_controller_ignores_inputs() {
        let mut c = ScriptedController { output: 0.9 };
        assert_eq!(c.activate(&[1.0, 2.0, 3.0]), vec![0.9]);
        assert_eq!(c.activate(&[]), vec![0.9]);
    }

    #[test]
    fn test_closure_is_a_controller() {
        let mut c = |inputs: &[f64]| vec![inputs[0] * 2.0];
        assert_eq!(Controller::activate(&mut c, &[1.5]), vec![3.0]);
    }

    #[test]
    fn test_gap_follower_jumps_near_bottom_pipe() {
        let mut c = GapFollower { margin: 40.0 };
        assert_eq!(c.activate(&[0.0, 0.0, -30.0]), vec![1.0]);
        assert_eq!(c.activate(&[0.0, 0.0, -80.0]), vec![-1.0]);
        assert_eq!(c.activate(&[]), vec![-1.0]);
    }

    #[test]
    fn test_scripted_entrant_records_fitness() {
        let mut entrant = ScriptedEntrant::constant(1.0);
        assert_eq!(entrant.fitness(), None);
        entrant.set_fitness(4.5);
        assert_eq!(entrant.fitness(), Some(4.5));
        let mut controller = entrant.controller();
        assert_eq!(controller.activate(&[0.0; 3]), vec![1.0]);
    }
}
