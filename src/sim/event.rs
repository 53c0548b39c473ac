/// Events emitted during a session update.
/// The driver consumes these to end the run and report the result.

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Camera entered the goal cell after `elapsed` seconds.
    GoalReached { elapsed: f64 },
    QuitRequested,
}
