/// Tracks which run id is in flight so late or foreign completions can be dropped.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    in_flight: Option<u64>,
    sequence: u64,
}

impl RunState {
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn next_run_id(&mut self) -> u64 {
        self.sequence = self.sequence.saturating_add(1);
        self.sequence
    }

    pub fn on_started(&mut self, run_id: u64) {
        self.in_flight = Some(run_id);
    }

    /// Returns false when `run_id` is not the run currently in flight.
    pub fn on_finished(&mut self, run_id: u64) -> bool {
        if self.in_flight != Some(run_id) {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Forget the in-flight run; its completion will be treated as stale.
    pub fn abandon(&mut self) {
        self.in_flight = None;
    }
}
