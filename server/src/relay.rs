use crate::protocol::Position;

/// Highest number of unit slots the relay will track. Ids at or past this are
/// refused so one message cannot inflate every later `init`.
pub const MAX_UNITS: u32 = 1024;

/// Last known position of every unit any client has moved, indexed by
/// `unit_id`. Gaps are filled with the origin.
#[derive(Debug, Default)]
pub struct RelayState {
    units: Vec<Position>,
}

impl RelayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn units(&self) -> &[Position] {
        &self.units
    }

    /// Stores `position` for `unit_id`. Returns `false`, leaving the state
    /// untouched, when the id is not below [`MAX_UNITS`].
    pub fn record_move(&mut self, unit_id: u32, position: Position) -> bool {
        if unit_id >= MAX_UNITS {
            return false;
        }
        let idx = unit_id as usize;
        if self.units.len() <= idx {
            self.units.resize(idx + 1, Position::default());
        }
        self.units[idx] = position;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_move_pads_with_origin() {
        let mut state = RelayState::new();
        assert!(state.record_move(2, Position { x: 4.0, y: 0.0, z: 1.0 }));
        assert_eq!(
            state.units(),
            &[Position::default(), Position::default(), Position { x: 4.0, y: 0.0, z: 1.0 }]
        );
    }

    #[test]
    fn record_move_overwrites() {
        let mut state = RelayState::new();
        state.record_move(0, Position { x: 1.0, y: 0.0, z: 0.0 });
        state.record_move(0, Position { x: 2.0, y: 0.0, z: 0.0 });
        assert_eq!(state.units(), &[Position { x: 2.0, y: 0.0, z: 0.0 }]);
    }

    #[test]
    fn record_move_refuses_ids_past_the_bound() {
        let mut state = RelayState::new();
        assert!(!state.record_move(MAX_UNITS, Position { x: 1.0, y: 0.0, z: 0.0 }));
        assert!(!state.record_move(u32::MAX, Position::default()));
        assert!(state.units().is_empty());

        assert!(state.record_move(MAX_UNITS - 1, Position::default()));
        assert_eq!(state.units().len(), MAX_UNITS as usize);
    }
}
