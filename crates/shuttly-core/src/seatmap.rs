// ── Seat layout & selection ──
//
// A fixed seat map (driver + passengers) with toggle-selection
// semantics. Selection is tracked apart from the seats themselves:
// `is_selected` is derived, never stored on a seat.

use serde::{Deserialize, Serialize};

use shuttly_api::models::SeatDto;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Booked,
    Driver,
}

impl SeatStatus {
    fn from_wire(raw: &str) -> Result<Self, CoreError> {
        match raw {
            "available" => Ok(Self::Available),
            "booked" => Ok(Self::Booked),
            "driver" => Ok(Self::Driver),
            other => Err(CoreError::DataIntegrity(format!(
                "unrecognized seat status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: String,
    pub number: String,
    pub status: SeatStatus,
    pub female_only: bool,
}

/// How a seat renders. Four states; selection is layered on top by the
/// caller from the [`SelectionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAppearance {
    /// Non-selectable: the driver's position.
    Driver,
    /// Non-selectable: already taken.
    Booked,
    /// Selectable, reserved for female passengers.
    AvailableFemaleOnly,
    /// Selectable.
    Available,
}

impl Seat {
    pub fn appearance(&self) -> SeatAppearance {
        match self.status {
            SeatStatus::Driver => SeatAppearance::Driver,
            SeatStatus::Booked => SeatAppearance::Booked,
            SeatStatus::Available if self.female_only => SeatAppearance::AvailableFemaleOnly,
            SeatStatus::Available => SeatAppearance::Available,
        }
    }
}

/// The full seat map for one schedule.
///
/// Construction enforces the layout invariants: exactly one driver
/// seat, unique seat ids. A layout that violates them is a
/// data-integrity error, not something to render around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLayout {
    seats: Vec<Seat>,
}

impl SeatLayout {
    pub fn new(seats: Vec<Seat>) -> Result<Self, CoreError> {
        let driver_count = seats
            .iter()
            .filter(|s| s.status == SeatStatus::Driver)
            .count();
        if driver_count != 1 {
            return Err(CoreError::DataIntegrity(format!(
                "seat layout must have exactly one driver seat, found {driver_count}"
            )));
        }

        let mut ids: Vec<&str> = seats.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        if ids.windows(2).any(|w| w[0] == w[1]) {
            return Err(CoreError::DataIntegrity(
                "seat layout contains duplicate seat ids".into(),
            ));
        }

        Ok(Self { seats })
    }

    /// Build a layout from wire seats, validating statuses and invariants.
    pub fn from_wire(seats: Vec<SeatDto>) -> Result<Self, CoreError> {
        let seats = seats
            .into_iter()
            .map(|dto| {
                Ok(Seat {
                    status: SeatStatus::from_wire(&dto.status)?,
                    id: dto.id,
                    number: dto.number,
                    female_only: dto.is_female_only,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        Self::new(seats)
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    /// Seat numbers for a set of seat ids, in the ids' order.
    pub fn numbers_for(&self, seat_ids: &[String]) -> Vec<String> {
        seat_ids
            .iter()
            .filter_map(|id| self.seat(id).map(|s| s.number.clone()))
            .collect()
    }
}

/// The set of currently selected seat ids.
///
/// Insertion-ordered so passenger records line up with the order seats
/// were picked. Mutated only by [`toggle`](Self::toggle); cleared when
/// the schedule changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a seat. Deselecting is always allowed; selecting requires
    /// the seat to exist in the layout with `available` status --
    /// booked/driver toggles are no-ops (the UI disables those
    /// controls, this is the defensive backstop).
    ///
    /// Returns whether the seat is selected afterwards.
    pub fn toggle(&mut self, layout: &SeatLayout, seat_id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|id| id == seat_id) {
            self.ids.remove(pos);
            return false;
        }
        match layout.seat(seat_id) {
            Some(seat) if seat.status == SeatStatus::Available => {
                self.ids.push(seat_id.to_owned());
                true
            }
            _ => false,
        }
    }

    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.ids.iter().any(|id| id == seat_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn layout() -> SeatLayout {
        SeatLayout::new(vec![
            Seat {
                id: "d1".into(),
                number: "D".into(),
                status: SeatStatus::Driver,
                female_only: false,
            },
            Seat {
                id: "s1".into(),
                number: "1".into(),
                status: SeatStatus::Available,
                female_only: false,
            },
            Seat {
                id: "s2".into(),
                number: "2".into(),
                status: SeatStatus::Available,
                female_only: true,
            },
            Seat {
                id: "s3".into(),
                number: "3".into(),
                status: SeatStatus::Booked,
                female_only: false,
            },
        ])
        .unwrap()
    }

    #[test]
    fn select_then_deselect_restores_prior_state() {
        let layout = layout();
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(&layout, "s1"));
        assert!(selection.is_selected("s1"));
        assert!(!selection.toggle(&layout, "s1"));
        assert_eq!(selection, SelectionSet::new());
    }

    #[test]
    fn booked_seat_toggle_is_a_no_op() {
        let layout = layout();
        let mut selection = SelectionSet::new();
        assert!(!selection.toggle(&layout, "s3"));
        assert!(selection.is_empty());
    }

    #[test]
    fn driver_seat_toggle_is_a_no_op() {
        let layout = layout();
        let mut selection = SelectionSet::new();
        assert!(!selection.toggle(&layout, "d1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn unknown_seat_toggle_is_a_no_op() {
        let layout = layout();
        let mut selection = SelectionSet::new();
        assert!(!selection.toggle(&layout, "nope"));
        assert!(selection.is_empty());
    }

    #[test]
    fn selection_preserves_pick_order() {
        let layout = layout();
        let mut selection = SelectionSet::new();
        selection.toggle(&layout, "s2");
        selection.toggle(&layout, "s1");
        assert_eq!(selection.ids(), ["s2".to_owned(), "s1".to_owned()]);
    }

    #[test]
    fn appearance_covers_all_four_states() {
        let layout = layout();
        let states: Vec<SeatAppearance> =
            layout.seats().iter().map(Seat::appearance).collect();
        assert_eq!(
            states,
            vec![
                SeatAppearance::Driver,
                SeatAppearance::Available,
                SeatAppearance::AvailableFemaleOnly,
                SeatAppearance::Booked,
            ]
        );
    }

    #[test]
    fn layout_requires_exactly_one_driver() {
        let err = SeatLayout::new(vec![Seat {
            id: "s1".into(),
            number: "1".into(),
            status: SeatStatus::Available,
            female_only: false,
        }])
        .unwrap_err();
        assert!(err.to_string().contains("exactly one driver"));
    }

    #[test]
    fn layout_rejects_duplicate_ids() {
        let seat = Seat {
            id: "dup".into(),
            number: "1".into(),
            status: SeatStatus::Available,
            female_only: false,
        };
        let driver = Seat {
            id: "d1".into(),
            number: "D".into(),
            status: SeatStatus::Driver,
            female_only: false,
        };
        assert!(SeatLayout::new(vec![driver, seat.clone(), seat]).is_err());
    }
}
