//! `Occupancy`: per-entity capacity-limited FIFO admission queue.
//!
//! # Model
//!
//! Holders are the agents currently inside.  When the entity is full, new
//! requests wait in arrival order and are promoted one at a time as holders
//! release their slot.  The scheduler driving the agents owns *when* these
//! calls happen; this type only keeps the books straight.
//!
//! Holders are a `BTreeSet` so iteration (infection checks, summaries) is in
//! a stable order regardless of arrival history.

use std::collections::{BTreeSet, VecDeque};

use cm_core::{OccupantId, Tick};

use crate::{Capacity, InfectionStatus, PlaceError, PlaceResult};

/// Outcome of [`Occupancy::request`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The occupant now holds a slot.
    Granted,
    /// The entity is full; the occupant waits at `position` (0 = next in line).
    Queued { position: usize },
}

/// Holders, waiters, and the last infectious departure of one entity.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    capacity: Capacity,
    holders:  BTreeSet<OccupantId>,
    waiting:  VecDeque<OccupantId>,
    /// Tick at which an infectious holder last released its slot.
    last_infectious_departure: Option<Tick>,
}

impl Occupancy {
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            holders: BTreeSet::new(),
            waiting: VecDeque::new(),
            last_infectious_departure: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Current holders, in ascending id order.
    pub fn holders(&self) -> impl Iterator<Item = OccupantId> + '_ {
        self.holders.iter().copied()
    }

    /// Waiting occupants, head of the queue first.
    pub fn waiting(&self) -> impl Iterator<Item = OccupantId> + '_ {
        self.waiting.iter().copied()
    }

    /// Number of holders.
    #[inline]
    pub fn len(&self) -> usize {
        self.holders.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }

    #[inline]
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        !self.capacity.has_room(self.holders.len())
    }

    #[inline]
    pub fn holds(&self, who: OccupantId) -> bool {
        self.holders.contains(&who)
    }

    #[inline]
    pub fn last_infectious_departure(&self) -> Option<Tick> {
        self.last_infectious_departure
    }

    /// Ask for a slot.
    ///
    /// An occupant may hold or wait for a given entity at most once.
    pub fn request(&mut self, who: OccupantId) -> PlaceResult<Admission> {
        if self.holders.contains(&who) || self.waiting.contains(&who) {
            return Err(PlaceError::AlreadyPresent(who));
        }
        // Nobody may jump the queue while others are waiting.
        if self.waiting.is_empty() && self.capacity.has_room(self.holders.len()) {
            self.holders.insert(who);
            self.assert_within_capacity();
            Ok(Admission::Granted)
        } else {
            self.waiting.push_back(who);
            Ok(Admission::Queued { position: self.waiting.len() - 1 })
        }
    }

    /// Give back a held slot at `now`.
    ///
    /// Returns the waiter promoted into the freed slot, if any.  If the
    /// departing holder is infectious per `status`, `now` is recorded as the
    /// last infectious departure.
    pub fn release<S: InfectionStatus + ?Sized>(
        &mut self,
        who:    OccupantId,
        now:    Tick,
        status: &S,
    ) -> PlaceResult<Option<OccupantId>> {
        if !self.holders.remove(&who) {
            return Err(PlaceError::NotOccupant(who));
        }
        if status.is_infectious(who) {
            self.last_infectious_departure = Some(now);
        }
        Ok(self.promote())
    }

    /// Withdraw from this entity entirely: leave the queue if waiting, or
    /// release the slot if holding.
    ///
    /// Returns the waiter promoted into a freed slot, if any.
    pub fn abandon<S: InfectionStatus + ?Sized>(
        &mut self,
        who:    OccupantId,
        now:    Tick,
        status: &S,
    ) -> PlaceResult<Option<OccupantId>> {
        if let Some(pos) = self.waiting.iter().position(|&w| w == who) {
            self.waiting.remove(pos);
            return Ok(None);
        }
        self.release(who, now, status)
    }

    /// Move the head of the queue into a free slot.
    fn promote(&mut self) -> Option<OccupantId> {
        if !self.capacity.has_room(self.holders.len()) {
            return None;
        }
        let next = self.waiting.pop_front()?;
        self.holders.insert(next);
        self.assert_within_capacity();
        Some(next)
    }

    #[inline]
    fn assert_within_capacity(&self) {
        assert!(
            self.capacity.allows(self.holders.len()),
            "occupancy {} exceeds capacity {}",
            self.holders.len(),
            self.capacity,
        );
    }
}
