//! Front-desk helpers: room status and today's arrivals and departures.

use chrono::NaiveDate;
use innkeep_core::{Booking, BookingStatus, Room, RoomPatch, RoomStatus};

use super::Repository;
use crate::error::StoreResult;
use crate::query::SelectOptions;

impl Repository<Room> {
    /// Rooms in `status`, ordered by room number.
    pub async fn with_status(&self, status: RoomStatus) -> StoreResult<Vec<Room>> {
        self.find(
            &SelectOptions::new()
                .filter("status", status.as_str())
                .order_by("number"),
        )
        .await
    }

    /// Moves a room to `status`.
    pub async fn set_status(&self, id: &str, status: RoomStatus) -> StoreResult<Room> {
        self.update(id, &RoomPatch::status(status)).await
    }
}

impl Repository<Booking> {
    /// Bookings arriving on `day` (exact `check_in_date` match).
    pub async fn arriving_on(&self, day: NaiveDate) -> StoreResult<Vec<Booking>> {
        self.find(&SelectOptions::new().filter("check_in_date", day.format("%Y-%m-%d").to_string()))
            .await
    }

    /// Bookings leaving on `day` (exact `check_out_date` match).
    pub async fn departing_on(&self, day: NaiveDate) -> StoreResult<Vec<Booking>> {
        self.find(&SelectOptions::new().filter("check_out_date", day.format("%Y-%m-%d").to_string()))
            .await
    }

    /// Bookings for a room, newest first.
    pub async fn for_room(&self, room_id: &str) -> StoreResult<Vec<Booking>> {
        self.find(
            &SelectOptions::new()
                .filter("room_id", room_id)
                .order_by_desc("created_at"),
        )
        .await
    }

    pub async fn with_status(&self, status: BookingStatus) -> StoreResult<Vec<Booking>> {
        let status = serde_json::to_value(status)
            .map_err(|e| crate::StoreError::serialization(innkeep_core::schema::BOOKINGS, e))?;
        self.find(&SelectOptions::new().filter("status", status)).await
    }
}
