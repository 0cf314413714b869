// Schedule endpoints
//
// Route/date search and the per-schedule seat map. Both are protected
// calls; both return `{ success, data }` envelopes.

use chrono::NaiveDate;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{ScheduleDto, SeatDto};

impl ApiClient {
    /// Search schedules for an origin/destination pair on a travel date.
    ///
    /// `GET /api/schedules?origin&destination&date`
    ///
    /// An empty result list is a valid response ("no schedules found"),
    /// not an error.
    pub async fn search_schedules(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleDto>, Error> {
        let url = self.api_url("schedules");
        debug!(origin, destination, %date, "searching schedules");

        let date = date.format("%Y-%m-%d").to_string();
        self.get(
            url,
            &[
                ("origin", origin),
                ("destination", destination),
                ("date", date.as_str()),
            ],
        )
        .await
    }

    /// Fetch the seat map for one schedule.
    ///
    /// `GET /api/schedules/{id}/seats`
    pub async fn seat_layout(&self, schedule_id: &str) -> Result<Vec<SeatDto>, Error> {
        let url = self.api_url(&format!("schedules/{schedule_id}/seats"));
        debug!(schedule_id, "fetching seat layout");
        self.get(url, &[]).await
    }
}
