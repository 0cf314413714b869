// Admin endpoints
//
// Fleet, driver, and schedule CRUD plus booking assignment. Thin forms
// over list/create/update/delete; all require an admin bearer token.

use serde_json::Value;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{
    AssignmentPayload, BookingDto, DriverDto, DriverPayload, ScheduleDto, SchedulePayload,
    VehicleDto, VehiclePayload,
};

impl ApiClient {
    // ── Vehicles ─────────────────────────────────────────────────────

    /// `GET /api/admin/vehicles`
    pub async fn admin_list_vehicles(&self) -> Result<Vec<VehicleDto>, Error> {
        let url = self.api_url("admin/vehicles");
        debug!("listing vehicles");
        self.get(url, &[]).await
    }

    /// `POST /api/admin/vehicles`
    pub async fn admin_create_vehicle(&self, payload: &VehiclePayload) -> Result<VehicleDto, Error> {
        let url = self.api_url("admin/vehicles");
        debug!(name = %payload.name, "creating vehicle");
        self.post(url, payload).await
    }

    /// `PUT /api/admin/vehicles/{id}`
    pub async fn admin_update_vehicle(
        &self,
        vehicle_id: &str,
        payload: &VehiclePayload,
    ) -> Result<VehicleDto, Error> {
        let url = self.api_url(&format!("admin/vehicles/{vehicle_id}"));
        debug!(vehicle_id, "updating vehicle");
        self.put(url, payload).await
    }

    /// `DELETE /api/admin/vehicles/{id}`
    pub async fn admin_delete_vehicle(&self, vehicle_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("admin/vehicles/{vehicle_id}"));
        debug!(vehicle_id, "deleting vehicle");
        let _: Value = self.delete(url).await?;
        Ok(())
    }

    // ── Drivers ──────────────────────────────────────────────────────

    /// `GET /api/admin/drivers`
    pub async fn admin_list_drivers(&self) -> Result<Vec<DriverDto>, Error> {
        let url = self.api_url("admin/drivers");
        debug!("listing drivers");
        self.get(url, &[]).await
    }

    /// `POST /api/admin/drivers`
    pub async fn admin_create_driver(&self, payload: &DriverPayload) -> Result<DriverDto, Error> {
        let url = self.api_url("admin/drivers");
        debug!(name = %payload.name, "creating driver");
        self.post(url, payload).await
    }

    /// `PUT /api/admin/drivers/{id}`
    pub async fn admin_update_driver(
        &self,
        driver_id: &str,
        payload: &DriverPayload,
    ) -> Result<DriverDto, Error> {
        let url = self.api_url(&format!("admin/drivers/{driver_id}"));
        debug!(driver_id, "updating driver");
        self.put(url, payload).await
    }

    /// `DELETE /api/admin/drivers/{id}`
    pub async fn admin_delete_driver(&self, driver_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("admin/drivers/{driver_id}"));
        debug!(driver_id, "deleting driver");
        let _: Value = self.delete(url).await?;
        Ok(())
    }

    // ── Schedules ────────────────────────────────────────────────────

    /// `GET /api/admin/schedules`
    pub async fn admin_list_schedules(&self) -> Result<Vec<ScheduleDto>, Error> {
        let url = self.api_url("admin/schedules");
        debug!("listing schedules");
        self.get(url, &[]).await
    }

    /// `POST /api/admin/schedules`
    pub async fn admin_create_schedule(
        &self,
        payload: &SchedulePayload,
    ) -> Result<ScheduleDto, Error> {
        let url = self.api_url("admin/schedules");
        debug!(origin = %payload.origin, destination = %payload.destination, "creating schedule");
        self.post(url, payload).await
    }

    /// `PUT /api/admin/schedules/{id}`
    pub async fn admin_update_schedule(
        &self,
        schedule_id: &str,
        payload: &SchedulePayload,
    ) -> Result<ScheduleDto, Error> {
        let url = self.api_url(&format!("admin/schedules/{schedule_id}"));
        debug!(schedule_id, "updating schedule");
        self.put(url, payload).await
    }

    /// `DELETE /api/admin/schedules/{id}`
    pub async fn admin_delete_schedule(&self, schedule_id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("admin/schedules/{schedule_id}"));
        debug!(schedule_id, "deleting schedule");
        let _: Value = self.delete(url).await?;
        Ok(())
    }

    // ── Bookings ─────────────────────────────────────────────────────

    /// `GET /api/admin/bookings`
    pub async fn admin_list_bookings(&self) -> Result<Vec<BookingDto>, Error> {
        let url = self.api_url("admin/bookings");
        debug!("listing all bookings");
        self.get(url, &[]).await
    }

    /// Assign a vehicle and/or driver to a booking.
    ///
    /// `PUT /api/admin/bookings/{id}/assign`
    pub async fn admin_assign_booking(
        &self,
        booking_id: &str,
        payload: &AssignmentPayload,
    ) -> Result<BookingDto, Error> {
        let url = self.api_url(&format!("admin/bookings/{booking_id}/assign"));
        debug!(booking_id, "assigning booking");
        self.put(url, payload).await
    }
}
