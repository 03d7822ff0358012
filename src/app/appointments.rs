use crate::app::{authorize, require_subject};
use crate::core::access::{self, Capability};
use crate::core::client::{ApiClient, Resource};
use crate::domain::model::{Appointment, NewAppointment};
use crate::domain::ports::TokenStore;
use crate::utils::error::Result;
use crate::utils::validation::require_fields;

pub struct AppointmentService<'a, S: TokenStore> {
    client: &'a ApiClient<S>,
}

impl<'a, S: TokenStore> AppointmentService<'a, S> {
    pub fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// Admins see every booking, customers their own, technicians none.
    pub async fn list(&self) -> Result<Vec<Appointment>> {
        let identity = self.client.require_identity()?;
        let rows = self.client.list(Resource::Appointment).await?;
        let visible = access::visible_appointments(&identity, rows);
        tracing::debug!("Fetched {} visible appointments", visible.len());
        Ok(visible)
    }

    /// Book an appointment for the current user, then return the refreshed list.
    pub async fn create(
        &self,
        appointment_date: &str,
        location: &str,
        user_phone: &str,
    ) -> Result<Vec<Appointment>> {
        let identity = authorize(self.client, Capability::CreateAppointment)?;
        require_fields(&[
            ("Appointment Date", appointment_date),
            ("Location", location),
            ("Phone", user_phone),
        ])?;

        let body = NewAppointment {
            appointment_date: appointment_date.to_string(),
            location: location.to_string(),
            user_id: require_subject(&identity)?,
            user_phone: user_phone.to_string(),
        };
        self.client.create(Resource::Appointment, &body).await?;
        tracing::info!("Appointment booked for {}", appointment_date);
        self.list().await
    }

    pub async fn delete(&self, appointment_id: i64) -> Result<Vec<Appointment>> {
        authorize(self.client, Capability::ManageAppointments)?;
        self.client
            .remove(Resource::Appointment, appointment_id)
            .await?;
        tracing::info!("Appointment {} deleted", appointment_id);
        self.list().await
    }
}
