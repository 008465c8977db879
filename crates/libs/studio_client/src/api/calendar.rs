use crate::api::Resource;
use crate::gateway::{ApiRequest, Gateway, GatewayError};
use chrono::{Datelike, NaiveDate};
use common_types::{CalendarDate, Holiday, HolidayInput};

#[derive(Clone)]
pub struct CalendarApi {
    holidays: Resource<Holiday>,
}

impl CalendarApi {
    #[must_use]
    pub const fn new(gateway: Gateway) -> Self {
        Self {
            holidays: Resource::new(gateway, "holidays"),
        }
    }

    pub async fn holidays(&self) -> Result<Vec<Holiday>, GatewayError> {
        self.holidays.list().await
    }

    pub async fn add_holiday(&self, date: NaiveDate, reason: Option<String>) -> Result<Holiday, GatewayError> {
        self.holidays.create(&HolidayInput { date, reason }).await
    }

    pub async fn remove_holiday(&self, id: i64) -> Result<(), GatewayError> {
        self.holidays.delete(id).await
    }

    /// Availability for every day of the month containing `day`.
    pub async fn month(&self, day: NaiveDate) -> Result<Vec<CalendarDate>, GatewayError> {
        let request = ApiRequest::get("calendar-dates")
            .query("year", day.year())
            .query("month", day.month());
        self.holidays.gateway().send(request).await
    }

    pub async fn is_bookable(&self, date: NaiveDate) -> Result<bool, GatewayError> {
        let month = self.month(date).await?;
        Ok(month
            .iter()
            .find(|d| d.date == date)
            .is_some_and(|d| d.available))
    }
}
