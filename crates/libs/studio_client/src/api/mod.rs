mod albums;
mod auth;
mod calendar;
mod dashboard;
mod error;
mod events;
mod notifications;
mod packages;
mod payments;
mod reservations;
mod resource;
mod staff;
mod uploads;

pub use albums::AlbumsApi;
pub use auth::AuthApi;
pub use calendar::CalendarApi;
pub use dashboard::DashboardApi;
pub use error::ApiError;
pub use events::EventsApi;
pub use notifications::NotificationsApi;
pub use packages::PackagesApi;
pub use payments::PaymentsApi;
pub use reservations::ReservationsApi;
pub use resource::Resource;
pub use staff::{RolesApi, StaffRolesApi};
pub use uploads::UploadsApi;
