pub mod activity_log_store;
pub mod notification_store;
pub mod service_store;
pub mod session_store;
pub mod survey_store;
pub mod user_store;

pub use activity_log_store::ActivityLogStore;
pub use notification_store::NotificationStore;
pub use service_store::ServiceStore;
pub use session_store::SessionStore;
pub use survey_store::SurveyStore;
pub use user_store::UserStore;
