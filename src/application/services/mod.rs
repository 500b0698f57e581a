//! Application services.

mod api_client;
mod formatting;
mod notification_center;
mod scheduler;
mod token_store;

pub use api_client::{ApiClient, RequestOptions};
pub use formatting::{
    FormMap, INVALID_DATE, form_data_to_json, format_date_for_input, format_date_in_zone,
    format_datetime_for_input, parse_form_fields,
};
pub use notification_center::NotificationCenter;
pub use scheduler::ScheduledTask;
pub use token_store::{AUTH_TOKEN_KEY, ID_TOKEN_KEY, InitPolicy, TokenStore};
