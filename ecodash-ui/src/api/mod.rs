//! HTTP API: upload, assessments proxy, session identity, health, and the
//! dashboard page.

pub mod assessments;
pub mod health;
pub mod session;
pub mod ui;
pub mod uploads;

pub use assessments::assessment_routes;
pub use health::health_routes;
pub use session::session_routes;
pub use ui::ui_routes;
pub use uploads::upload_routes;
