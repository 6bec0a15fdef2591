mod app;
pub use app::App;

mod app_controller;
pub use app_controller::AppController;
