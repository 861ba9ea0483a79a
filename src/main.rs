use adw::prelude::*;
use adw::Application;

fn main() {
    env_logger::init();
    let app = Application::builder()
        .application_id("com.example.SqsConsole")
        .build();
    app.connect_activate(|app| {
        sqs_console::app::build_ui(app);
    });
    app.run();
}
