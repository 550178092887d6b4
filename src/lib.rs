mod app;
mod commands;
mod config;
mod error;
mod platform;

use commands::passthrough::PassthroughRegistry;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .manage(PassthroughRegistry::new())
        .on_window_event(app::events::handle_window_event)
        .invoke_handler(tauri::generate_handler![
            // Passthrough commands
            commands::passthrough::set_ignore_cursor_events,
            commands::passthrough::register_region,
            commands::passthrough::unregister_region,
            commands::passthrough::attach_passthrough,
            commands::passthrough::detach_passthrough,
            commands::passthrough::pointer_event,
            commands::passthrough::get_passthrough_state,
            // Config commands
            config::overlay::get_overlay_config,
            config::overlay::set_overlay_config,
            // Logging commands
            commands::logging::write_log,
            commands::logging::write_logs,
            commands::logging::get_log_dir,
            commands::logging::get_recent_logs,
        ])
        .setup(|app| {
            if let Err(e) = commands::logging::init_logging(app.handle()) {
                log::warn!("File logging disabled: {}", e);
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
