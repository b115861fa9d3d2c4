mod bootstrap;
mod commands;

use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use todo_core::settings::{Command, LastUsedParams, Settings};
use todo_core::time_utils::TimezoneHandler;
use todo_data::JsonFileStorage;
use todo_runtime::{TodoService, TodoStore};
use todo_ui::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();
    let command = settings.subcommand_or_default();

    bootstrap::ensure_directories()?;
    // The server logs to the terminal; everything else keeps stdout clean.
    let log_file = match (&settings.log_file, &command) {
        (Some(path), _) => Some(path.clone()),
        (None, Command::Serve { .. }) => None,
        (None, _) => Some(bootstrap::default_log_file()),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("todo v{} starting", env!("CARGO_PKG_VERSION"));
    if let Err(e) = settings.remember(&LastUsedParams::config_path()) {
        tracing::warn!(error = %e, "could not persist last-used settings");
    }
    tracing::debug!(
        "Theme: {}, Timezone: {}, Filter: {}, Sort: {}",
        settings.theme,
        settings.timezone,
        settings.filter,
        settings.sort
    );

    let data_path = settings.data_file_path();
    let mut store = TodoStore::open(JsonFileStorage::new(&data_path))
        .with_context(|| format!("opening {}", data_path.display()))?
        .with_empty_edit_policy(settings.empty_edit_policy());

    let mut out = io::stdout().lock();
    match command {
        Command::Add { text } => commands::add(&mut store, &text, &mut out)?,
        Command::List {
            filter,
            sort,
            search,
            json,
        } => {
            let filter = match filter {
                Some(f) => f.parse()?,
                None => settings.filter_view(),
            };
            let sort = match sort {
                Some(s) => s.parse()?,
                None => settings.sort_order(),
            };
            let timezones = TimezoneHandler::new(&settings.timezone);
            let display = commands::Display {
                timezones: &timezones,
                use_12h: settings.use_12h(),
            };
            commands::list(&store, filter, sort, search.as_deref(), json, &display, &mut out)?;
        }
        Command::Toggle { id } => commands::toggle(&mut store, id, &mut out)?,
        Command::Edit { id, text } => commands::edit(&mut store, id, &text, &mut out)?,
        Command::Delete { id } => commands::delete(&mut store, id, &mut out)?,
        Command::ClearCompleted => commands::clear_completed(&mut store, &mut out)?,
        Command::ToggleAll => commands::toggle_all(&mut store, &mut out)?,
        Command::Stats => commands::stats(&store, &mut out)?,
        Command::Export { path } => commands::export(&store, &path, &mut out)?,
        Command::Import { path, replace } => {
            commands::import(&mut store, &path, replace, &mut out)?
        }

        Command::Tui => {
            drop(out);
            tracing::info!("Starting interactive UI...");
            let handle = TodoService::spawn(store);

            let app = App::new(
                &settings.theme,
                settings.timezone.clone(),
                settings.use_12h(),
                settings.filter_view(),
                settings.sort_order(),
            );

            // The loop exits on 'q' / Ctrl+C inside the TUI. Ctrl+C is also
            // watched at the OS level for signals that arrive outside raw mode.
            tokio::select! {
                result = app.run(handle) => {
                    let (filter, sort) = result?;
                    if let Err(e) = LastUsedParams::remember_view_at(
                        &LastUsedParams::config_path(),
                        filter,
                        sort,
                    ) {
                        tracing::warn!(error = %e, "could not remember the last view");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; leaving the UI");
                }
            }
        }

        Command::Serve { host, port } => {
            drop(out);
            let addr: SocketAddr = format!("{host}:{port}")
                .parse()
                .with_context(|| format!("invalid listen address {host}:{port}"))?;
            let handle = TodoService::spawn(store);

            todo_api::serve(handle, addr, async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Ctrl+C received; shutting down");
            })
            .await
            .with_context(|| format!("serving on {addr}"))?;
        }
    }

    Ok(())
}
