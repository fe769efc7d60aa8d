mod args;
mod form;
mod run;
mod settings;
mod tui;

pub use args::{Args, Command, RunArgs, SettingsAction};
pub use run::{apply_overrides, resolve_api_key, run_summarize};
pub use settings::{run_settings_list, run_settings_reset, run_settings_show};
