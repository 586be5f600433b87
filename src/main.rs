#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use stepform::cli::{Cli, Config, build_config, init_logging};
use stepform::draft::load_prefill;
use stepform::remote::HttpEndpoint;
use stepform::tui::{App, AppError};
use stepform::tui::screens::ApplicationForm;

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let config = build_config(&args);
    init_logging(config.log_file.as_deref())?;

    let (form, endpoint) = prepare(&config)?;
    tracing::info!(
        autosave = endpoint.autosave_url(),
        submit = endpoint.submit_url(),
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(form, endpoint, &config, runtime.handle().clone());
    let result = app.run(&mut terminal);

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => {
            restore_result?;
            if app.submitted() {
                println!("Application submitted. Thank you!");
            }
            Ok(())
        }
    }
}

/// Loads the optional draft and builds the HTTP client before the terminal is taken over.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn prepare(config: &Config) -> Result<(ApplicationForm, Arc<HttpEndpoint>), AppError> {
    let form = match &config.prefill {
        Some(path) => ApplicationForm::with_prefill(&load_prefill(path)?),
        None => ApplicationForm::new(),
    };
    let endpoint = HttpEndpoint::new(config.autosave_url(), config.submit_url())?;
    Ok((form, Arc::new(endpoint)))
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
