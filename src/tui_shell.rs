use std::io::{self, IsTerminal};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::backend::{Backend, HttpBackend, normalize};
use crate::catalog::ResourceCatalog;
use crate::config::DashboardConfig;
use crate::jobs::{JobBoard, JobSubmitter};
use crate::model::{
    ErrorKind, JobKind, JobRequest, JobStatus, ModelType, SelectionState, TrainForm,
};
use crate::present::present;
use crate::selection::SelectionController;

mod event_loop;

mod input;
use input::Input;

mod render;

mod state;
use state::{App, Focus, TrainField};

pub fn run(config: DashboardConfig) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the dashboard requires an interactive terminal (TTY)");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let backend = HttpBackend::new(&config)?;

    let mut stdout = io::stdout();
    enable_raw_mode().context("enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend).context("create terminal")?;
    terminal.clear().ok();

    let local = tokio::task::LocalSet::new();
    let res = local.block_on(&runtime, async {
        let mut app = App::new(backend);
        app.reload_catalog();
        event_loop::run_loop(&mut terminal, &mut app).await
    });

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}
