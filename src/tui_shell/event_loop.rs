use super::*;

pub(super) async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut dirty = true;
    loop {
        while let Ok(ev) = app.events_rx.try_recv() {
            app.handle_event(ev);
            dirty = true;
        }
        if app.selection_rx.has_changed().unwrap_or(false) {
            app.selection_rx.borrow_and_update();
            dirty = true;
        }
        if app.jobs_rx.has_changed().unwrap_or(false) {
            app.jobs_rx.borrow_and_update();
            dirty = true;
        }

        if dirty {
            terminal
                .draw(|f| super::render::draw(f, app))
                .context("draw")?;
            dirty = false;
        }
        if app.quit {
            return Ok(());
        }

        // Never block here: catalog loads and jobs run on this same thread.
        if event::poll(Duration::ZERO).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    handle_key(app, k);
                    dirty = true;
                }
                Event::Resize(..) => dirty = true,
                _ => {}
            }
            continue;
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    if let Some(input) = app.editing.as_mut() {
        match key.code {
            KeyCode::Enter => app.commit_edit(),
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Char(c) => input.insert_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Left if app.focus == Focus::Train && app.form_field == TrainField::ModelType => {
            app.form.model_type = app.form.model_type.prev();
        }
        KeyCode::Right if app.focus == Focus::Train && app.form_field == TrainField::ModelType => {
            app.form.model_type = app.form.model_type.next();
        }
        KeyCode::Enter | KeyCode::Char('e') => app.start_edit(),
        KeyCode::Char('t') => app.submit(JobKind::Train),
        KeyCode::Char('i') => app.submit(JobKind::Inference),
        KeyCode::Char('r') => app.reload_catalog(),
        _ => {}
    }
}
