use super::*;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(12),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(frame, app, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(22),
            Constraint::Percentage(22),
            Constraint::Percentage(28),
            Constraint::Percentage(28),
        ])
        .split(chunks[1]);
    let state = app.selection_state();
    draw_nodes(frame, app, &state, columns[0]);
    draw_models(frame, app, &state, columns[1]);
    draw_images(frame, app, &state, columns[2]);
    draw_train_form(frame, app, columns[3]);

    let results = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    draw_result(frame, app, JobKind::Train, results[0]);
    draw_result(frame, app, JobKind::Inference, results[1]);

    // Status
    let status = match &app.status {
        Some((msg, true)) => Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red))),
        Some((msg, false)) => Line::from(Span::raw(msg.as_str())),
        None => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    let help = if app.editing.is_some() {
        "Enter save  Esc cancel  ←/→ move"
    } else {
        "Tab focus  ↑/↓ select  e edit  t train  i infer  r reload  q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::Gray)))),
        chunks[4],
    );
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let snap = app.catalog.snapshot();
    let catalog_note = if app.catalog_loading {
        Span::styled("loading...", Style::default().fg(Color::Yellow))
    } else if let Some(err) = &snap.load_error {
        Span::styled(
            format!("catalog unavailable: {}", err.message),
            Style::default().fg(Color::Red),
        )
    } else if snap.loaded {
        Span::styled(
            format!("{} nodes, {} images", snap.nodes.len(), snap.images.len()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::raw("")
    };
    let spans = vec![
        Span::styled(
            "Model Dashboard",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::raw(app.backend.base_url()),
        Span::raw("  "),
        catalog_note,
    ];
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn highlight() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn draw_list(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    focused: bool,
    items: Vec<ListItem<'_>>,
    selected: Option<usize>,
) {
    let mut list_state = ListState::default();
    list_state.select(selected);
    let list = List::new(items)
        .block(panel(title, focused))
        .highlight_style(highlight());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_nodes(frame: &mut ratatui::Frame, app: &App, state: &SelectionState, area: Rect) {
    let snap = app.catalog.snapshot();
    let items = snap
        .nodes
        .iter()
        .map(|n| {
            let models = n.model_set();
            ListItem::new(format!("{} ({} models)", n.name, models.len()))
        })
        .collect::<Vec<_>>();
    let selected = state
        .selected_node
        .as_deref()
        .and_then(|n| snap.node_position(n));
    draw_list(frame, area, "Nodes", app.focus == Focus::Nodes, items, selected);
}

fn draw_models(frame: &mut ratatui::Frame, app: &App, state: &SelectionState, area: Rect) {
    let focused = app.focus == Focus::Models;
    if state.available_models.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "No models available",
                Style::default().fg(Color::Gray),
            )))
            .block(panel("Models", focused)),
            area,
        );
        return;
    }
    let items = state
        .available_models
        .iter()
        .map(|m| ListItem::new(m.to_string()))
        .collect::<Vec<_>>();
    let selected = state
        .selected_model
        .as_deref()
        .and_then(|m| state.available_models.position(m));
    draw_list(frame, area, "Models", focused, items, selected);
}

fn draw_images(frame: &mut ratatui::Frame, app: &App, state: &SelectionState, area: Rect) {
    let snap = app.catalog.snapshot();
    let items = snap
        .images
        .iter()
        .map(|i| ListItem::new(i.as_str()))
        .collect::<Vec<_>>();
    let selected = state
        .selected_image
        .as_deref()
        .and_then(|p| snap.image_position(p));
    draw_list(frame, area, "Images", app.focus == Focus::Images, items, selected);
}

fn draw_train_form(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Train;
    let mut lines = Vec::new();
    for field in TrainField::ALL {
        let active = focused && field == app.form_field;
        let value = match (&app.editing, active) {
            (Some(input), true) => input.display(),
            _ => field.value(&app.form),
        };
        let style = if active {
            highlight()
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", field.label()), Style::default().fg(Color::Gray)),
            Span::styled(value, style),
        ]));
    }
    frame.render_widget(
        Paragraph::new(lines).block(panel("Train Model", focused)),
        area,
    );
}

fn draw_result(frame: &mut ratatui::Frame, app: &App, kind: JobKind, area: Rect) {
    let title = match kind {
        JobKind::Train => "Training Result",
        JobKind::Inference => "Inference Result",
    };
    let mut lines = Vec::new();
    if kind == JobKind::Inference {
        if let Some(preview) = &app.preview {
            lines.push(Line::from(Span::styled(
                format!("Image: {}", preview),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let board = app.jobs_rx.borrow();
    match board.get(kind) {
        Some(result) => {
            let view = present(result);
            let style = match result.status() {
                JobStatus::Pending => Style::default().fg(Color::Yellow),
                JobStatus::Failed => Style::default().fg(Color::Red),
                JobStatus::Succeeded => Style::default(),
            };
            for l in view.lines() {
                lines.push(Line::from(Span::styled(l, style)));
            }
        }
        None => lines.push(Line::from(Span::styled(
            "No result yet.",
            Style::default().fg(Color::Gray),
        ))),
    }
    drop(board);

    let title = if app.in_flight(kind) {
        format!("{} (running)", title)
    } else {
        title.to_string()
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel(&title, false)),
        area,
    );
}
