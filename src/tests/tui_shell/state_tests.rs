use super::*;

use crossterm::event::KeyEvent;
use ratatui::backend::TestBackend;

use crate::model::{Catalog, Node};

use super::super::event_loop::handle_key;
use super::super::render::draw;

fn app_with_catalog() -> App {
    let backend = HttpBackend::new(&DashboardConfig::default()).unwrap();
    let mut app = App::new(backend);
    let catalog = Catalog {
        nodes: vec![
            Node {
                name: "node0".to_string(),
                models: vec!["test".to_string(), "test".to_string()],
            },
            Node {
                name: "node1".to_string(),
                models: Vec::new(),
            },
        ],
        images: vec!["./images/cat.jpg".to_string()],
        loaded: true,
        load_error: None,
    };
    app.handle_event(AppEvent::CatalogLoaded(ResourceCatalog::from(catalog)));
    app
}

fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn screen_text(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
    terminal.draw(|f| draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn clamp_index_stays_in_bounds() {
    assert_eq!(clamp_index(None, 1, 0), None);
    assert_eq!(clamp_index(None, 1, 3), Some(0));
    assert_eq!(clamp_index(Some(2), 1, 3), Some(2));
    assert_eq!(clamp_index(Some(0), -1, 3), Some(0));
    assert_eq!(clamp_index(Some(1), -1, 3), Some(0));
}

#[test]
fn apply_field_parses_numbers_and_model_types() {
    let mut form = TrainForm::default();
    apply_field(&mut form, TrainField::Epochs, " 7 ").unwrap();
    apply_field(&mut form, TrainField::LearningRate, "0.01").unwrap();
    apply_field(&mut form, TrainField::ModelType, "ResNet").unwrap();
    assert_eq!(form.epochs, 7);
    assert_eq!(form.learning_rate, 0.01);
    assert_eq!(form.model_type, ModelType::Resnet);

    assert!(apply_field(&mut form, TrainField::BatchSize, "many").is_err());
    assert_eq!(form.batch_size, 32);
}

#[test]
fn catalog_event_selects_first_node() {
    let app = app_with_catalog();
    let s = app.selection_state();
    assert_eq!(s.selected_node.as_deref(), Some("node0"));
    assert_eq!(s.selected_model.as_deref(), Some("test"));
    assert_eq!(
        app.status,
        Some(("Loaded 2 nodes, 1 images".to_string(), false))
    );
}

#[test]
fn failed_catalog_is_reported_but_usable() {
    let backend = HttpBackend::new(&DashboardConfig::default()).unwrap();
    let mut app = App::new(backend);
    let catalog = Catalog {
        loaded: true,
        load_error: Some(crate::model::ErrorInfo::new(
            ErrorKind::Network,
            "connection refused",
        )),
        ..Catalog::default()
    };
    app.handle_event(AppEvent::CatalogLoaded(ResourceCatalog::from(catalog)));

    assert_eq!(app.selection_state().selected_node, None);
    let (msg, is_error) = app.status.clone().unwrap();
    assert!(is_error);
    assert!(msg.contains("connection refused"));
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selection_state().selected_node, None);
}

#[test]
fn moving_through_nodes_recomputes_models() {
    let mut app = app_with_catalog();
    press(&mut app, KeyCode::Down);
    let s = app.selection_state();
    assert_eq!(s.selected_node.as_deref(), Some("node1"));
    assert_eq!(s.selected_model, None);

    press(&mut app, KeyCode::Up);
    assert_eq!(app.selection_state().selected_model.as_deref(), Some("test"));
}

#[test]
fn editing_a_train_field_updates_the_form() {
    let mut app = app_with_catalog();
    for _ in 0..3 {
        press(&mut app, KeyCode::Tab);
    }
    assert_eq!(app.focus, Focus::Train);

    press(&mut app, KeyCode::Right);
    assert_eq!(app.form.model_type, ModelType::Mobilenet);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.form.model_type, ModelType::Efficientnet);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('e'));
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Char('5'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form.epochs, 5);
    assert!(app.editing.is_none());

    press(&mut app, KeyCode::Char('e'));
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.form.epochs, 5);
    assert!(app.status.as_ref().unwrap().1);
}

#[test]
fn quit_keys_are_ignored_while_editing() {
    let mut app = app_with_catalog();
    app.focus = Focus::Train;
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.quit);
    assert_eq!(app.editing.as_ref().unwrap().buf, "q");
    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.quit);
}

#[test]
fn input_edits_by_character() {
    let mut input = Input::with_text("héllo".to_string());
    input.move_left();
    input.move_left();
    input.backspace();
    input.insert_char('L');
    assert_eq!(input.buf, "héLlo");
    assert_eq!(input.display(), "héL|lo");
}

#[test]
fn dashboard_renders_catalog_and_empty_results() {
    let app = app_with_catalog();
    let text = screen_text(&app);
    assert!(text.contains("node0 (1 models)"));
    assert!(text.contains("node1 (0 models)"));
    assert!(text.contains("./images/cat.jpg"));
    assert!(text.contains("No result yet."));
    assert!(text.contains("Learning Rate: 0.001"));
}
