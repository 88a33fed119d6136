use super::{AppState, Flow, View};
use crate::document::Document;
use crate::error::TreeError;
use crate::forest::Forest;
use crate::section::{SectionId, SectionNode};
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

fn starter() -> AppState {
    let doc = Document::starter(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    AppState::new(doc, None, 100, 2)
}

fn visible(app: &AppState) -> Vec<String> {
    app.rows
        .iter()
        .filter_map(|row| app.forest().find(&row.id))
        .map(|s| format!("{} {}", s.number, s.title))
        .collect()
}

fn select(app: &mut AppState, id: &str) {
    app.select(&SectionId::from(id));
}

#[test]
fn test_outline_starts_with_top_level_expanded() {
    let app = starter();
    assert_eq!(app.rows.len(), 7);
    assert_eq!(app.current_id(), Some(&SectionId::from("sec-1")));
    assert_eq!(app.current_view, View::Outline);
    assert!(!app.dirty);
}

#[test]
fn test_collapse_hides_children() {
    let mut app = starter();
    app.toggle_expand();
    assert_eq!(
        visible(&app),
        vec![
            "1.0 Project Overview",
            "2.0 Scope of Work",
            "2.1 In Scope",
            "2.2 Out of Scope",
            "3.0 Deliverables"
        ]
    );
    app.expand_or_child();
    assert_eq!(app.rows.len(), 7);
    app.expand_or_child();
    assert_eq!(app.current_section().unwrap().title, "Background");
    app.collapse_or_parent();
    assert_eq!(app.current_section().unwrap().title, "Project Overview");
}

#[test]
fn test_navigation_stays_in_bounds() {
    let mut app = starter();
    app.move_up();
    assert_eq!(app.current_row, 0);
    app.move_to_last();
    assert_eq!(app.current_section().unwrap().title, "Deliverables");
    app.move_down();
    assert_eq!(app.current_section().unwrap().title, "Deliverables");
    app.move_to_first();
    assert_eq!(app.current_row, 0);
}

#[test]
fn test_add_child_expands_parent_and_selects_new_section() {
    let mut app = starter();
    select(&mut app, "sec-3");
    app.add_child();

    let section = app.current_section().unwrap();
    assert_eq!(section.title, "New Subsection");
    assert_eq!(section.number, "3.1");
    assert!(app.expanded.contains(&SectionId::from("sec-3")));
    assert!(app.dirty);
}

#[test]
fn test_add_sibling_renumbers_following_sections() {
    let mut app = starter();
    select(&mut app, "sec-1");
    app.add_sibling();

    assert_eq!(app.current_section().unwrap().number, "2.0");
    assert_eq!(app.current_section().unwrap().title, "New Section");
    let scope = app.forest().find(&SectionId::from("sec-2-1")).unwrap();
    assert_eq!(scope.number, "3.1");

    app.add_top_level();
    assert_eq!(app.current_section().unwrap().number, "5.0");
    assert_eq!(app.current_row, app.rows.len() - 1);
}

#[test]
fn test_delete_needs_confirmation() {
    let mut app = starter();
    select(&mut app, "sec-2");
    app.request_delete();
    assert_eq!(app.pending_delete, Some(SectionId::from("sec-2")));
    app.cancel_delete();
    assert!(app.forest().contains(&SectionId::from("sec-2")));

    app.request_delete();
    app.confirm_delete().unwrap();
    assert!(!app.forest().contains(&SectionId::from("sec-2-1")));
    assert_eq!(
        app.forest().find(&SectionId::from("sec-3")).unwrap().number,
        "2.0"
    );
}

#[test]
fn test_guard_refuses_last_top_level_section() {
    let doc = Document {
        sections: Forest::new(vec![SectionNode::with_title("Only")]).renumber(),
        ..Document::starter(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
    };
    let mut app = AppState::new(doc, None, 100, 2);
    let id = app.current_id().unwrap().clone();

    assert_eq!(
        app.delete_section(&id),
        Err(TreeError::LastTopLevelSection(id.clone()))
    );
    assert!(app.forest().contains(&id));
    assert!(app.message.is_some());
    assert!(!app.dirty);
}

#[test]
fn test_detail_edit_updates_content_only() {
    let mut app = starter();
    select(&mut app, "sec-1-1");
    app.enter_detail_view();
    assert_eq!(app.current_view, View::Detail);
    assert_eq!(
        app.editor_text().as_deref(),
        Some("Background information goes here...")
    );

    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("Line one\nLine two");
    }
    app.exit_detail_view(true);

    let section = app.forest().find(&SectionId::from("sec-1-1")).unwrap();
    assert_eq!(section.content, "Line one\nLine two");
    assert_eq!(section.number, "1.1");
    assert_eq!(app.current_view, View::Outline);
    assert!(app.editor_state.is_none());
}

#[test]
fn test_detail_exit_without_save_discards_edits() {
    let mut app = starter();
    app.enter_detail_view();
    if let Some(ref mut editor_state) = app.editor_state {
        editor_state.lines = edtui::Lines::from("Scratch");
    }
    app.exit_detail_view(false);
    assert_ne!(app.current_section().unwrap().content, "Scratch");
    assert!(!app.dirty);
}

#[test]
fn test_table_commands() {
    let mut app = starter();
    select(&mut app, "sec-3");

    app.begin_command();
    assert_eq!(app.execute("table 2 3"), Flow::Continue);
    assert_eq!(app.current_view, View::Outline);
    assert_eq!(app.current_section().unwrap().tables.len(), 1);

    app.execute("cell 1 2 3 Final report");
    let table = &app.current_section().unwrap().tables[0];
    assert_eq!(table.cell(1, 2), Some("Final report"));

    app.execute("cell 1 3 1 Nope");
    assert!(app.message.as_deref().unwrap().contains("outside"));

    app.execute("table 0 3");
    assert_eq!(app.current_section().unwrap().tables.len(), 1);

    app.execute("dtable 2");
    assert_eq!(app.message.as_deref(), Some("No table 2"));
    app.execute("dtable 1");
    assert!(app.current_section().unwrap().tables.is_empty());
}

#[test]
fn test_title_and_name_commands() {
    let mut app = starter();
    app.execute("title Executive Summary");
    assert_eq!(app.current_section().unwrap().title, "Executive Summary");
    assert_eq!(app.current_section().unwrap().number, "1.0");

    app.execute("name Boiler Upgrade");
    assert_eq!(app.document.document_name, "Boiler Upgrade");
    assert!(app.dirty);
}

#[test]
fn test_quit_refuses_unsaved_changes() {
    let mut app = starter();
    assert_eq!(app.execute("q"), Flow::Quit);

    app.add_child();
    assert_eq!(app.execute("q"), Flow::Continue);
    assert!(app.message.is_some());
    assert_eq!(app.execute("q!"), Flow::Quit);
}

#[test]
fn test_save_and_export_commands() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sow.json");
    let mut app = starter();
    app.path = Some(path.clone());
    app.add_child();

    assert_eq!(app.execute("wq"), Flow::Quit);
    assert!(!app.dirty);
    let saved = Document::load(&path).unwrap();
    assert_eq!(saved, app.document);

    let md = dir.path().join("sow.md");
    app.execute(&format!("export {}", md.display()));
    let markdown = fs::read_to_string(&md).unwrap();
    assert!(markdown.starts_with("# 1.0 Project Overview\n"));
    assert!(markdown.contains("## 1.3 New Subsection\n"));
}

#[test]
fn test_unknown_command_reports_message() {
    let mut app = starter();
    assert_eq!(app.execute("frobnicate"), Flow::Continue);
    assert_eq!(
        app.message.as_deref(),
        Some("Unknown command: frobnicate")
    );
}

#[test]
fn test_footer_and_breadcrumb_follow_selection() {
    let mut app = starter();
    select(&mut app, "sec-2-2");
    assert_eq!(app.current_page(), Some(7));
    assert_eq!(app.current_footer(), "SOW-2026-001 | Page 7");
    assert_eq!(
        app.breadcrumb(),
        vec!["2.0 Scope of Work".to_string(), "2.2 Out of Scope".to_string()]
    );
    assert_eq!(app.toc().next_page, 9);
}

#[test]
fn test_delete_table_outside_selection_is_reported() {
    let mut app = starter();
    select(&mut app, "sec-3");
    app.execute("table 1 1");
    let table = app.table_id_at(1).unwrap();

    select(&mut app, "sec-1");
    assert_eq!(
        app.delete_table(&table),
        Err(TreeError::TableNotFound {
            section: SectionId::from("sec-1"),
            table: table.clone(),
        })
    );

    select(&mut app, "sec-3");
    app.delete_table(&table).unwrap();
    assert!(app.current_section().unwrap().tables.is_empty());
}

#[test]
fn test_current_page_saturates_near_the_page_limit() {
    let doc = Document::starter(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    let mut app = AppState::new(doc, None, 100, u32::MAX);
    select(&mut app, "sec-3");
    assert_eq!(app.current_page(), Some(u32::MAX));
    assert_eq!(app.toc().next_page, u32::MAX);
}

#[test]
fn test_table_command_rejects_extra_tokens() {
    let mut app = starter();
    select(&mut app, "sec-3");
    app.execute("table 3 x 4");
    assert!(app.current_section().unwrap().tables.is_empty());
    assert_eq!(app.message.as_deref(), Some("Usage: table <rows> <cols>"));

    app.execute("table 3 4 5");
    assert!(app.current_section().unwrap().tables.is_empty());

    app.execute("table 3 4");
    assert_eq!(app.current_section().unwrap().tables.len(), 1);
}
