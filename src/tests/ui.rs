use super::wrap_area;
use ratatui::layout::Rect;

#[test]
fn test_wrap_area_caps_editor_width() {
    let area = Rect::new(1, 4, 150, 30);
    assert_eq!(wrap_area(area, 100), Rect::new(1, 4, 100, 30));
}

#[test]
fn test_wrap_area_keeps_narrow_terminals() {
    let area = Rect::new(0, 0, 60, 10);
    assert_eq!(wrap_area(area, 100), area);
    assert_eq!(wrap_area(area, 0), area);
    assert_eq!(wrap_area(area, usize::MAX), area);
}
