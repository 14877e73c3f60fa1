use super::*;
use crate::legend::text::FixedMetricsShaper;

const CYAN: Color = Color::rgb(0, 255, 255);
const COLUMN: Size = Size::new(284.0, 300.0);

fn button() -> Marker {
    Marker::frame(Rect::new(0.0, 0.0, 40.0, 20.0), "Button")
}

fn lay_out(entry: &LegendEntry, available: Size) -> EntryLayout {
    entry
        .layout(&mut FixedMetricsShaper::default(), available)
        .unwrap()
}

#[test]
fn description_sits_beside_the_swatch() {
    let out = lay_out(&LegendEntry::new(&button(), CYAN, true), COLUMN);
    assert_eq!(out.size, Size::new(66.0, 15.0));
    assert_eq!(out.swatch, Rect::new(0.0, 0.5, 14.0, 14.5));
    assert_eq!(out.swatch_color, CYAN);
    assert_eq!(out.texts.len(), 1);
    assert_eq!(out.texts[0].frame(), Rect::new(30.0, 0.0, 66.0, 15.0));
    assert!(out.pills.is_empty());
}

#[test]
fn hint_follows_the_description() {
    let marker = Marker {
        hint: Some("Double tap".to_string()),
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), COLUMN);
    assert_eq!(out.texts[1].origin, Point::new(30.0, 19.0));
    assert_eq!(out.size, Size::new(90.0, 34.0));
}

#[test]
fn blank_hint_is_dropped() {
    let marker = Marker {
        hint: Some("  ".to_string()),
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), COLUMN);
    assert_eq!(out.texts.len(), 1);
    assert_eq!(out.size.height, 15.0);
}

#[test]
fn custom_actions_are_indented_under_a_heading() {
    let marker = Marker {
        custom_actions: vec!["Delete".to_string()],
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), COLUMN);
    assert_eq!(out.texts.len(), 3);
    assert_eq!(out.texts[1].frame(), Rect::new(30.0, 23.0, 78.0, 38.0));
    assert_eq!(out.texts[2].origin, Point::new(38.0, 38.0));
    assert_eq!(out.size.height, 53.0);
}

#[test]
fn headings_follow_the_marker_language() {
    let marker = Marker {
        custom_actions: vec!["Supprimer".to_string()],
        accessibility_language: Some("fr-FR".to_string()),
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), COLUMN);
    // "Actions :" is one character longer than the English heading.
    assert_eq!(out.texts[1].text.size.width, 54.0);
}

#[test]
fn input_labels_render_as_pills_in_a_row() {
    let marker = Marker {
        user_input_labels: Some(vec!["Play".to_string(), "Start".to_string()]),
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), COLUMN);
    assert_eq!(out.pills.len(), 2);
    assert_eq!(out.pills[0].rect, Rect::new(30.0, 42.0, 70.0, 65.0));
    assert_eq!(out.pills[1].rect, Rect::new(74.0, 42.0, 120.0, 65.0));
    assert_eq!(out.pills[0].label.origin, Point::new(38.0, 46.0));
    assert_eq!(out.size, Size::new(120.0, 65.0));
}

#[test]
fn input_labels_are_hidden_when_disabled() {
    let marker = Marker {
        user_input_labels: Some(vec!["Play".to_string()]),
        ..button()
    };
    let out = lay_out(&LegendEntry::new(&marker, CYAN, false), COLUMN);
    assert!(out.pills.is_empty());
    assert_eq!(out.size.height, 15.0);
}

#[test]
fn pills_wrap_to_the_available_width() {
    let marker = Marker {
        user_input_labels: Some(vec!["Play".to_string(), "Start".to_string()]),
        ..button()
    };
    let available = Size::new(90.0, 300.0);
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), available);
    let (first, second) = (out.pills[0].rect, out.pills[1].rect);
    assert_eq!(second.x0, 30.0);
    assert_eq!(second.y0, first.y1 + PILL_GAP);
    assert_eq!(out.size.height, second.y1);
    assert!(out.size.width <= available.width);
}

#[test]
fn long_descriptions_wrap_instead_of_widening() {
    let marker = Marker::frame(Rect::ZERO, "A rather long description that wraps");
    let available = Size::new(100.0, 10.0);
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), available);
    assert!(out.size.width <= available.width);
    assert!(out.size.height > available.height);
    // Swatch is centered against the whole description block.
    assert_eq!(out.swatch.center().y, out.size.height * 0.5);
}

#[test]
fn empty_description_keeps_the_swatch_row() {
    let marker = Marker::frame(Rect::ZERO, "");
    let entry = LegendEntry::new(&marker, CYAN, true);
    let out = lay_out(&entry, COLUMN);
    assert!(out.texts.is_empty());
    assert_eq!(out.size, Size::new(30.0, SWATCH_SIDE));
    assert_eq!(
        entry
            .natural_size(&mut FixedMetricsShaper::default(), COLUMN)
            .unwrap(),
        out.size
    );
}

#[test]
fn unbreakable_words_wrap_inside_the_text_column() {
    let marker = Marker::frame(Rect::ZERO, "W".repeat(80));
    let available = Size::new(100.0, 10.0);
    let out = lay_out(&LegendEntry::new(&marker, CYAN, true), available);
    // 70pt of text column holds 11 characters per line.
    assert_eq!(out.size, Size::new(96.0, 8.0 * 15.0));
    assert!(out.texts.iter().all(|t| t.frame().x1 <= out.size.width));
}
