use super::*;
use crate::capture::raster::RasterView;
use crate::foundation::core::{Affine, Point};
use crate::legend::text::ParleyShaper;
use crate::markers::model::ActivationPointPolicy;
use crate::markers::source::StaticMarkers;
use crate::overlay::mapper::Overlay;

fn composer() -> SnapshotComposer {
    SnapshotComposer::new(SnapshotConfig::default()).unwrap()
}

fn view(width: u32, height: u32) -> RasterView {
    RasterView::new(Bitmap::filled(width, height, 1.0, Color::WHITE))
}

fn buttons(n: usize) -> StaticMarkers {
    StaticMarkers(
        (0..n)
            .map(|i| {
                let y = i as f64 * 10.0;
                Marker::frame(Rect::new(0.0, y, 40.0, y + 8.0), "Button")
            })
            .collect(),
    )
}

struct CountingSource {
    calls: usize,
    markers: Vec<Marker>,
}

impl MarkerSource<RasterView> for CountingSource {
    fn markers(&mut self, subject: &RasterView) -> SnapshotResult<Vec<Marker>> {
        assert!(!subject.is_contained());
        self.calls += 1;
        Ok(self.markers.clone())
    }
}

#[test]
fn no_markers_means_snapshot_size() {
    let mut c = composer();
    c.compose(&mut view(300, 200), &mut buttons(0)).unwrap();
    assert_eq!(c.size_that_fits().unwrap(), Size::new(300.0, 200.0));
    let a = c.arrange(Size::new(300.0, 200.0)).unwrap();
    assert!(a.legend.is_empty());
    assert_eq!(a.snapshot_frame, Rect::new(0.0, 0.0, 300.0, 200.0));
}

#[test]
fn square_snapshot_stacks_legend_below() {
    let mut c = composer();
    c.compose(&mut view(300, 300), &mut buttons(1)).unwrap();
    let size = c.size_that_fits().unwrap();
    assert_eq!(size, Size::new(316.0, 347.0));

    let a = c.arrange(size).unwrap();
    assert_eq!(a.strategy, FlowStrategy::StackedBelow);
    assert_eq!(a.snapshot_frame.origin(), Point::new(8.0, 0.0));
    assert_eq!(a.legend[0].frame, Rect::new(16.0, 316.0, 82.0, 331.0));
}

#[test]
fn tall_snapshot_places_columns_beside() {
    let mut c = composer();
    c.compose(&mut view(400, 600), &mut buttons(3)).unwrap();
    let size = c.size_that_fits().unwrap();
    assert_eq!(size, Size::new(716.0, 600.0));

    let a = c.arrange(size).unwrap();
    assert_eq!(a.strategy, FlowStrategy::ColumnarBeside);
    let origins: Vec<Point> = a.legend.iter().map(|e| e.frame.origin()).collect();
    assert_eq!(
        origins,
        vec![
            Point::new(416.0, 16.0),
            Point::new(416.0, 47.0),
            Point::new(416.0, 78.0),
        ]
    );
}

#[test]
fn colors_cycle_through_the_palette() {
    let mut c = composer();
    c.compose(&mut view(300, 300), &mut buttons(9)).unwrap();
    let markers = c.display_markers();
    assert_eq!(markers.len(), 9);
    assert_eq!(markers[7].color, markers[0].color);
    assert_eq!(markers[8].color, markers[1].color);
    assert_ne!(markers[0].color, markers[1].color);
    for dm in markers {
        assert_eq!(dm.entry.color(), dm.color);
        match &dm.overlay.overlay {
            Overlay::Fill { color, .. } => assert_eq!(*color, dm.color.with_alpha(0.3)),
            other => panic!("unexpected overlay {other:?}"),
        }
    }
}

#[test]
fn recomposing_replaces_the_previous_generation() {
    let mut c = composer();
    let mut subject = view(300, 300);
    c.compose(&mut subject, &mut buttons(5)).unwrap();
    c.compose(&mut subject, &mut buttons(2)).unwrap();
    assert_eq!(c.generation(), 2);
    assert_eq!(c.display_markers().len(), 2);
    let indices: Vec<usize> = c.display_markers().iter().map(|d| d.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn failed_capture_leaves_composer_empty() {
    let mut c = composer();
    c.compose(&mut view(300, 300), &mut buttons(2)).unwrap();

    let mut rotated = view(2100, 10).with_transform(Affine::rotate(0.1));
    let err = c.compose(&mut rotated, &mut buttons(2)).unwrap_err();
    assert!(matches!(err, SnapshotError::UnsupportedTransform(_)));
    assert!(c.display_markers().is_empty());
    assert!(c.snapshot().is_none());
    assert_eq!(c.generation(), 1);
    assert_eq!(c.size_that_fits().unwrap(), Size::ZERO);
}

#[test]
fn markers_are_read_after_capture_restores_the_subject() {
    let mut c = composer();
    let mut subject = view(2100, 10).attached_to(7, 0, Point::ZERO);
    let mut source = CountingSource {
        calls: 0,
        markers: vec![Marker::frame(Rect::new(0.0, 0.0, 5.0, 5.0), "Tile")],
    };
    c.compose(&mut subject, &mut source).unwrap();
    assert_eq!(source.calls, 1);
    assert_eq!(subject.containers_entered(), 1);
    assert_eq!(c.display_markers().len(), 1);
}

#[test]
fn activation_policy_comes_from_config() {
    let config = SnapshotConfig {
        activation_points: ActivationPointPolicy::Always,
        ..SnapshotConfig::default()
    };
    let mut c = SnapshotComposer::new(config).unwrap();
    c.compose(&mut view(300, 300), &mut buttons(1)).unwrap();
    assert!(c.display_markers()[0].overlay.indicator.is_some());

    let mut c = composer();
    c.compose(&mut view(300, 300), &mut buttons(1)).unwrap();
    assert!(c.display_markers()[0].overlay.indicator.is_none());
}

#[test]
fn size_and_arrangement_agree_for_any_marker_count() {
    for (w, h) in [(300, 300), (400, 600), (800, 200), (320, 330)] {
        for n in 0..25 {
            let mut c = composer();
            c.compose(&mut view(w, h), &mut buttons(n)).unwrap();
            let size = c.size_that_fits().unwrap();
            let a = c.arrange(size).unwrap();
            let bounds = Rect::from_origin_size(Point::ZERO, size);
            assert_eq!(bounds.union(a.snapshot_frame), bounds);
            for (i, e) in a.legend.iter().enumerate() {
                assert_eq!(bounds.union(e.frame), bounds, "{w}x{h} n={n} entry {i}");
                assert_eq!(e.frame.intersect(a.snapshot_frame).area(), 0.0);
                for other in &a.legend[i + 1..] {
                    assert_eq!(e.frame.intersect(other.frame).area(), 0.0);
                }
            }
        }
    }
}

#[test]
fn render_matches_natural_size() {
    let mut c = composer();
    assert!(c.render().is_err());
    c.compose(&mut view(300, 300), &mut buttons(2)).unwrap();
    let size = c.size_that_fits().unwrap();
    let out = c.render().unwrap();
    assert_eq!(
        (f64::from(out.width), f64::from(out.height)),
        (size.width, size.height)
    );
}

#[test]
fn prepared_bitmaps_must_match_the_configured_scale() {
    let mut c = composer();
    let err = c
        .compose_bitmap(Bitmap::filled(4, 4, 2.0, Color::WHITE), Vec::new())
        .unwrap_err();
    assert!(err.to_string().contains("does not match configured scale"));
    c.compose_bitmap(Bitmap::filled(4, 4, 1.0, Color::WHITE), Vec::new())
        .unwrap();
    assert_eq!(c.generation(), 1);
}

fn system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn shaped_text_stays_inside_the_composite_for_unbreakable_words() {
    let Some(font) = system_font() else {
        eprintln!("skipping: no system font available");
        return;
    };

    for (w, h) in [(400, 60), (320, 400)] {
        let mut c = composer().with_shaper(Box::new(ParleyShaper::new(font.clone()).unwrap()));
        let markers = (0..2)
            .map(|i| {
                let y = f64::from(i) * 20.0;
                Marker::frame(Rect::new(0.0, y, 40.0, y + 10.0), "W".repeat(80))
            })
            .collect();
        c.compose_bitmap(Bitmap::filled(w, h, 1.0, Color::WHITE), markers)
            .unwrap();

        let size = c.size_that_fits().unwrap();
        let arranged = c.arrange(size).unwrap();
        let bounds = Rect::from_origin_size(Point::ZERO, size);

        for entry in &arranged.legend {
            assert_eq!(bounds.union(entry.frame), bounds, "{w}x{h}: {:?}", entry.frame);
            for text in &entry.layout.texts {
                let right = entry.frame.x0 + text.frame().x1;
                assert!(right <= entry.frame.x1 + 1e-3, "{w}x{h}: text ends at {right}");
            }
        }
        let (a, b) = (arranged.legend[0].frame, arranged.legend[1].frame);
        assert!(a.intersect(b).area() <= 0.0, "{w}x{h}: {a:?} overlaps {b:?}");
    }
}
