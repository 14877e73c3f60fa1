use std::ops::{Deref, DerefMut};

use crate::foundation::core::{Affine, Bitmap, Insets, Point, Rect, Size, Vec2};
use crate::foundation::error::SnapshotResult;

/// Where a view currently sits inside its superview.
#[derive(Clone, Debug, PartialEq)]
pub struct HostPlacement {
    /// Superview link, if the view is attached to one.
    pub parent: Option<ParentSlot>,
    /// Frame origin in the superview's coordinate space.
    pub origin: Point,
    /// Whether the view follows its superview's size changes.
    pub autoresizes: bool,
}

/// A superview and the view's position in its child list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParentSlot {
    /// Host-defined identifier of the superview.
    pub parent_id: u64,
    /// Index in the superview's child list; `None` when the view is missing from it.
    pub index: Option<usize>,
}

/// Host view interface needed to capture a subject.
///
/// Implementations own the platform hierarchy. The capture service only
/// borrows the subject, moves it into an intermediate container while tiles
/// are drawn, and puts it back through [`CaptureSubject::restore`].
pub trait CaptureSubject {
    /// The view's bounds size in points.
    fn bounds(&self) -> Size;

    /// Active geometric transform.
    fn transform(&self) -> Affine;

    /// Current safe-area insets.
    fn safe_area_insets(&self) -> Insets;

    /// Synchronously run one pending layout pass.
    fn layout_if_needed(&mut self);

    /// Current superview placement.
    fn placement(&self) -> HostPlacement;

    /// Detach from the superview and host the view in a fresh container of
    /// `container` size occupying the view's original slot and frame.
    fn enter_container(&mut self, container: Size);

    /// Move the hosted view so that `offset` (in view space) sits at the
    /// container's origin.
    fn set_container_offset(&mut self, offset: Vec2);

    /// Extra safe-area insets applied by the container.
    fn set_additional_safe_area_insets(&mut self, insets: Insets);

    /// Return to `placement` and drop any container.
    fn restore(&mut self, placement: &HostPlacement);

    /// Render the view's layer tree, ignoring hosting.
    fn render_layer(&mut self, scale: f64) -> SnapshotResult<Bitmap>;

    /// Draw the on-screen hierarchy inside `rect`, given in the current host
    /// space: the view's own space, or the container's while hosted.
    fn draw_hierarchy(&mut self, rect: Rect, scale: f64) -> SnapshotResult<Bitmap>;
}

/// Exclusive borrow of a subject while it lives in an intermediate container.
///
/// Dropping the guard restores the original superview, origin and resizing
/// behavior, including when the tile loop bails out with an error.
pub struct ReparentGuard<'a, S: CaptureSubject + ?Sized> {
    subject: &'a mut S,
    original: HostPlacement,
}

impl<'a, S: CaptureSubject + ?Sized> ReparentGuard<'a, S> {
    /// Move `subject` into a same-sized container.
    ///
    /// # Panics
    ///
    /// Panics if the subject reports a superview that does not list it as a
    /// child; the hierarchy was mutated underneath the capture.
    pub fn enter(subject: &'a mut S) -> Self {
        let original = subject.placement();
        if let Some(slot) = &original.parent {
            assert!(
                slot.index.is_some(),
                "view claims superview {} but is missing from its subviews",
                slot.parent_id
            );
        }
        let size = subject.bounds();
        subject.enter_container(size);
        Self { subject, original }
    }

    /// Placement captured before reparenting.
    pub fn original(&self) -> &HostPlacement {
        &self.original
    }
}

impl<S: CaptureSubject + ?Sized> Deref for ReparentGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.subject
    }
}

impl<S: CaptureSubject + ?Sized> DerefMut for ReparentGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.subject
    }
}

impl<S: CaptureSubject + ?Sized> Drop for ReparentGuard<'_, S> {
    fn drop(&mut self) {
        self.subject.restore(&self.original);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/host.rs"]
mod tests;
