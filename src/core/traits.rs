//! Abstract traits for dependency inversion.
//!
//! [`FrameSink`] is the seam between the sequencer and whatever renders
//! frames: the sequencer emits frame indices, the sink maps them to real
//! presentation (sprite swap, console output, render command).
//!
//! Implementations live with the host; `core` only knows the trait.

/// Abstract frame output interface.
///
/// `display_frame` is called once per emitted frame, in emission order.
/// A sink with no asset for an index must degrade gracefully (log a
/// warning, skip the draw) and never fail the caller; sequencing
/// continues regardless of what the sink can actually show.
pub trait FrameSink {
    /// Present frame `frame_idx`. Always in range `0..FRAME_COUNT`.
    fn display_frame(&mut self, frame_idx: usize);
}

/// Blanket impl: mutable references pass through
impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn display_frame(&mut self, frame_idx: usize) {
        (**self).display_frame(frame_idx)
    }
}

impl<S: FrameSink + ?Sized> FrameSink for Box<S> {
    fn display_frame(&mut self, frame_idx: usize) {
        (**self).display_frame(frame_idx)
    }
}
