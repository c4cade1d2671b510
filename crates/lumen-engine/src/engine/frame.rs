use super::handle::Handle;
use super::view::View;

/// The begin/render/end protocol bracketing one presented image.
///
/// `begin_frame` may decline (return `None`) when the presentation pipeline
/// cannot take another image; the caller must then skip `render` and
/// `end_frame` for this iteration.
pub trait FrameRenderer {
    type Frame;

    fn begin_frame(&mut self) -> Option<Self::Frame>;

    fn render(&mut self, frame: &mut Self::Frame, view: Handle<View>);

    fn end_frame(&mut self, frame: Self::Frame);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Rendered,
    Skipped,
}

/// Runs one begin/render/end cycle for `view`.
pub fn drive_frame<R>(renderer: &mut R, view: Handle<View>) -> FrameOutcome
where
    R: FrameRenderer + ?Sized,
{
    let Some(mut frame) = renderer.begin_frame() else {
        return FrameOutcome::Skipped;
    };

    renderer.render(&mut frame, view);
    renderer.end_frame(frame);
    FrameOutcome::Rendered
}

/// Presented/skipped frame counters.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameStats {
    pub presented: u64,
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Begin,
        Render(Handle<View>),
        End(u32),
    }

    struct Recorder {
        accept: Vec<bool>,
        calls: Vec<Call>,
        next_id: u32,
    }

    impl Recorder {
        fn new(accept: &[bool]) -> Self {
            Self { accept: accept.iter().rev().copied().collect(), calls: Vec::new(), next_id: 0 }
        }
    }

    impl FrameRenderer for Recorder {
        type Frame = u32;

        fn begin_frame(&mut self) -> Option<u32> {
            self.calls.push(Call::Begin);
            if self.accept.pop().unwrap_or(true) {
                self.next_id += 1;
                Some(self.next_id)
            } else {
                None
            }
        }

        fn render(&mut self, _frame: &mut u32, view: Handle<View>) {
            self.calls.push(Call::Render(view));
        }

        fn end_frame(&mut self, frame: u32) {
            self.calls.push(Call::End(frame));
        }
    }

    fn view() -> Handle<View> {
        Handle::from_parts(0, 0)
    }

    #[test]
    fn accepted_frame_renders_then_ends() {
        let mut r = Recorder::new(&[true]);
        assert_eq!(drive_frame(&mut r, view()), FrameOutcome::Rendered);
        assert_eq!(r.calls, vec![Call::Begin, Call::Render(view()), Call::End(1)]);
    }

    #[test]
    fn declined_frame_skips_render_and_end() {
        let mut r = Recorder::new(&[false]);
        assert_eq!(drive_frame(&mut r, view()), FrameOutcome::Skipped);
        assert_eq!(r.calls, vec![Call::Begin]);
    }

    #[test]
    fn loop_continues_after_a_declined_frame() {
        let mut r = Recorder::new(&[true, false, true]);
        let outcomes: Vec<_> = (0..3).map(|_| drive_frame(&mut r, view())).collect();
        assert_eq!(outcomes, vec![FrameOutcome::Rendered, FrameOutcome::Skipped, FrameOutcome::Rendered]);
        assert_eq!(r.calls.iter().filter(|c| matches!(c, Call::End(_))).count(), 2);
    }
}
