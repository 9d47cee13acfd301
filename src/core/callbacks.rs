//=========================================================================
// Callback Set
//
// The three user functions a session forwards native events to.
//
// Notes:
// Every slot starts out as a no-op, so the session never has to check
// for a missing callback.
//=========================================================================

/// Runs once, after the first canvas context is built.
pub type SetupFn<D, C> = Box<dyn FnMut(&D, &mut C)>;

/// Runs for every frame the native loop draws.
pub type DrawFn<D, C> = Box<dyn FnMut(&D, &mut C)>;

/// Runs with the new size whenever the window is resized.
pub type ResizeFn = Box<dyn FnMut(u32, u32)>;

/// User setup/draw/resize functions, generic over the device and
/// context types of the GPU backend.
pub struct CallbackSet<D, C> {
    pub(crate) setup: SetupFn<D, C>,
    pub(crate) draw: DrawFn<D, C>,
    pub(crate) resize: ResizeFn,
}

impl<D, C> CallbackSet<D, C> {
    pub fn new() -> Self {
        Self {
            setup: Box::new(|_, _| {}),
            draw: Box::new(|_, _| {}),
            resize: Box::new(|_, _| {}),
        }
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&D, &mut C) + 'static,
    {
        self.setup = Box::new(setup);
        self
    }

    pub fn with_draw<F>(mut self, draw: F) -> Self
    where
        F: FnMut(&D, &mut C) + 'static,
    {
        self.draw = Box::new(draw);
        self
    }

    pub fn with_resize<F>(mut self, resize: F) -> Self
    where
        F: FnMut(u32, u32) + 'static,
    {
        self.resize = Box::new(resize);
        self
    }
}

impl<D, C> Default for CallbackSet<D, C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
