mod autopaint;
mod core;
mod pointer;

pub use autopaint::{AutoPaintReport, AutoPaintSweep};
pub use self::core::{DEFAULT_INSET, EngineSettings, EngineState, StrokeDab, StrokeEngine};
