//! API State Management

use rizz_engine::Engine;

#[derive(Clone)]
pub struct ApiState {
    pub engine: Engine,
    pub start_time: std::time::Instant,
}

impl ApiState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            start_time: std::time::Instant::now(),
        }
    }
}
