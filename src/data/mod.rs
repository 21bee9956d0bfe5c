pub mod analysis;
pub mod app_state;
pub mod debounce;
pub mod expression;
pub mod function_input;
pub mod guided;
pub mod history;
pub mod interaction;
pub mod projection;
pub mod sampler;
pub mod session;
pub mod surface;
pub mod ticks;
pub mod view2d;
