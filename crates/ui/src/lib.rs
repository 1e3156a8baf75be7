//! View models for the CBT practice pages: plain data a renderer shows,
//! plus the small amount of page state (toasts, modals, routes).

pub mod context;
pub mod routes;
pub mod vm;

pub use context::{AppContext, UiApp};
pub use routes::{Redirect, Route, RouteError, resolve_test_route};
