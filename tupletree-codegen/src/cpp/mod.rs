//! C++ code generation modules.

pub mod classes;
pub mod early;
pub mod forward;
pub mod names;
pub mod tracking;

pub use classes::ClassGenerator;
pub use early::EarlyGenerator;
pub use forward::ForwardDeclGenerator;
pub use tracking::TrackingGenerator;
