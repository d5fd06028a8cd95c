// ============================================================================
// STATE MODULE - State Management con Rc<RefCell> + notificaciones
// ============================================================================

pub mod reactivity;
pub mod view_status;
pub mod lifetime;

pub use reactivity::*;
pub use view_status::*;
pub use lifetime::*;
