// ============================================================================
// VIEW LIFETIME - Liga cada request al ciclo de vida de su vista
// ============================================================================
// Cada request captura un ticket al empezar. Si la vista se desmontó (o se
// volvió a montar) antes de que llegue la respuesta, el ticket ya no es el
// vigente y el resultado se descarta.
// ============================================================================

use std::cell::Cell;
use std::rc::Rc;

/// Ticket de una generación de montaje
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifetimeTicket(u64);

#[derive(Clone, Default)]
pub struct ViewLifetime {
    generation: Rc<Cell<u64>>,
    mounted: Rc<Cell<bool>>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marcar la vista como montada (nueva generación)
    pub fn mount(&self) -> LifetimeTicket {
        self.generation.set(self.generation.get() + 1);
        self.mounted.set(true);
        self.ticket()
    }

    /// Marcar la vista como desmontada; invalida todos los tickets emitidos
    pub fn unmount(&self) {
        self.generation.set(self.generation.get() + 1);
        self.mounted.set(false);
    }

    /// Ticket de la generación actual
    pub fn ticket(&self) -> LifetimeTicket {
        LifetimeTicket(self.generation.get())
    }

    /// ¿Sigue viva la vista que emitió el ticket?
    pub fn is_current(&self, ticket: LifetimeTicket) -> bool {
        self.mounted.get() && self.generation.get() == ticket.0
    }
}
