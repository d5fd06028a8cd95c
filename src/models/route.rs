use serde::{Deserialize, Serialize};
use crate::models::delivery::Delivery;

/// Ruta de un vehículo: índices (en orden de visita) dentro de la lista actual de pedidos.
///
/// Se guardan como `i64` para que un índice negativo o fuera de rango no rompa
/// el parseo; simplemente no resuelve a ningún pedido.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(pub Vec<i64>);

impl Route {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolver cada parada contra la lista de pedidos (None si no existe)
    pub fn resolve<'a>(&'a self, deliveries: &'a [Delivery]) -> impl Iterator<Item = Option<&'a Delivery>> + 'a {
        self.0.iter().map(move |&index| {
            usize::try_from(index)
                .ok()
                .and_then(|i| deliveries.get(i))
        })
    }
}

impl From<Vec<i64>> for Route {
    fn from(stops: Vec<i64>) -> Self {
        Self(stops)
    }
}
