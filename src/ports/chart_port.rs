//! Chart rendering port trait.

use crate::domain::error::TradeError;
use crate::domain::ranking::DestinationTotal;
use std::path::Path;

pub trait ChartPort {
    /// Render one bar per destination, in the given order, to `path`.
    fn render(&self, ranking: &[DestinationTotal], path: &Path) -> Result<(), TradeError>;
}
