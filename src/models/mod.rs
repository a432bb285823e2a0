pub mod card;
mod de;
pub mod language;
pub mod variation;

pub use card::*;
pub use language::*;
pub use variation::*;
