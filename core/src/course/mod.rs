pub mod cone;
pub mod store;

pub use cone::{Cone, ConeRecord, ConeType};
pub use store::ConeStore;
