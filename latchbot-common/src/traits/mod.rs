pub mod repository_traits;
pub mod transport_traits;
