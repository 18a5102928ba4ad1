pub mod error;
pub mod model;
pub mod policy;
pub mod traits;

pub use self::model::Model;
pub use self::policy::Store;
