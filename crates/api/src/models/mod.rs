pub mod extension;
pub mod path_info;
pub mod resource;
pub mod resource_path;
pub mod scope;

pub use extension::*;
pub use path_info::*;
pub use resource::*;
pub use resource_path::*;
pub use scope::*;
