pub mod model;
pub mod node;
pub mod path;
pub mod state;
pub mod store;

pub use model::{GameTree, InsertPolicy, Mainline, TreeStats};
pub use node::{Annotation, Brush, GameNode, NodeId, Shape};
pub use path::Path;
pub use state::{GameHeaders, TreeState};
pub use store::{MoveOptions, TreeStore};
