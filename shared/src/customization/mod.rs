pub mod color;
pub mod color_changer;
pub mod inventory;
pub mod mesh_changer;
pub mod render_target;
pub mod resolver;
pub mod slot;
