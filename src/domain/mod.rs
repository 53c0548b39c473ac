pub mod camera;
pub mod cell;
pub mod grid;
pub mod movement;
pub mod raycast;
pub mod shade;
pub mod vector;
