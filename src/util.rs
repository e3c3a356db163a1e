use std::path::PathBuf;

pub const WORLD_REL_PATH: &str = "data/config/world.json";
pub const MAP_REL_PATH: &str = "data/map.dat";

pub fn repo_root() -> PathBuf {
    // CARGO_MANIFEST_DIR is the crate root; sample data lives under data/.
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn default_paths() -> (PathBuf, PathBuf) {
    let root = repo_root();
    (root.join(WORLD_REL_PATH), root.join(MAP_REL_PATH))
}
