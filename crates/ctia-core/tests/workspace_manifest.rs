//! Workspace manifest checks: internal crate pins and the dependency
//! direction between the core and its providers.

use std::path::{Path, PathBuf};

const INTERNAL_CRATES: [&str; 2] = ["ctia-core", "ctia-gemini"];

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .unwrap()
        .to_path_buf()
}

fn manifest(dir: &Path) -> toml::Value {
    let text = std::fs::read_to_string(dir.join("Cargo.toml")).unwrap();
    text.parse().unwrap()
}

fn members(root: &toml::Value) -> Vec<String> {
    root["workspace"]["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn internal_pins_point_at_members_with_the_workspace_version() {
    let root_dir = workspace_root();
    let root = manifest(&root_dir);
    let deps = &root["workspace"]["dependencies"];
    let members = members(&root);

    for name in INTERNAL_CRATES {
        let pin = deps
            .get(name)
            .unwrap_or_else(|| panic!("{name} is not pinned in [workspace.dependencies]"));
        let path = pin["path"].as_str().unwrap();
        assert!(
            members.iter().any(|m| m == path),
            "{name} pin {path} is not a workspace member"
        );
        assert_eq!(
            pin["version"].as_str(),
            Some(env!("CARGO_PKG_VERSION")),
            "{name} pin drifted from the workspace version"
        );

        let member = manifest(&root_dir.join(path));
        assert_eq!(member["package"]["name"].as_str(), Some(name));
    }
}

#[test]
fn members_take_internal_crates_through_the_workspace() {
    let root_dir = workspace_root();
    let root = manifest(&root_dir);

    for member_path in members(&root) {
        let member = manifest(&root_dir.join(&member_path));
        assert_eq!(
            member["package"]["version"]["workspace"].as_bool(),
            Some(true),
            "{member_path} should use version.workspace = true"
        );
        for table in ["dependencies", "dev-dependencies"] {
            let Some(deps) = member.get(table).and_then(|t| t.as_table()) else {
                continue;
            };
            for name in INTERNAL_CRATES {
                if let Some(dep) = deps.get(name) {
                    assert_eq!(
                        dep.get("workspace").and_then(|w| w.as_bool()),
                        Some(true),
                        "{member_path} [{table}] {name} bypasses the workspace pin"
                    );
                }
            }
        }
    }
}

#[test]
fn core_does_not_depend_on_any_provider_backend() {
    let core = manifest(Path::new(env!("CARGO_MANIFEST_DIR")));
    let deps = core["dependencies"].as_table().unwrap();
    for backend in ["ctia-gemini", "reqwest"] {
        assert!(!deps.contains_key(backend), "ctia-core must not depend on {backend}");
    }
}

#[test]
fn library_version_constant_matches_package() {
    assert_eq!(ctia_core::VERSION, env!("CARGO_PKG_VERSION"));
}
