/*
 * Resolves platform-specific application directories. Resolution only; the
 * note store creates the directories it needs when it opens.
 */
use directories::ProjectDirs;
use std::path::PathBuf;

/*
 * Returns the application's local (non-roaming) data directory, derived
 * without an organization qualifier (e.g. AppData/Local on Windows,
 * ~/.local/share on Linux). `None` if no home directory can be determined.
 */
pub fn resolve_app_data_local_dir(app_name: &str) -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    Some(proj_dirs.data_local_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    // ProjectDirs behavior is environment-dependent; these tests assume a
    // typical environment with a resolvable home directory.

    #[test]
    fn test_resolution_is_stable_for_an_app_name() {
        let unique_app_name = format!("TestApp_PathUtils_{}", rand::random::<u128>());

        let first = resolve_app_data_local_dir(&unique_app_name)
            .expect("should resolve a data dir for a fresh app name");

        assert!(first.is_absolute());
        assert_eq!(resolve_app_data_local_dir(&unique_app_name), Some(first));
    }

    #[test]
    fn test_distinct_app_names_resolve_to_distinct_dirs() {
        let name_a = format!("TestApp_PathUtils_A_{}", rand::random::<u128>());
        let name_b = format!("TestApp_PathUtils_B_{}", rand::random::<u128>());

        let dir_a = resolve_app_data_local_dir(&name_a).expect("dir for first app name");
        let dir_b = resolve_app_data_local_dir(&name_b).expect("dir for second app name");

        assert_ne!(dir_a, dir_b);
    }
}
